//! Inventory domain module: the beer catalog.
//!
//! This crate contains business rules for catalog items, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod beer;

pub use beer::{Beer, BeerDetails, BeerInput, Price, Upc};
