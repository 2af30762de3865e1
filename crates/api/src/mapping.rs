//! Request/response DTOs mapping to/from domain types.

use taproom_inventory::{Beer, BeerInput};

use crate::app::dto::BeerDto;

impl From<&Beer> for BeerDto {
    fn from(beer: &Beer) -> Self {
        BeerDto {
            id: Some(*beer.id.as_uuid()),
            version: Some(beer.version),
            beer_name: Some(beer.name.clone()),
            beer_style: Some(beer.style.clone()),
            upc: Some(beer.upc.to_string()),
            quantity_on_hand: Some(beer.quantity_on_hand),
            price: Some(beer.price.amount()),
            created_date: Some(beer.created_at),
            update_date: Some(beer.updated_at),
            created_by: Some(beer.created_by.clone()),
            updated_by: Some(beer.updated_by.clone()),
        }
    }
}

impl From<Beer> for BeerDto {
    fn from(beer: Beer) -> Self {
        BeerDto::from(&beer)
    }
}

/// Only the business fields cross into the domain; the rest is server-owned.
impl From<BeerDto> for BeerInput {
    fn from(dto: BeerDto) -> Self {
        BeerInput {
            name: dto.beer_name,
            style: dto.beer_style,
            upc: dto.upc,
            quantity_on_hand: dto.quantity_on_hand,
            price: dto.price,
        }
    }
}
