use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use taproom_core::{AggregateRoot, BeerId, DomainError, DomainResult, ValueObject, Violations};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const STYLE_MAX_CHARS: usize = 50;
pub const UPC_MIN_CHARS: usize = 6;
pub const UPC_MAX_CHARS: usize = 20;
pub const PRICE_MAX_INTEGER_DIGITS: u32 = 5;
pub const PRICE_MAX_FRACTION_DIGITS: u32 = 2;

/// Universal Product Code: the business-unique alternate key of a beer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Upc(String);

impl Upc {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a UPC already known to be valid (e.g. loaded from storage).
    pub fn from_trusted(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl ValueObject for Upc {}

impl core::fmt::Display for Upc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Positive unit price with at most 5 integer and 2 fraction digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Wrap a price already known to be valid (e.g. loaded from storage).
    pub fn from_trusted(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl ValueObject for Price {}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Raw beer fields as received from a caller, before any checks.
///
/// Every field is optional so that "missing" can be reported as a violation
/// alongside the other constraint failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeerInput {
    pub name: Option<String>,
    pub style: Option<String>,
    pub upc: Option<String>,
    pub quantity_on_hand: Option<i32>,
    pub price: Option<Decimal>,
}

/// The caller-editable business fields of a beer, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeerDetails {
    pub name: String,
    pub style: String,
    pub upc: Upc,
    pub quantity_on_hand: i32,
    pub price: Price,
}

impl BeerInput {
    /// Check every constraint and return the validated details, or all
    /// violations found.
    pub fn validate(&self) -> Result<BeerDetails, Violations> {
        let mut violations = Violations::new();

        let name = check_name(self.name.as_deref(), &mut violations);
        let style = check_style(self.style.as_deref(), &mut violations);
        let upc = check_upc(self.upc.as_deref(), &mut violations);
        let quantity_on_hand = check_quantity(self.quantity_on_hand, &mut violations);
        let price = check_price(self.price, &mut violations);

        match (name, style, upc, quantity_on_hand, price) {
            (Some(name), Some(style), Some(upc), Some(quantity_on_hand), Some(price))
                if violations.is_empty() =>
            {
                Ok(BeerDetails {
                    name,
                    style,
                    upc,
                    quantity_on_hand,
                    price,
                })
            }
            _ => Err(violations),
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn check_name(value: Option<&str>, v: &mut Violations) -> Option<String> {
    match value {
        Some(s) if !is_blank(s) => {
            let len = s.chars().count();
            if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
                v.push(
                    "beerName",
                    format!(
                        "Beer name must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"
                    ),
                );
                return None;
            }
            Some(s.to_string())
        }
        _ => {
            v.push("beerName", "Beer name is required");
            None
        }
    }
}

fn check_style(value: Option<&str>, v: &mut Violations) -> Option<String> {
    match value {
        Some(s) if !is_blank(s) => {
            if s.chars().count() > STYLE_MAX_CHARS {
                v.push(
                    "beerStyle",
                    format!("Beer style must be at most {STYLE_MAX_CHARS} characters"),
                );
                return None;
            }
            Some(s.to_string())
        }
        _ => {
            v.push("beerStyle", "Beer style is required");
            None
        }
    }
}

fn check_upc(value: Option<&str>, v: &mut Violations) -> Option<Upc> {
    match value {
        Some(s) if !is_blank(s) => {
            let len = s.chars().count();
            if !(UPC_MIN_CHARS..=UPC_MAX_CHARS).contains(&len) {
                v.push(
                    "upc",
                    format!("UPC must be between {UPC_MIN_CHARS} and {UPC_MAX_CHARS} characters"),
                );
                return None;
            }
            Some(Upc(s.to_string()))
        }
        _ => {
            v.push("upc", "UPC is required");
            None
        }
    }
}

fn check_quantity(value: Option<i32>, v: &mut Violations) -> Option<i32> {
    match value {
        Some(q) if q >= 0 => Some(q),
        Some(_) => {
            v.push("quantityOnHand", "Quantity on hand must be 0 or greater");
            None
        }
        None => {
            v.push("quantityOnHand", "Quantity on hand is required");
            None
        }
    }
}

fn check_price(value: Option<Decimal>, v: &mut Violations) -> Option<Price> {
    let Some(price) = value else {
        v.push("price", "Price is required");
        return None;
    };

    let mut ok = true;
    if price <= Decimal::ZERO {
        v.push("price", "Price must be greater than 0");
        ok = false;
    }

    let integer_limit = Decimal::from(10_i64.pow(PRICE_MAX_INTEGER_DIGITS));
    if price.normalize().scale() > PRICE_MAX_FRACTION_DIGITS || price.trunc().abs() >= integer_limit {
        v.push(
            "price",
            format!(
                "Price must have up to {PRICE_MAX_INTEGER_DIGITS} integer and {PRICE_MAX_FRACTION_DIGITS} fraction digits"
            ),
        );
        ok = false;
    }

    ok.then(|| Price(price.normalize()))
}

/// Persisted catalog entry.
///
/// `id`, timestamps, `version` and the audit columns are owned by the store;
/// callers only ever change the business fields through [`Beer::apply_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beer {
    pub id: BeerId,
    pub name: String,
    pub style: String,
    pub upc: Upc,
    pub quantity_on_hand: i32,
    pub price: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
    pub created_by: String,
    pub updated_by: String,
}

impl AggregateRoot for Beer {
    type Id = BeerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Beer {
    /// Snapshot of the caller-editable fields.
    pub fn details(&self) -> BeerDetails {
        BeerDetails {
            name: self.name.clone(),
            style: self.style.clone(),
            upc: self.upc.clone(),
            quantity_on_hand: self.quantity_on_hand,
            price: self.price,
        }
    }

    /// Overwrite the business fields from validated details.
    ///
    /// The UPC is fixed at creation; whatever UPC the details carry is ignored.
    pub fn apply_update(&mut self, details: BeerDetails) {
        self.name = details.name;
        self.style = details.style;
        self.quantity_on_hand = details.quantity_on_hand;
        self.price = details.price;
    }

    /// Take `quantity` units out of stock.
    pub fn withdraw(&mut self, quantity: i32) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation(
                "quantity",
                "Withdrawal quantity must be greater than 0",
            ));
        }
        if quantity > self.quantity_on_hand {
            return Err(DomainError::InsufficientStock {
                beer_id: *self.id.as_uuid(),
                requested: quantity,
                available: self.quantity_on_hand,
            });
        }
        self.quantity_on_hand -= quantity;
        Ok(())
    }
}
