//! Turns a priced leaf, an optional quality tier and a quantity into a cost range.

use thiserror::Error;

use crate::catalog::{LeafPricing, Price};
use crate::currency::MoneyFormatter;

/// Fixed contingency margin applied on top of the base cost.
pub const CONTINGENCY_MARGIN: f64 = 1.25;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Kualitas material belum dipilih.")]
    MissingQualityTier,
    #[error("Input tidak valid.")]
    InvalidQuantity,
}

/// Estimated cost between the base cost and the base cost plus contingency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRange {
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl CostRange {
    pub fn render(&self, formatter: &MoneyFormatter) -> String {
        formatter.format_range(self.lower_bound, self.upper_bound)
    }
}

/// Unit price of a leaf; tiered leaves need a tier present in their price map.
pub fn unit_price(leaf: &LeafPricing, quality_tier: Option<&str>) -> Result<f64, PricingError> {
    match &leaf.price {
        Price::Flat(value) => Ok(*value),
        Price::Tiered(prices) => quality_tier
            .and_then(|tier| prices.get(tier))
            .copied()
            .ok_or(PricingError::MissingQualityTier),
    }
}

/// Parses the primary field's raw text into a positive, finite quantity.
pub fn parse_quantity(raw: &str) -> Result<f64, PricingError> {
    let quantity: f64 = raw
        .trim()
        .parse()
        .map_err(|_| PricingError::InvalidQuantity)?;
    validate_quantity(quantity)
}

fn validate_quantity(quantity: f64) -> Result<f64, PricingError> {
    if quantity.is_finite() && quantity > 0.0 {
        Ok(quantity)
    } else {
        Err(PricingError::InvalidQuantity)
    }
}

pub fn resolve(
    leaf: &LeafPricing,
    quality_tier: Option<&str>,
    quantity: f64,
) -> Result<CostRange, PricingError> {
    let price = unit_price(leaf, quality_tier)?;
    let quantity = validate_quantity(quantity)?;
    let lower_bound = price * quantity;
    let upper_bound = lower_bound * CONTINGENCY_MARGIN;
    // A finite quantity can still overflow once multiplied.
    if !upper_bound.is_finite() {
        return Err(PricingError::InvalidQuantity);
    }
    Ok(CostRange {
        lower_bound,
        upper_bound,
    })
}

/// Resolves from the raw primary field text. The tier is checked before the quantity.
pub fn resolve_input(
    leaf: &LeafPricing,
    quality_tier: Option<&str>,
    raw_quantity: &str,
) -> Result<CostRange, PricingError> {
    unit_price(leaf, quality_tier)?;
    let quantity = parse_quantity(raw_quantity)?;
    resolve(leaf, quality_tier, quantity)
}
