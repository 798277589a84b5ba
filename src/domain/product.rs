use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents a product in the catalog.
///
/// # Actor Framework
/// This struct implements the [`Entity`](crate::actor_framework::Entity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::actor_framework::ResourceActor).
///
/// See `product_actor::entity` for:
/// - Creation and update payload ([`ProductInput`])
/// - Query filter ([`ProductQuery`])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
}

impl Product {
    /// Builds a stored product from its assigned id and a validated input.
    pub fn new(id: Uuid, input: ProductInput) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            quantity: input.quantity,
        }
    }

    /// Replaces every field except `id`.
    pub fn apply(&mut self, input: ProductInput) {
        self.name = input.name;
        self.description = input.description;
        self.price = input.price;
        self.quantity = input.quantity;
    }
}

/// Client-supplied product fields, used for create and for full replacement on update.
///
/// Any `id` in an incoming body is ignored; the store assigns ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0), custom(function = "validate_finite"))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub quantity: i32,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, price: f64, quantity: i32) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            quantity,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn validate_not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_finite(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::new("finite"));
    }
    Ok(())
}

/// One entry of a batch update; `id` selects the product to replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductBatchUpdate {
    pub id: Uuid,
    #[serde(flatten)]
    pub input: ProductInput,
}

impl ProductBatchUpdate {
    pub fn new(id: Uuid, input: ProductInput) -> Self {
        Self { id, input }
    }
}

/// Optional query predicates, combined with AND. An absent field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name.
    #[serde(default, alias = "name")]
    pub name_contains: Option<String>,
    /// Inclusive lower price bound.
    #[serde(default)]
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    #[serde(default)]
    pub max_price: Option<f64>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    pub fn min_price(mut self, min: f64) -> Self {
        self.min_price = Some(min);
        self
    }

    pub fn max_price(mut self, max: f64) -> Self {
        self.max_price = Some(max);
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        // A blank needle is treated as no name filter at all.
        if let Some(needle) = self.name_contains.as_deref().filter(|n| !n.trim().is_empty()) {
            if !product.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        true
    }
}
