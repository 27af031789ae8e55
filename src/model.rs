//! Data models for order packing.
//!
//! This module defines the fundamental data structures:
//! - `Product`: An item of an order with three dimensions
//! - `BoxTemplate`: A catalog box size
//! - `BoxInstance`: A box opened for one order, holding its assigned products
//! - `Order` / `PackingResponse`: What comes in and what goes out per order
//!
//! Field names on the wire are the service's established JSON names
//! (`altura`, `largura`, `comprimento`, `produtos`, `pedido_id`, `caixas`).

use std::fmt;

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::types::{Dimensional, Vec3};

/// Validation error for incoming order data.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Helper function to validate a single dimension.
fn validate_dimension(value: f64, name: &str, owner: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidDimension(format!(
            "{} of product '{}' must be positive, got: {}",
            name, owner, value
        )));
    }
    Ok(())
}

/// Represents a product of an order.
///
/// # Fields
/// * `id` - Product identifier as sent by the client
/// * `height`, `width`, `length` - Dimensions in centimeters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"id": "PS5", "altura": 40.0, "largura": 10.0, "comprimento": 25.0}))]
pub struct Product {
    pub id: String,
    #[serde(rename = "altura")]
    pub height: f64,
    #[serde(rename = "largura")]
    pub width: f64,
    #[serde(rename = "comprimento")]
    pub length: f64,
}

impl Product {
    /// Creates a new product with validation.
    ///
    /// # Examples
    /// ```
    /// use order_packer::model::Product;
    ///
    /// assert!(Product::new("P1", (20.0, 30.0, 70.0)).is_ok());
    /// assert!(Product::new("P2", (-1.0, 30.0, 70.0)).is_err());
    /// ```
    pub fn new(id: impl Into<String>, dims: (f64, f64, f64)) -> Result<Self, ValidationError> {
        let product = Self {
            id: id.into(),
            height: dims.0,
            width: dims.1,
            length: dims.2,
        };
        product.validate()?;
        Ok(product)
    }

    /// Checks identifier and dimensions.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidIdentifier(
                "Product id must not be empty".to_string(),
            ));
        }
        validate_dimension(self.height, "Height", &self.id)?;
        validate_dimension(self.width, "Width", &self.id)?;
        validate_dimension(self.length, "Length", &self.id)?;
        Ok(())
    }
}

impl Dimensional for Product {
    fn dimensions(&self) -> Vec3 {
        Vec3::new(self.height, self.width, self.length)
    }
}

/// Template for a box size in the catalog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxTemplate {
    pub id: u32,
    pub height: f64,
    pub width: f64,
    pub length: f64,
}

impl BoxTemplate {
    pub const fn new(id: u32, height: f64, width: f64, length: f64) -> Self {
        Self {
            id,
            height,
            width,
            length,
        }
    }

    /// Instantiates an empty box based on this template.
    pub fn instantiate(&self) -> BoxInstance {
        BoxInstance {
            id: self.id,
            height: self.height,
            width: self.width,
            length: self.length,
            products: Vec::new(),
        }
    }
}

impl Dimensional for BoxTemplate {
    fn dimensions(&self) -> Vec3 {
        Vec3::new(self.height, self.width, self.length)
    }
}

/// A box opened for one order.
///
/// `id` is the id of the template it was built from. Products are kept in
/// the order they were assigned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BoxInstance {
    pub id: u32,
    #[serde(rename = "altura")]
    pub height: f64,
    #[serde(rename = "largura")]
    pub width: f64,
    #[serde(rename = "comprimento")]
    pub length: f64,
    #[serde(rename = "produtos")]
    pub products: Vec<Product>,
}

impl BoxInstance {
    /// Sum of the volumes of all assigned products.
    pub fn used_volume(&self) -> f64 {
        self.products.iter().map(Dimensional::volume).sum()
    }

    /// Capacity left over after the assigned products.
    pub fn remaining_volume(&self) -> f64 {
        self.volume() - self.used_volume()
    }

    /// Appends a product. Callers check `geometry::can_fit` first.
    pub fn assign(&mut self, product: Product) {
        self.products.push(product);
    }
}

impl Dimensional for BoxInstance {
    fn dimensions(&self) -> Vec3 {
        Vec3::new(self.height, self.width, self.length)
    }
}

/// Order identifier.
///
/// Clients send either a number or a string; it is echoed back unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum OrderId {
    Number(i64),
    Text(String),
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderId::Number(n) => write!(f, "{}", n),
            OrderId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OrderId {
    fn from(value: i64) -> Self {
        OrderId::Number(value)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        OrderId::Text(value.to_string())
    }
}

/// A customer order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "pedido_id": 1,
        "produtos": [
            { "id": "PS5", "altura": 40.0, "largura": 10.0, "comprimento": 25.0 },
            { "id": "Volante", "altura": 40.0, "largura": 30.0, "comprimento": 30.0 }
        ]
    })
)]
pub struct Order {
    #[serde(rename = "pedido_id")]
    pub id: OrderId,
    #[serde(rename = "produtos", default)]
    pub products: Vec<Product>,
}

impl Order {
    pub fn new(id: impl Into<OrderId>, products: Vec<Product>) -> Self {
        Self {
            id: id.into(),
            products,
        }
    }

    /// Validates every product of the order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for product in &self.products {
            product.validate().map_err(|err| match err {
                ValidationError::InvalidDimension(msg) => ValidationError::InvalidDimension(
                    format!("order {}: {}", self.id, msg),
                ),
                ValidationError::InvalidIdentifier(msg) => ValidationError::InvalidIdentifier(
                    format!("order {}: {}", self.id, msg),
                ),
            })?;
        }
        Ok(())
    }
}

/// Result of packing one order.
///
/// # Fields
/// * `order_id` - Identifier of the packed order
/// * `boxes` - Opened boxes in the order they were opened
/// * `excluded` - Products no catalog box can hold; they appear in no box
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PackingResponse {
    #[serde(rename = "pedido_id")]
    pub order_id: OrderId,
    #[serde(rename = "caixas")]
    pub boxes: Vec<BoxInstance>,
    #[serde(
        rename = "produtos_excluidos",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub excluded: Vec<Product>,
}

impl PackingResponse {
    /// Number of boxes used.
    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    /// Number of products that could not be packed.
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    /// Indicates whether every product ended up in a box.
    pub fn is_complete(&self) -> bool {
        self.excluded.is_empty()
    }
}
