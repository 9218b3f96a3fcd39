//! Catalog values referenced by orders.

use bigdecimal::BigDecimal;
use uuid::Uuid;

/// A product as read from the catalog port.
///
/// Owned by the catalog; orders only reference it. The price is the unit
/// price in effect when the order line was resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
}

/// Typed single-field catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductQuery {
    Id(Uuid),
    Name(String),
}
