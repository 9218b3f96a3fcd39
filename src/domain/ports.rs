//! Ports consumed by the orchestrators.
//!
//! All three are synchronous: the adapters block on diesel and the HTTP
//! layer hops onto the blocking pool around each service call.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Order, Payment};
use super::product::{Product, ProductQuery};
use super::status::OrderStatus;

/// One requested order line, persisted as submitted (not per-unit expanded).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemRecord {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: BigDecimal,
    pub observation: Option<String>,
    pub effective_date: DateTime<Utc>,
}

/// Snapshot returned by a successful status update.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}

/// Exact-match order listing filter.
///
/// An empty filter means the default kitchen listing: everything that is
/// not yet terminal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.status.is_none()
    }
}

/// Message handed to the notification port.
///
/// `id` is a fresh idempotency identifier, `key` the routing/partition key
/// (the order id), `payload` the event body.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueMessage {
    pub id: Uuid,
    pub key: String,
    pub payload: serde_json::Value,
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Persists the order header and returns the generated identifier.
    fn save_order(&self, order: &Order, customer_id: Option<Uuid>) -> Result<Uuid, DomainError>;

    /// Persists one requested line against an already-saved order.
    fn save_order_item(&self, item: &OrderItemRecord) -> Result<(), DomainError>;

    /// Writes the new status (and payment summary, when given); `None` means
    /// no row matched the identifier.
    fn update_order_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
        payment: Option<&Payment>,
    ) -> Result<Option<StatusUpdate>, DomainError>;

    fn find_order_by_id(&self, order_id: Uuid) -> Result<Option<Order>, DomainError>;

    fn find_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, DomainError>;
}

pub trait ProductCatalog: Send + Sync + 'static {
    fn find_product(&self, query: &ProductQuery) -> Result<Option<Product>, DomainError>;
}

/// At-least-once asynchronous publication; retry and delivery are the
/// adapter's problem, callers treat a returned `Ok` as "accepted".
pub trait PaymentNotifier: Send + Sync + 'static {
    fn publish(&self, queue: &str, message: &QueueMessage) -> Result<(), DomainError>;
}
