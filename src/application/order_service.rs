//! Order lifecycle orchestrators.
//!
//! One service, three operations: create an order, move it through the
//! state machine, list what the kitchen still cares about. Pure logic and
//! validation live here; every side effect goes through a port.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, Payment};
use crate::domain::ports::{
    OrderFilter, OrderItemRecord, OrderRepository, PaymentNotifier, ProductCatalog, QueueMessage,
};
use crate::domain::product::{Product, ProductQuery};
use crate::domain::status::{OrderStatus, StatusAction};

use super::clock::{Clock, IdGen};

/// Payment method requested when none is negotiated yet.
const DEFAULT_PAYMENT_METHOD: &str = "PIX";

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    pub quantity: u32,
    pub observation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderInput {
    pub customer_id: Option<Uuid>,
    pub items: Vec<OrderItemInput>,
    pub order_amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderOutput {
    pub id: Uuid,
    pub status: OrderStatus,
    pub effective_date: DateTime<Utc>,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOrderStatusInput {
    pub order_id: Option<Uuid>,
    pub status: Option<String>,
    pub payment: Option<Payment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOrderStatusOutput {
    pub previous_status: OrderStatus,
    pub current_status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOrdersInput {
    pub id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub id: Uuid,
    pub status: OrderStatus,
    pub effective_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_amount: BigDecimal,
    pub customer_id: Option<Uuid>,
    pub payment: Option<Payment>,
    /// Whole minutes since the order was placed, derived at read time.
    pub waiting_time: i64,
}

pub struct OrderService<C, R, N, T, G> {
    catalog: C,
    repo: R,
    notifier: N,
    clock: T,
    ids: G,
    payment_queue: String,
}

impl<C, R, N, T, G> OrderService<C, R, N, T, G>
where
    C: ProductCatalog,
    R: OrderRepository,
    N: PaymentNotifier,
    T: Clock,
    G: IdGen,
{
    pub fn new(catalog: C, repo: R, notifier: N, clock: T, ids: G, payment_queue: String) -> Self {
        Self {
            catalog,
            repo,
            notifier,
            clock,
            ids,
            payment_queue,
        }
    }

    /// Creates a `PENDING` order from the requested lines.
    ///
    /// Every product must resolve through the catalog and the per-unit
    /// price sum must equal the caller-declared amount exactly; either
    /// failure aborts before anything is written. The payment request is
    /// published last and is deliberately non-fatal.
    pub fn create_order(&self, input: CreateOrderInput) -> Result<CreateOrderOutput, DomainError> {
        let mut resolved: Vec<(Product, &OrderItemInput)> = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let product = self
                .catalog
                .find_product(&ProductQuery::Id(item.product_id))?
                .ok_or_else(|| DomainError::NotFound(format!("product {}", item.product_id)))?;
            resolved.push((product, item));
        }

        let expanded: Vec<Product> = resolved
            .iter()
            .flat_map(|(product, item)| {
                std::iter::repeat(product.clone()).take(item.quantity as usize)
            })
            .collect();
        let computed = expanded
            .iter()
            .fold(BigDecimal::from(0), |total, product| total + &product.price);
        if computed != input.order_amount {
            return Err(DomainError::BusinessRule(
                "the declared order amount does not match the items total".to_string(),
            ));
        }

        let now = self.clock.now();
        let order = Order::new(
            input.order_amount.clone(),
            OrderStatus::Pending,
            expanded,
            input.customer_id,
            now,
            now,
        )?;
        let order_id = self.repo.save_order(&order, input.customer_id)?;
        for (product, item) in &resolved {
            self.repo.save_order_item(&OrderItemRecord {
                order_id,
                product_id: product.id,
                quantity: item.quantity,
                unit_price: product.price.clone(),
                observation: item.observation.clone(),
                effective_date: now,
            })?;
        }

        let message = QueueMessage {
            id: self.ids.next_id(),
            key: order_id.to_string(),
            payload: json!({
                "orderId": order_id,
                "orderAmount": input.order_amount.to_string(),
                "items": input
                    .items
                    .iter()
                    .map(|item| json!({
                        "productId": item.product_id,
                        "quantity": item.quantity,
                        "observation": item.observation,
                    }))
                    .collect::<Vec<_>>(),
                "payment": { "type": DEFAULT_PAYMENT_METHOD },
            }),
        };
        if let Err(err) = self.notifier.publish(&self.payment_queue, &message) {
            // The order already exists; delivery is at-least-once on the
            // adapter side, so the creation result stays successful.
            log::warn!("payment request for order {order_id} was not published: {err}");
        }

        Ok(CreateOrderOutput {
            id: order_id,
            status: order.status(),
            effective_date: now,
            total_amount: input.order_amount,
        })
    }

    /// Moves a persisted order along one lifecycle edge.
    ///
    /// The requested target is validated by name first (`PENDING` is never a
    /// target), then replayed through the state machine of the loaded
    /// order; a transition the current state does not define fails before
    /// anything is persisted.
    pub fn update_order_status(
        &self,
        input: UpdateOrderStatusInput,
    ) -> Result<UpdateOrderStatusOutput, DomainError> {
        let (order_id, status_raw) = match (input.order_id, input.status) {
            (Some(id), Some(raw)) if !raw.is_empty() => (id, raw),
            _ => {
                return Err(DomainError::MissingData(
                    "order id and target status are required".to_string(),
                ))
            }
        };
        let target: OrderStatus = status_raw
            .parse()
            .map_err(|_| DomainError::InvalidData(format!("unknown order status '{status_raw}'")))?;
        let action = StatusAction::for_target(target).ok_or_else(|| {
            DomainError::InvalidData("no transition targets the PENDING status".to_string())
        })?;

        let mut order = self
            .repo
            .find_order_by_id(order_id)?
            .ok_or_else(|| DomainError::NotFound(format!("order {order_id}")))?;
        let previous_status = order.status();
        order
            .apply(action)
            .map_err(|rejected| DomainError::BusinessRule(rejected.to_string()))?;

        let updated = self
            .repo
            .update_order_status(order_id, order.status(), self.clock.now(), input.payment.as_ref())?
            .ok_or_else(|| {
                DomainError::InvalidData("order status update affected no row".to_string())
            })?;

        Ok(UpdateOrderStatusOutput {
            previous_status,
            current_status: updated.status,
            updated_at: updated.updated_at,
        })
    }

    /// Lists orders for the kitchen display.
    ///
    /// Unfiltered, the repository hides terminal orders; with filters the
    /// caller sees exactly what it asked for. Waiting time is derived here,
    /// never stored.
    pub fn search_orders(&self, input: SearchOrdersInput) -> Result<Vec<OrderSummary>, DomainError> {
        let mut filter = OrderFilter {
            id: input.id,
            status: None,
        };
        if let Some(raw) = input.status.filter(|raw| !raw.is_empty()) {
            let status: OrderStatus = raw
                .parse()
                .map_err(|_| DomainError::InvalidData(format!("unknown order status '{raw}'")))?;
            filter.status = Some(status);
        }

        let now = self.clock.now();
        self.repo
            .find_orders(&filter)?
            .into_iter()
            .map(|order| {
                let id = order.id().ok_or_else(|| {
                    DomainError::Persistence("order row without identifier".to_string())
                })?;
                Ok(OrderSummary {
                    id,
                    status: order.status(),
                    effective_date: order.created_at(),
                    updated_at: order.updated_at(),
                    total_amount: order.total_amount().clone(),
                    customer_id: order.customer_id(),
                    payment: order.payment().cloned(),
                    waiting_time: (now - order.created_at()).num_minutes().max(0),
                })
            })
            .collect()
    }
}
