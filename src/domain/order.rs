//! Order aggregate root.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;
use super::product::Product;
use super::status::{InvalidTransition, OrderStatus, StatusAction};

/// Payment summary attached to an order after a payment event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    #[serde(rename = "type")]
    pub method: String,
    pub status: String,
    pub external_id: String,
    pub effective_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order as the lifecycle engine sees it.
///
/// `items` holds the denormalized per-unit expansion (a quantity of 3 is
/// three entries of the same product); that list is what the creation-time
/// total reconciliation sums over. After construction only `status`,
/// `payment` and `updated_at` ever change, and the status only through the
/// state machine.
#[derive(Debug, Clone)]
pub struct Order {
    id: Option<Uuid>,
    total_amount: BigDecimal,
    status: OrderStatus,
    items: Vec<Product>,
    customer_id: Option<Uuid>,
    payment: Option<Payment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds an order in any of the six states.
    ///
    /// The status parameter exists because orders are also reconstructed
    /// from storage; fresh orders always pass [`OrderStatus::Pending`].
    /// Rejects a negative total.
    pub fn new(
        total_amount: BigDecimal,
        status: OrderStatus,
        items: Vec<Product>,
        customer_id: Option<Uuid>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if total_amount < BigDecimal::from(0) {
            return Err(DomainError::BusinessRule(
                "the total amount cannot be negative".to_string(),
            ));
        }
        Ok(Self {
            id: None,
            total_amount,
            status,
            items,
            customer_id,
            payment: None,
            created_at,
            updated_at,
        })
    }

    /// Attaches the persisted identifier (used when restoring from storage).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn total_amount(&self) -> &BigDecimal {
        &self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn customer_id(&self) -> Option<Uuid> {
        self.customer_id
    }

    pub fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Runs `action` through the state machine, replacing the status value
    /// on success. A rejected transition leaves the order untouched.
    pub fn apply(&mut self, action: StatusAction) -> Result<(), InvalidTransition> {
        self.status = self.status.apply(action)?;
        Ok(())
    }

    pub fn receive(&mut self) -> Result<(), InvalidTransition> {
        self.apply(StatusAction::Receive)
    }

    pub fn init(&mut self) -> Result<(), InvalidTransition> {
        self.apply(StatusAction::Init)
    }

    pub fn make_ready(&mut self) -> Result<(), InvalidTransition> {
        self.apply(StatusAction::Ready)
    }

    pub fn finish(&mut self) -> Result<(), InvalidTransition> {
        self.apply(StatusAction::Finish)
    }

    pub fn cancel(&mut self) -> Result<(), InvalidTransition> {
        self.apply(StatusAction::Cancel)
    }
}
