use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::{PaymentNotifier, QueueMessage};
use crate::schema::payment_outbox;

use super::models::NewOutboxEventRow;

const EVENT_TYPE: &str = "PaymentRequested";

/// Transactional-outbox notifier.
///
/// A publish is a local insert; a CDC relay (Debezium's EventRouter) tails
/// the table out of process and owns delivery. It routes by
/// `aggregate_type` — the queue name — and keys messages by `aggregate_id`,
/// which gives the at-least-once contract the port promises without this
/// service ever talking to a broker.
pub struct OutboxPaymentNotifier {
    pool: DbPool,
}

impl OutboxPaymentNotifier {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl PaymentNotifier for OutboxPaymentNotifier {
    fn publish(&self, queue: &str, message: &QueueMessage) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(payment_outbox::table)
            .values(&NewOutboxEventRow {
                id: message.id,
                aggregate_type: queue.to_string(),
                aggregate_id: message.key.clone(),
                event_type: EVENT_TYPE.to_string(),
                payload: message.payload.clone(),
            })
            .execute(&mut conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    use super::OutboxPaymentNotifier;
    use crate::domain::ports::{PaymentNotifier, QueueMessage};
    use crate::infrastructure::models::OutboxEventRow;
    use crate::infrastructure::testutil::setup_db;
    use crate::schema::payment_outbox;

    #[tokio::test]
    async fn publish_writes_one_outbox_row() {
        let (_container, pool) = setup_db().await;
        let notifier = OutboxPaymentNotifier::new(pool.clone());
        let order_id = Uuid::new_v4();
        let message = QueueMessage {
            id: Uuid::new_v4(),
            key: order_id.to_string(),
            payload: json!({ "orderId": order_id, "payment": { "type": "PIX" } }),
        };

        notifier
            .publish("payment-requests", &message)
            .expect("publish failed");

        let mut conn = pool.get().expect("connection");
        let events: Vec<OutboxEventRow> = payment_outbox::table
            .filter(payment_outbox::aggregate_id.eq(order_id.to_string()))
            .select(OutboxEventRow::as_select())
            .load(&mut conn)
            .expect("query failed");

        assert_eq!(events.len(), 1, "exactly one outbox event per publish");
        assert_eq!(events[0].id, message.id);
        assert_eq!(events[0].aggregate_type, "payment-requests");
        assert_eq!(events[0].event_type, "PaymentRequested");
        assert_eq!(events[0].payload["payment"]["type"], "PIX");
    }

    #[tokio::test]
    async fn a_reused_idempotency_id_is_rejected() {
        let (_container, pool) = setup_db().await;
        let notifier = OutboxPaymentNotifier::new(pool);
        let message = QueueMessage {
            id: Uuid::new_v4(),
            key: Uuid::new_v4().to_string(),
            payload: json!({}),
        };

        notifier
            .publish("payment-requests", &message)
            .expect("first publish failed");
        let second = notifier.publish("payment-requests", &message);

        assert!(second.is_err(), "primary key must dedupe retried ids");
    }
}
