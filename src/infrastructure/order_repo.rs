use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, Payment};
use crate::domain::ports::{OrderFilter, OrderItemRecord, OrderRepository, StatusUpdate};
use crate::domain::status::OrderStatus;
use crate::schema::{order_items, orders};

use super::models::{NewOrderItemRow, NewOrderRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_status(id: Uuid, raw: &str) -> Result<OrderStatus, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::Persistence(format!("order {id} carries unknown status '{raw}'")))
}

fn order_from_row(row: OrderRow) -> Result<Order, DomainError> {
    let status = parse_status(row.id, &row.status)?;
    let mut order = Order::new(
        row.total_amount,
        status,
        vec![],
        row.customer_id,
        row.created_at,
        row.updated_at,
    )?
    .with_id(row.id);
    if let Some(value) = row.payment {
        let payment: Payment = serde_json::from_value(value).map_err(|e| {
            DomainError::Persistence(format!("order {} carries unreadable payment: {e}", row.id))
        })?;
        order = order.with_payment(payment);
    }
    Ok(order)
}

impl OrderRepository for DieselOrderRepository {
    fn save_order(&self, order: &Order, customer_id: Option<Uuid>) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;
        let order_id = Uuid::new_v4();
        diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                id: order_id,
                customer_id,
                status: order.status().as_str().to_string(),
                total_amount: order.total_amount().clone(),
                created_at: order.created_at(),
                updated_at: order.updated_at(),
            })
            .execute(&mut conn)?;
        Ok(order_id)
    }

    fn save_order_item(&self, item: &OrderItemRecord) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(order_items::table)
            .values(&NewOrderItemRow {
                id: Uuid::new_v4(),
                order_id: item.order_id,
                product_id: item.product_id,
                quantity: item.quantity as i32,
                unit_price: item.unit_price.clone(),
                observation: item.observation.clone(),
                created_at: item.effective_date,
            })
            .execute(&mut conn)?;
        Ok(())
    }

    fn update_order_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
        payment: Option<&Payment>,
    ) -> Result<Option<StatusUpdate>, DomainError> {
        let mut conn = self.pool.get()?;

        // The payment column is only touched when a summary is supplied, so
        // a plain status transition never erases a recorded payment.
        let row: Option<(String, DateTime<Utc>)> = match payment {
            Some(payment) => {
                let value = serde_json::to_value(payment).map_err(|e| {
                    DomainError::Persistence(format!("payment summary not serializable: {e}"))
                })?;
                diesel::update(orders::table.filter(orders::id.eq(order_id)))
                    .set((
                        orders::status.eq(status.as_str()),
                        orders::updated_at.eq(updated_at),
                        orders::payment.eq(value),
                    ))
                    .returning((orders::status, orders::updated_at))
                    .get_result(&mut conn)
                    .optional()?
            }
            None => diesel::update(orders::table.filter(orders::id.eq(order_id)))
                .set((
                    orders::status.eq(status.as_str()),
                    orders::updated_at.eq(updated_at),
                ))
                .returning((orders::status, orders::updated_at))
                .get_result(&mut conn)
                .optional()?,
        };

        row.map(|(raw, updated_at)| {
            Ok(StatusUpdate {
                status: parse_status(order_id, &raw)?,
                updated_at,
            })
        })
        .transpose()
    }

    fn find_order_by_id(&self, order_id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        orders::table
            .filter(orders::id.eq(order_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(order_from_row)
            .transpose()
    }

    fn find_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = orders::table
            .select(OrderRow::as_select())
            .order(orders::created_at.asc())
            .into_boxed();
        if filter.is_empty() {
            // default kitchen listing: hide what nobody is waiting on
            query = query.filter(orders::status.ne_all(vec![
                OrderStatus::Finished.as_str(),
                OrderStatus::Cancelled.as_str(),
            ]));
        } else {
            if let Some(id) = filter.id {
                query = query.filter(orders::id.eq(id));
            }
            if let Some(status) = filter.status {
                query = query.filter(orders::status.eq(status.as_str()));
            }
        }

        query
            .load::<OrderRow>(&mut conn)?
            .into_iter()
            .map(order_from_row)
            .collect()
    }
}
