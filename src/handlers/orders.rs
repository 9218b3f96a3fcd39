use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::{
    CreateOrderInput, OrderItemInput, OrderSummary, SearchOrdersInput, UpdateOrderStatusInput,
};
use crate::domain::errors::DomainError;
use crate::domain::order::Payment;
use crate::errors::AppError;
use crate::AppService;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
    pub observation: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Option<Uuid>,
    pub items: Vec<OrderItemRequest>,
    /// Decimal amount as a string to avoid floating-point issues, e.g. "29.90"
    pub order_amount: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub id: Uuid,
    pub status: String,
    pub effective_date: String,
    pub total_amount: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
    pub payment: Option<Payment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateOrderStatusResponse {
    pub previous_status: String,
    pub current_status: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchOrdersParams {
    pub id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummaryResponse {
    pub id: Uuid,
    pub status: String,
    pub effective_date: String,
    pub updated_at: String,
    pub total_amount: String,
    pub customer_id: Option<Uuid>,
    pub payment: Option<Payment>,
    /// Minutes since the order was placed.
    pub waiting_time: i64,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(summary: OrderSummary) -> Self {
        Self {
            id: summary.id,
            status: summary.status.to_string(),
            effective_date: summary.effective_date.to_rfc3339(),
            updated_at: summary.updated_at.to_rfc3339(),
            total_amount: summary.total_amount.to_string(),
            customer_id: summary.customer_id,
            payment: summary.payment,
            waiting_time: summary.waiting_time,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates a new order from the requested lines. Product prices come from
/// the catalog and their sum must equal `order_amount` exactly; the payment
/// request is queued as part of the same operation.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = CreateOrderResponse),
        (status = 400, description = "Malformed input"),
        (status = 404, description = "A referenced product does not exist"),
        (status = 422, description = "Declared amount does not match the items total"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<AppService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let order_amount = BigDecimal::from_str(&body.order_amount).map_err(|e| {
        AppError::from(DomainError::InvalidData(format!(
            "invalid order_amount '{}': {e}",
            body.order_amount
        )))
    })?;
    let input = CreateOrderInput {
        customer_id: body.customer_id,
        items: body
            .items
            .into_iter()
            .map(|item| OrderItemInput {
                product_id: item.product_id,
                quantity: item.quantity,
                observation: item.observation,
            })
            .collect(),
        order_amount,
    };

    let output = web::block(move || service.create_order(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        id: output.id,
        status: output.status.to_string(),
        effective_date: output.effective_date.to_rfc3339(),
        total_amount: output.total_amount.to_string(),
    }))
}

/// GET /orders
///
/// Lists orders for the kitchen display. Without filters, finished and
/// cancelled orders are hidden; `id` and `status` filter exactly.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("id" = Option<Uuid>, Query, description = "Order UUID to match exactly"),
        ("status" = Option<String>, Query, description = "Lifecycle status to match exactly"),
    ),
    responses(
        (status = 200, description = "Matching orders", body = [OrderSummaryResponse]),
        (status = 400, description = "Unknown status value"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn search_orders(
    service: web::Data<AppService>,
    query: web::Query<SearchOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let input = SearchOrdersInput {
        id: params.id,
        status: params.status,
    };

    let summaries = web::block(move || service.search_orders(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderSummaryResponse> = summaries
        .into_iter()
        .map(OrderSummaryResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PATCH /orders/{id}/status
///
/// Requests one lifecycle transition. The target status must be reachable
/// from the order's current state; `PENDING` is never a valid target.
#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UpdateOrderStatusResponse),
        (status = 400, description = "Missing or unknown target status"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Transition not allowed from the current status"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    service: web::Data<AppService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();
    let input = UpdateOrderStatusInput {
        order_id: Some(order_id),
        status: Some(body.status),
        payment: body.payment,
    };

    let output = web::block(move || service.update_order_status(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(UpdateOrderStatusResponse {
        previous_status: output.previous_status.to_string(),
        current_status: output.current_status.to_string(),
        updated_at: output.updated_at.to_rfc3339(),
    }))
}
