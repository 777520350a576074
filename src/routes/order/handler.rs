use axum::{Json, extract::rejection::JsonRejection};
use serde::Serialize;

use crate::error::AppError;
use crate::models::{CreateOrderRequest, Order};
use crate::result::{Resp, success};
use crate::routes::read_json;

#[derive(Debug, Serialize)]
pub struct OrderPayload {
    pub order: Order,
}

#[axum::debug_handler]
pub async fn create_order(
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<Resp<OrderPayload>>, AppError> {
    let req = read_json(payload)?;
    let order = Order::create(req)?;
    Ok(success(OrderPayload { order }))
}
