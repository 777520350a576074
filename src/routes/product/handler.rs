use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;
use crate::models::Product;
use crate::result::{Resp, success};

#[derive(Debug, Serialize)]
pub struct ProductsPayload {
    pub products: Vec<Product>,
}

#[axum::debug_handler]
pub async fn list_products(State(state): State<AppState>) -> Json<Resp<ProductsPayload>> {
    success(ProductsPayload {
        products: state.catalog.products().to_vec(),
    })
}
