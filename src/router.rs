use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::middleware::log_errors;
use crate::{AppState, routes};

// 用户相关的路由
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            post(routes::user::create_user).get(routes::user::list_users),
        )
        .route(
            "/users/{id}",
            get(routes::user::get_user)
                .put(routes::user::update_user)
                .delete(routes::user::delete_user),
        )
}

// 会话相关的路由
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sess", post(routes::session::create_session))
        .route("/sess/{key}", delete(routes::session::delete_session))
}

// 产品和订单相关的路由
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/prods", get(routes::product::list_products))
        .route("/orders", post(routes::order::create_order))
}

async fn root() -> &'static str {
    "coreserver"
}

// 创建主路由
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(user_routes())
        .merge(session_routes())
        .merge(shop_routes())
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
