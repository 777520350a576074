use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use super::model::{SESSION_COOKIE, SessPayload};
use crate::AppState;
use crate::error::AppError;
use crate::models::LoginRequest;
use crate::result::{Resp, success, success_empty};
use crate::routes::read_json;

/// 登录：签发会话并写入 cookie
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Resp<SessPayload>>), AppError> {
    let req = read_json(payload)?;
    let sess = state.sessions.login(&req.username, &req.password).await?;

    let cookie = Cookie::build((SESSION_COOKIE, sess.sess_id.clone()))
        .path("/")
        .http_only(true);

    Ok((jar.add(cookie), success(SessPayload { sess })))
}

/// 注销：删除会话并清除 cookie
#[axum::debug_handler]
pub async fn delete_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(key): Path<String>,
) -> Result<(CookieJar, Json<Resp<()>>), AppError> {
    state.sessions.logout(&key).await?;
    Ok((
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        success_empty(),
    ))
}
