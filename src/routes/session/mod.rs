mod handler;
mod model;

pub use handler::{create_session, delete_session};
pub use model::{SESSION_COOKIE, SessPayload};
