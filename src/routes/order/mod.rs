mod handler;

pub use handler::{OrderPayload, create_order};
