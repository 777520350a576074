mod handler;

pub use handler::{ProductsPayload, list_products};
