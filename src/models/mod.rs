pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::{CreateOrderRequest, Order, OrderStat};
pub use product::{Catalog, Product};
pub use session::{LoginRequest, Session};
pub use user::{CreateUserRequest, UpdateUserRequest, User};
