// 存储模块
// 包含键值存储和基于它的用户存储库

pub mod repositories;
pub mod store;

// 重新导出常用类型，方便其他模块使用
pub use repositories::user::UserRepository;
pub use store::{KvStore, StoreError};
