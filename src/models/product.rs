use std::path::Path;

use serde::{Deserialize, Serialize};

pub const PRICE_UNIT_RMB: &str = "￥";
pub const PRICE_UNIT_USD: &str = "$";
pub const DATAFLOW_UNIT_MB: &str = "MB";
pub const DATAFLOW_UNIT_GB: &str = "GB";
pub const EXPIRE_UNIT_MONTH: &str = "Month";
pub const EXPIRE_UNIT_YEAR: &str = "Year";

/// 在售套餐
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f32,
    pub price_unit: String,
    pub dataflow: f32,
    pub dataflow_unit: String,
    pub expire: f32,
    pub expire_unit: String,
}

/// 产品目录，启动时加载一次，运行期间只读
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// 从 JSON 文件加载，文件不存在或内容无效时使用内置目录
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::info!(
                    "Product file {} not readable ({}), using built-in catalog",
                    path.display(),
                    e
                );
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<Product>>(&content) {
            Ok(products) => {
                tracing::info!("Loaded {} products from {}", products.len(), path.display());
                Self { products }
            }
            Err(e) => {
                tracing::warn!(
                    "Invalid product file {}: {}, using built-in catalog",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            products: vec![
                Product {
                    id: String::new(),
                    name: "Free".to_string(),
                    description: "Free account".to_string(),
                    price: 0.0,
                    price_unit: PRICE_UNIT_RMB.to_string(),
                    dataflow: 1024.0,
                    dataflow_unit: DATAFLOW_UNIT_MB.to_string(),
                    expire: 1.0,
                    expire_unit: EXPIRE_UNIT_MONTH.to_string(),
                },
                Product {
                    id: String::new(),
                    name: "1元包月".to_string(),
                    description: "1元包月, 10GB".to_string(),
                    price: 1.0,
                    price_unit: PRICE_UNIT_RMB.to_string(),
                    dataflow: 10.0 * 1024.0,
                    dataflow_unit: DATAFLOW_UNIT_MB.to_string(),
                    expire: 1.0,
                    expire_unit: EXPIRE_UNIT_MONTH.to_string(),
                },
            ],
        }
    }
}
