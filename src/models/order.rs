use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::utils::COMPACT_TIME_LAYOUT;

/// 订单号随机后缀长度
const ORDER_SUFFIX_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStat {
    /// 等待支付
    #[default]
    Paying,
    Canceled,
    Finished,
}

/// 套餐订单（暂不持久化）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub username: String,
    pub product_id: String,
    pub begin_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub stat: OrderStat,
}

/// POST /orders 的请求体
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub product_id: String,
}

impl Order {
    pub fn create(req: CreateOrderRequest) -> Result<Self, AppError> {
        if req.username.is_empty() {
            return Err(AppError::Validation("username is required".into()));
        }
        if req.product_id.is_empty() {
            return Err(AppError::Validation("product_id is required".into()));
        }

        let now = Utc::now();
        let order = Order {
            id: generate_order_id(now),
            username: req.username,
            product_id: req.product_id,
            begin_time: now,
            end_time: None,
            stat: OrderStat::Paying,
        };

        tracing::info!(
            "Created order {} for user {} (product {})",
            order.id,
            order.username,
            order.product_id
        );
        Ok(order)
    }
}

/// 时间前缀 + 随机后缀
fn generate_order_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}",
        now.format(COMPACT_TIME_LAYOUT),
        &suffix[..ORDER_SUFFIX_LEN]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, product_id: &str) -> CreateOrderRequest {
        CreateOrderRequest {
            username: username.to_string(),
            product_id: product_id.to_string(),
        }
    }

    #[test]
    fn order_id_is_time_prefixed() {
        let order = Order::create(request("tom", "free")).unwrap();
        assert_eq!(order.id.len(), 14 + ORDER_SUFFIX_LEN);
        assert!(order.id[..14].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(order.stat, OrderStat::Paying);

        let other = Order::create(request("tom", "free")).unwrap();
        assert_ne!(order.id, other.id);
    }

    #[test]
    fn missing_fields_are_rejected() {
        assert!(matches!(
            Order::create(request("", "free")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            Order::create(request("tom", "")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn stat_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(OrderStat::Canceled).unwrap(),
            serde_json::json!("canceled")
        );
    }
}
