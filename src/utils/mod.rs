use bcrypt::{BcryptError, DEFAULT_COST, non_truncating_hash, non_truncating_verify};
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// 替换密码字段的固定占位符
pub const REDACTED: &str = "***";

/// bcrypt 只处理前 72 字节，更长的密码直接拒绝
pub const MAX_PASSWORD_BYTES: usize = 72;

/// 紧凑时间格式，用于订单号前缀
pub const COMPACT_TIME_LAYOUT: &str = "%Y%m%d%H%M%S";

/// 生成加盐的 bcrypt 哈希，每次调用的盐都不同
///
/// 超出 bcrypt 长度上限的密码返回参数错误，不做截断。
pub fn hash_password(password: &str) -> Result<String, AppError> {
    check_password_len(password)?;
    Ok(non_truncating_hash(password.as_bytes(), DEFAULT_COST)?)
}

/// 密码长度校验，创建和更新用户时调用
pub fn check_password_len(password: &str) -> Result<(), AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::Validation(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

/// 校验密码，不匹配、超长或哈希格式错误都返回 false
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    match non_truncating_verify(password.as_bytes(), hashed) {
        Ok(matched) => Ok(matched),
        Err(BcryptError::Io(e)) => Err(AppError::Hashing(e.to_string())),
        Err(e) => {
            tracing::debug!("password not verified: {}", e);
            Ok(false)
        }
    }
}

/// 由用户名得到用户ID（同时也是存储键）
///
/// 按原始字节计算 SHA-256，区分大小写，不做任何规范化。
pub fn derive_user_id(username: &str) -> String {
    format!("{:x}", Sha256::digest(username.as_bytes()))
}
