//! 通用类型定义

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 平台用户 ID（Discord snowflake）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct UserId(pub u64);

impl UserId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// 管理日志中使用的提及格式
    pub fn mention(self) -> String {
        format!("<@{}>", self.0)
    }
}

/// 等待验证码确认的验证记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingVerification {
    /// 用户 ID
    pub user_id: UserId,
    /// 提交的邮箱地址
    pub email: String,
    /// 验证码（6位数字）
    pub code: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl PendingVerification {
    pub fn new(user_id: UserId, email: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            code: code.into(),
            created_at: Utc::now(),
        }
    }

    /// 记录存在的时长
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display_and_mention() {
        let user_id = UserId::from(42_u64);
        assert_eq!(user_id.to_string(), "42");
        assert_eq!(user_id.mention(), "<@42>");
    }

    #[test]
    fn test_pending_verification_is_fresh() {
        let pending = PendingVerification::new(UserId::new(7), "a@b.com", "012345");
        assert_eq!(pending.code, "012345");
        assert!(pending.age() < chrono::Duration::seconds(5));
    }
}
