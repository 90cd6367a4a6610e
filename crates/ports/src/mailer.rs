//! Mailer trait 定义

use async_trait::async_trait;

/// 验证码邮件发送者
///
/// 实现必须自行吞掉所有传输层错误，只以布尔值报告结果。
#[async_trait]
pub trait Mailer: Send + Sync {
    /// 发送验证码，成功返回 `true`
    async fn send_code(&self, to: &str, code: &str) -> bool;
}
