//! Email 适配器
//!
//! 提供验证码邮件发送功能，支持：
//! - SMTP 邮件发送（STARTTLS 或隐式 TLS）
//! - 验证码模板渲染
//! - HTML 和纯文本邮件

mod client;
mod mailer;
mod template;

pub use client::{EmailClient, EmailMessage};
pub use mailer::SmtpCodeMailer;
pub use template::{CodeEmailTemplate, RenderedEmail};

use mailgate_errors::AppResult;

/// 邮件发送接口
#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    /// 发送纯文本邮件
    async fn send_text_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;

    /// 发送 HTML 邮件
    async fn send_html_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        text_body: Option<&str>,
    ) -> AppResult<()>;
}
