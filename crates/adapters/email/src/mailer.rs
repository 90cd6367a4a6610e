//! SMTP 验证码发送者

use std::sync::Arc;

use async_trait::async_trait;
use mailgate_ports::Mailer;
use tracing::warn;

use crate::{CodeEmailTemplate, EmailSender};

/// 渲染验证码模板并通过 [`EmailSender`] 发送，错误只以 `false` 报告
pub struct SmtpCodeMailer {
    sender: Arc<dyn EmailSender>,
    template: CodeEmailTemplate,
}

impl SmtpCodeMailer {
    pub fn new(sender: Arc<dyn EmailSender>, template: CodeEmailTemplate) -> Self {
        Self { sender, template }
    }
}

#[async_trait]
impl Mailer for SmtpCodeMailer {
    async fn send_code(&self, to: &str, code: &str) -> bool {
        let email = self.template.render(code);

        let result = match &email.html_body {
            Some(html) => {
                self.sender
                    .send_html_email(to, &email.subject, html, Some(&email.text_body))
                    .await
            }
            None => {
                self.sender
                    .send_text_email(to, &email.subject, &email.text_body)
                    .await
            }
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(to = %to, category = e.category(), error = %e, "Error sending email");
                false
            }
        }
    }
}
