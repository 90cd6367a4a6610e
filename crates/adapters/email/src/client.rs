//! 邮件客户端实现

use crate::EmailSender;
use lettre::message::{Mailbox, MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use mailgate_config::SmtpConfig;
use mailgate_errors::{AppError, AppResult};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, info};

/// 邮件消息
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: Option<String>,
    pub text_body: String,
}

/// 邮件客户端
pub struct EmailClient {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    timeout: Duration,
}

impl EmailClient {
    /// 创建新的邮件客户端
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let from = format!("{} <{}>", config.email_from_name, config.email_from)
            .parse()
            .map_err(|e| AppError::validation(format!("Invalid from address: {}", e)))?;

        Ok(Self {
            from,
            transport: Self::build_transport(config)?,
            timeout: config.timeout(),
        })
    }

    /// 构建 SMTP 传输
    fn build_transport(config: &SmtpConfig) -> AppResult<AsyncSmtpTransport<Tokio1Executor>> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().clone(),
        );

        let transport = if config.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server)
        }
        .map_err(|e| AppError::internal(format!("Failed to create SMTP transport: {}", e)))?
        .port(config.smtp_port)
        .credentials(credentials)
        .timeout(Some(config.timeout()))
        .build();

        Ok(transport)
    }

    /// 构建邮件消息
    fn build_message(&self, msg: &EmailMessage) -> AppResult<Message> {
        let to: Mailbox = msg
            .to
            .parse()
            .map_err(|e| AppError::validation(format!("Invalid to address: {}", e)))?;

        let message_builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&msg.subject);

        // 构建邮件体
        let body = if let Some(html) = &msg.html_body {
            // HTML + 纯文本备用
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_PLAIN)
                        .body(msg.text_body.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_HTML)
                        .body(html.clone()),
                )
        } else {
            // 仅纯文本
            MultiPart::alternative().singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_PLAIN)
                    .body(msg.text_body.clone()),
            )
        };

        let message = message_builder
            .multipart(body)
            .map_err(|e| AppError::internal(format!("Failed to build message: {}", e)))?;

        Ok(message)
    }

    /// 发送邮件，整体耗时受超时限制
    async fn send_message(&self, message: Message) -> AppResult<()> {
        tokio::time::timeout(self.timeout, self.transport.send(message))
            .await
            .map_err(|_| AppError::timeout("SMTP send did not finish in time"))?
            .map_err(|e| AppError::external_service(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl EmailSender for EmailClient {
    async fn send_text_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        debug!(to = %to, subject = %subject, "Sending text email");

        let msg = EmailMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: None,
            text_body: body.to_string(),
        };

        let message = self.build_message(&msg)?;
        self.send_message(message).await?;

        info!(to = %to, subject = %subject, "Text email sent successfully");
        Ok(())
    }

    async fn send_html_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        text_body: Option<&str>,
    ) -> AppResult<()> {
        debug!(to = %to, subject = %subject, "Sending HTML email");

        let msg = EmailMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: Some(html_body.to_string()),
            text_body: text_body.unwrap_or("").to_string(),
        };

        let message = self.build_message(&msg)?;
        self.send_message(message).await?;

        info!(to = %to, subject = %subject, "HTML email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SmtpConfig {
        SmtpConfig {
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "user@example.com".to_string(),
            smtp_password: secrecy::Secret::new("password".to_string()),
            smtp_starttls: true,
            smtp_timeout_seconds: 30,
            email_from: "noreply@example.com".to_string(),
            email_from_name: "Test".to_string(),
        }
    }

    #[test]
    fn test_build_message() {
        let client = EmailClient::new(&test_config()).unwrap();

        let msg = EmailMessage {
            to: "test@example.com".to_string(),
            subject: "Test Subject".to_string(),
            html_body: Some("<h1>Test</h1>".to_string()),
            text_body: "Test".to_string(),
        };

        let result = client.build_message(&msg);
        assert!(result.is_ok());

        let formatted = String::from_utf8(result.unwrap().formatted()).unwrap();
        assert!(formatted.contains("From: Test <noreply@example.com>"));
        assert!(formatted.contains("Subject: Test Subject"));
    }

    #[test]
    fn test_invalid_recipient_rejected() {
        let client = EmailClient::new(&test_config()).unwrap();

        let msg = EmailMessage {
            to: "not-an-address".to_string(),
            subject: "Test Subject".to_string(),
            html_body: None,
            text_body: "Test".to_string(),
        };

        let err = client.build_message(&msg).unwrap_err();
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn test_invalid_sender_rejected() {
        let config = SmtpConfig {
            email_from: "broken".to_string(),
            ..test_config()
        };

        assert!(EmailClient::new(&config).is_err());
    }
}
