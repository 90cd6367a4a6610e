//! 验证码邮件模板

use mailgate_config::EmailTemplateConfig;

/// 渲染后的验证码邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text_body: String,
    /// 模板为空时只发送纯文本
    pub html_body: Option<String>,
}

/// 验证码邮件模板，`{code}` 是唯一的占位符
#[derive(Debug, Clone)]
pub struct CodeEmailTemplate {
    subject: String,
    text: String,
    html: String,
}

impl CodeEmailTemplate {
    pub fn new(config: &EmailTemplateConfig) -> Self {
        Self {
            subject: config.email_subject.clone(),
            text: config.email_text.clone(),
            html: config.email_html.clone(),
        }
    }

    /// 渲染验证码邮件
    pub fn render(&self, code: &str) -> RenderedEmail {
        let html = self.html.replace("{code}", code);

        RenderedEmail {
            subject: self.subject.clone(),
            text_body: self.text.replace("{code}", code),
            html_body: (!html.trim().is_empty()).then_some(html),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_templates() {
        let template = CodeEmailTemplate::new(&EmailTemplateConfig::default());

        let rendered = template.render("042917");

        assert_eq!(rendered.subject, "Discord Server Verification Code");
        assert!(rendered.text_body.starts_with("Your verification code is: 042917"));
        let html = rendered.html_body.unwrap();
        assert!(html.contains("<div>042917</div>"));
        assert!(!html.contains("{code}"));
    }

    #[test]
    fn test_empty_html_falls_back_to_text() {
        let config = EmailTemplateConfig {
            email_html: "  ".to_string(),
            ..Default::default()
        };

        let rendered = CodeEmailTemplate::new(&config).render("123456");
        assert!(rendered.html_body.is_none());
    }
}
