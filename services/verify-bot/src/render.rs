//! 消息渲染
//!
//! 把验证结果映射为与平台无关的 `Notice`，占位符只由对应的渲染函数填充。

use mailgate_config::MessageTemplates;
use mailgate_verification_core::VerificationOutcome;

use crate::components::{ENTER_CODE_BUTTON, VERIFY_EMAIL_BUTTON};

/// 提示色调
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

impl Tone {
    pub fn rgb(self) -> u32 {
        match self {
            Self::Info => 0x3498DB,
            Self::Success => 0x2ECC71,
            Self::Error => 0xE74C3C,
        }
    }
}

/// 附带的后续操作按钮
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 打开邮箱输入框
    VerifyEmail { label: String },
    /// 打开验证码输入框
    EnterCode { label: String },
}

impl Action {
    pub fn custom_id(&self) -> &'static str {
        match self {
            Self::VerifyEmail { .. } => VERIFY_EMAIL_BUTTON,
            Self::EnterCode { .. } => ENTER_CODE_BUTTON,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::VerifyEmail { label } | Self::EnterCode { label } => label,
        }
    }
}

/// 渲染后的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub tone: Tone,
    pub field: Option<(String, String)>,
    pub action: Option<Action>,
}

impl Notice {
    fn new(title: &str, description: impl Into<String>, tone: Tone) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            tone,
            field: None,
            action: None,
        }
    }

    fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }
}

/// 基于文案模板的渲染器
#[derive(Debug, Clone)]
pub struct Renderer {
    messages: MessageTemplates,
}

impl Renderer {
    pub fn new(messages: MessageTemplates) -> Self {
        Self { messages }
    }

    /// 新成员欢迎私信
    pub fn welcome(&self) -> Notice {
        let m = &self.messages;
        let mut notice = Notice::new(&m.welcome_title, m.welcome_description.as_str(), Tone::Info)
            .with_action(Action::VerifyEmail {
                label: m.verify_button_label.clone(),
            });
        notice.field = Some((m.welcome_field_title.clone(), m.welcome_field_value.clone()));
        notice
    }

    pub fn cooldown(&self, seconds_remaining: u64) -> Notice {
        let description = self
            .messages
            .cooldown_description
            .replace("{time_left}", &seconds_remaining.to_string());
        Notice::new(&self.messages.cooldown_title, description, Tone::Error)
    }

    pub fn invalid_domain(&self, allowed_domains: &[String]) -> Notice {
        let description = self
            .messages
            .invalid_domain_description
            .replace("{domains}", &allowed_domains.join(", "));
        Notice::new(&self.messages.invalid_domain_title, description, Tone::Error)
    }

    pub fn email_sent(&self, email: &str) -> Notice {
        let description = self.messages.email_sent_description.replace("{email}", email);
        Notice::new(&self.messages.email_sent_title, description, Tone::Success).with_action(
            Action::EnterCode {
                label: self.messages.enter_code_button_label.clone(),
            },
        )
    }

    pub fn grant_failed(&self, detail: &str) -> Notice {
        Notice::new(
            &self.messages.server_error_title,
            format!("An unexpected error occurred: {}", detail),
            Tone::Error,
        )
    }

    /// 把验证结果渲染为用户可见的提示
    pub fn outcome(&self, outcome: &VerificationOutcome) -> Notice {
        let m = &self.messages;
        match outcome {
            VerificationOutcome::AlreadyVerified => Notice::new(
                &m.already_verified_title,
                m.already_verified_description.as_str(),
                Tone::Error,
            ),
            VerificationOutcome::CooldownActive { seconds_remaining } => {
                self.cooldown(*seconds_remaining)
            }
            VerificationOutcome::DomainRejected { allowed_domains } => {
                self.invalid_domain(allowed_domains)
            }
            VerificationOutcome::EmailSendFailed => Notice::new(
                &m.email_error_title,
                m.email_error_description.as_str(),
                Tone::Error,
            ),
            VerificationOutcome::CodeSent { email } => self.email_sent(email),
            VerificationOutcome::NoPendingVerification => Notice::new(
                &m.no_verification_title,
                m.no_verification_description.as_str(),
                Tone::Error,
            ),
            VerificationOutcome::CodeMismatch => Notice::new(
                &m.invalid_code_title,
                m.invalid_code_description.as_str(),
                Tone::Error,
            )
            .with_action(Action::EnterCode {
                label: m.try_again_button_label.clone(),
            }),
            VerificationOutcome::RoleGranted { .. } => Notice::new(
                &m.success_title,
                m.success_description.as_str(),
                Tone::Success,
            ),
            VerificationOutcome::MembershipMissing => Notice::new(
                &m.member_error_title,
                m.member_error_description.as_str(),
                Tone::Error,
            ),
            VerificationOutcome::PermissionDenied => Notice::new(
                &m.permission_error_title,
                m.permission_error_description.as_str(),
                Tone::Error,
            ),
            VerificationOutcome::GuildMissing => Notice::new(
                &m.server_error_title,
                m.server_error_description.as_str(),
                Tone::Error,
            ),
            VerificationOutcome::GrantFailed { detail } => self.grant_failed(detail),
        }
    }
}
