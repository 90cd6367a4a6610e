//! 表单提交到验证引擎的分发

use mailgate_common::UserId;
use mailgate_ports::GuildDirectory;
use mailgate_verification_core::{VerificationEngine, VerificationOutcome};
use serenity::all::ModalInteractionData;

use crate::components::{CODE_INPUT, CODE_MODAL, EMAIL_INPUT, EMAIL_MODAL, text_input_value};

/// 用户提交的表单
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmission {
    Email(String),
    Code(String),
}

impl FormSubmission {
    /// 未知表单返回 None
    pub fn from_modal(data: &ModalInteractionData) -> Option<Self> {
        match data.custom_id.as_str() {
            EMAIL_MODAL => Some(Self::Email(
                text_input_value(data, EMAIL_INPUT).unwrap_or_default(),
            )),
            CODE_MODAL => Some(Self::Code(
                text_input_value(data, CODE_INPUT).unwrap_or_default(),
            )),
            _ => None,
        }
    }
}

/// 邮箱表单先查询是否已持有验证角色，验证码表单直接提交
pub async fn dispatch_form(
    engine: &VerificationEngine,
    user_id: UserId,
    submission: &FormSubmission,
    directory: &dyn GuildDirectory,
) -> VerificationOutcome {
    match submission {
        FormSubmission::Email(email) => {
            let already_verified = directory.has_verified_role(user_id).await;
            engine
                .start_verification(user_id, email, already_verified)
                .await
        }
        FormSubmission::Code(code) => engine.submit_code(user_id, code, directory).await,
    }
}
