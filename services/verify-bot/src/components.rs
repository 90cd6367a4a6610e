//! Discord 交互组件

use serenity::all::{
    ActionRowComponent, ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, CreateInputText,
    CreateModal, InputTextStyle, ModalInteractionData,
};

use crate::render::Notice;

pub const VERIFY_EMAIL_BUTTON: &str = "verify_email";
pub const ENTER_CODE_BUTTON: &str = "enter_code";

pub const EMAIL_MODAL: &str = "email_modal";
pub const EMAIL_INPUT: &str = "email_input";
pub const CODE_MODAL: &str = "code_modal";
pub const CODE_INPUT: &str = "code_input";

/// 邮箱输入框
pub fn email_modal() -> CreateModal {
    let input = CreateInputText::new(InputTextStyle::Short, "Email Address", EMAIL_INPUT)
        .placeholder("your.email@example.com")
        .min_length(5)
        .max_length(100)
        .required(true);

    CreateModal::new(EMAIL_MODAL, "Email Verification")
        .components(vec![CreateActionRow::InputText(input)])
}

/// 验证码输入框，长度固定为 6
pub fn code_modal() -> CreateModal {
    let input = CreateInputText::new(InputTextStyle::Short, "Verification Code", CODE_INPUT)
        .placeholder("Enter the 6-digit code from your email")
        .min_length(6)
        .max_length(6)
        .required(true);

    CreateModal::new(CODE_MODAL, "Enter Verification Code")
        .components(vec![CreateActionRow::InputText(input)])
}

pub fn notice_embed(notice: &Notice) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title(&notice.title)
        .description(&notice.description)
        .colour(notice.tone.rgb());

    match &notice.field {
        Some((name, value)) => embed.field(name, value, false),
        None => embed,
    }
}

pub fn notice_components(notice: &Notice) -> Vec<CreateActionRow> {
    notice
        .action
        .iter()
        .map(|action| {
            let button = CreateButton::new(action.custom_id())
                .label(action.label())
                .style(ButtonStyle::Primary);
            CreateActionRow::Buttons(vec![button])
        })
        .collect()
}

/// 读取表单中指定输入框的值
pub fn text_input_value(data: &ModalInteractionData, custom_id: &str) -> Option<String> {
    data.components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == custom_id => {
                input.value.clone()
            }
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Renderer;
    use mailgate_config::MessageTemplates;
    use mailgate_verification_core::VerificationOutcome;

    #[test]
    fn test_modals_use_known_ids() {
        let email = serde_json::to_value(email_modal()).unwrap();
        let code = serde_json::to_value(code_modal()).unwrap();

        assert_eq!(email["custom_id"], EMAIL_MODAL);
        assert_eq!(code["custom_id"], CODE_MODAL);
        assert_eq!(code["title"], "Enter Verification Code");
    }

    #[test]
    fn test_notice_embed_carries_title_and_colour() {
        let notice = Renderer::new(MessageTemplates::default()).outcome(
            &VerificationOutcome::RoleGranted {
                role_assigned: true,
            },
        );

        let embed = serde_json::to_value(notice_embed(&notice)).unwrap();

        assert_eq!(embed["title"], "Verification Successful!");
        assert_eq!(embed["color"], 0x2ECC71);
    }

    #[test]
    fn test_components_follow_action() {
        let renderer = Renderer::new(MessageTemplates::default());

        assert_eq!(notice_components(&renderer.welcome()).len(), 1);
        assert!(notice_components(&renderer.outcome(&VerificationOutcome::GuildMissing)).is_empty());
    }
}
