//! 面向用户的文案模板
//!
//! 占位符（`{time_left}`、`{domains}`、`{email}`、`{code}`）只由各自的渲染函数填充。

use serde::Deserialize;

/// Discord 消息文案
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    #[serde(deserialize_with = "crate::scalar::string")]
    pub welcome_title: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub welcome_description: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub welcome_field_title: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub welcome_field_value: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub verify_button_label: String,

    #[serde(deserialize_with = "crate::scalar::string")]
    pub already_verified_title: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub already_verified_description: String,

    #[serde(deserialize_with = "crate::scalar::string")]
    pub cooldown_title: String,
    /// 占位符 `{time_left}`
    #[serde(deserialize_with = "crate::scalar::string")]
    pub cooldown_description: String,

    #[serde(deserialize_with = "crate::scalar::string")]
    pub invalid_domain_title: String,
    /// 占位符 `{domains}`
    #[serde(deserialize_with = "crate::scalar::string")]
    pub invalid_domain_description: String,

    #[serde(deserialize_with = "crate::scalar::string")]
    pub email_sent_title: String,
    /// 占位符 `{email}`
    #[serde(deserialize_with = "crate::scalar::string")]
    pub email_sent_description: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub enter_code_button_label: String,

    #[serde(deserialize_with = "crate::scalar::string")]
    pub email_error_title: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub email_error_description: String,

    #[serde(deserialize_with = "crate::scalar::string")]
    pub no_verification_title: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub no_verification_description: String,

    #[serde(deserialize_with = "crate::scalar::string")]
    pub server_error_title: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub server_error_description: String,

    #[serde(deserialize_with = "crate::scalar::string")]
    pub member_error_title: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub member_error_description: String,

    #[serde(deserialize_with = "crate::scalar::string")]
    pub permission_error_title: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub permission_error_description: String,

    #[serde(deserialize_with = "crate::scalar::string")]
    pub success_title: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub success_description: String,

    #[serde(deserialize_with = "crate::scalar::string")]
    pub invalid_code_title: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub invalid_code_description: String,
    #[serde(deserialize_with = "crate::scalar::string")]
    pub try_again_button_label: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            welcome_title: "Welcome to the Server!".to_string(),
            welcome_description: "To gain access, please verify your email address.".to_string(),
            welcome_field_title: "How to verify:".to_string(),
            welcome_field_value: "Click the button below to start the verification process."
                .to_string(),
            verify_button_label: "Verify Email".to_string(),

            already_verified_title: "Already Verified".to_string(),
            already_verified_description:
                "You already have the Verified role. No need to verify again!".to_string(),

            cooldown_title: "Cooldown Active".to_string(),
            cooldown_description:
                "You must wait {time_left} more seconds before requesting another email."
                    .to_string(),

            invalid_domain_title: "Invalid Email Domain".to_string(),
            invalid_domain_description:
                "Sorry, but verification is restricted to the following email domains: {domains}"
                    .to_string(),

            email_sent_title: "Verification Email Sent!".to_string(),
            email_sent_description: "We've sent a 6-digit verification code to {email}. Please check your inbox (and spam folder).".to_string(),
            enter_code_button_label: "Enter Verification Code".to_string(),

            email_error_title: "Error".to_string(),
            email_error_description:
                "Failed to send verification email. Please try again or contact an admin."
                    .to_string(),

            no_verification_title: "Error".to_string(),
            no_verification_description: "No verification in progress. Please start over."
                .to_string(),

            server_error_title: "Error".to_string(),
            server_error_description:
                "Could not find the target server. Please contact an admin.".to_string(),

            member_error_title: "Error".to_string(),
            member_error_description: "Could not find your membership. Please contact an admin."
                .to_string(),

            permission_error_title: "Error".to_string(),
            permission_error_description:
                "I don't have permission to assign roles. Please contact an admin.".to_string(),

            success_title: "Verification Successful!".to_string(),
            success_description: "You have been verified and granted access to the server!"
                .to_string(),

            invalid_code_title: "Invalid Code".to_string(),
            invalid_code_description:
                "The verification code you entered is incorrect. Please try again.".to_string(),
            try_again_button_label: "Try Again".to_string(),
        }
    }
}

/// 验证码邮件模板
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailTemplateConfig {
    #[serde(deserialize_with = "crate::scalar::string")]
    pub email_subject: String,
    /// 纯文本正文，占位符 `{code}`
    #[serde(deserialize_with = "crate::scalar::string")]
    pub email_text: String,
    /// HTML 正文，占位符 `{code}`
    #[serde(deserialize_with = "crate::scalar::string")]
    pub email_html: String,
}

impl Default for EmailTemplateConfig {
    fn default() -> Self {
        Self {
            email_subject: "Discord Server Verification Code".to_string(),
            email_text: "Your verification code is: {code}\n\nPlease enter this code in the Discord bot to complete verification.".to_string(),
            email_html: r#"
<html>
<body>
    <p>You've requested to join the Discord server. Your verification code is:</p>
    <div>{code}</div>
    <p>Enter this code in the Discord bot to gain access to the server.</p>
    <p>If you didn't request this verification, you can safely ignore this email.</p>
</body>
</html>
"#
            .to_string(),
        }
    }
}
