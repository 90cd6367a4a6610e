//! 验证结果

/// 验证引擎返回的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// 用户已持有验证角色
    AlreadyVerified,
    /// 冷却中
    CooldownActive { seconds_remaining: u64 },
    /// 邮箱域名不在白名单内
    DomainRejected { allowed_domains: Vec<String> },
    /// 验证邮件发送失败
    EmailSendFailed,
    /// 验证码已发送
    CodeSent { email: String },
    /// 没有进行中的验证
    NoPendingVerification,
    /// 验证码不匹配
    CodeMismatch,
    /// 验证成功；角色不存在时 `role_assigned` 为 false，仍视为成功
    RoleGranted { role_assigned: bool },
    /// 用户不在目标社区中
    MembershipMissing,
    /// 没有分配角色的权限
    PermissionDenied,
    /// 找不到目标社区
    GuildMissing,
    /// 分配角色时发生其他错误
    GrantFailed { detail: String },
}

impl VerificationOutcome {
    /// 日志与指标使用的结果名称
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyVerified => "already_verified",
            Self::CooldownActive { .. } => "cooldown_active",
            Self::DomainRejected { .. } => "domain_rejected",
            Self::EmailSendFailed => "email_send_failed",
            Self::CodeSent { .. } => "code_sent",
            Self::NoPendingVerification => "no_pending_verification",
            Self::CodeMismatch => "code_mismatch",
            Self::RoleGranted { role_assigned: true } => "role_granted",
            Self::RoleGranted { role_assigned: false } => "role_missing",
            Self::MembershipMissing => "membership_missing",
            Self::PermissionDenied => "permission_denied",
            Self::GuildMissing => "guild_missing",
            Self::GrantFailed { .. } => "grant_failed",
        }
    }

    /// 是否推进了状态机（验证码已发出或验证完成）
    pub fn is_success(&self) -> bool {
        matches!(self, Self::CodeSent { .. } | Self::RoleGranted { .. })
    }
}
