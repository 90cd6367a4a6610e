//! 基于 serenity 的社区查询与角色授予

use async_trait::async_trait;
use mailgate_common::UserId;
use mailgate_ports::{GuildDirectory, RoleGrantError};
use serenity::all::{Context, GuildId, RoleId, UserId as DiscordUserId};
use tracing::{debug, warn};

const GRANT_REASON: &str = "Email verification completed";

/// 目标社区视图，每次交互创建一个
pub struct DiscordGuildDirectory {
    ctx: Context,
    guild_id: GuildId,
    role_id: RoleId,
}

impl DiscordGuildDirectory {
    pub fn new(ctx: Context, guild_id: GuildId, role_id: RoleId) -> Self {
        Self {
            ctx,
            guild_id,
            role_id,
        }
    }

    fn discord_user(user_id: UserId) -> DiscordUserId {
        DiscordUserId::new(user_id.get())
    }
}

#[async_trait]
impl GuildDirectory for DiscordGuildDirectory {
    fn role_id(&self) -> u64 {
        self.role_id.get()
    }

    async fn guild_available(&self) -> bool {
        let cached = self.ctx.cache.guild(self.guild_id).is_some();
        if cached {
            return true;
        }

        match self.guild_id.to_partial_guild(&self.ctx).await {
            Ok(_) => true,
            Err(e) => {
                debug!(guild_id = %self.guild_id, error = %e, "Guild lookup failed");
                false
            }
        }
    }

    async fn member_present(&self, user_id: UserId) -> bool {
        self.guild_id
            .member(&self.ctx, Self::discord_user(user_id))
            .await
            .is_ok()
    }

    async fn role_present(&self) -> bool {
        let cached = self
            .ctx
            .cache
            .guild(self.guild_id)
            .map(|guild| guild.roles.contains_key(&self.role_id));
        if let Some(present) = cached {
            return present;
        }

        match self.guild_id.roles(&self.ctx).await {
            Ok(roles) => roles.contains_key(&self.role_id),
            Err(e) => {
                warn!(guild_id = %self.guild_id, error = %e, "Failed to list guild roles");
                false
            }
        }
    }

    async fn has_verified_role(&self, user_id: UserId) -> bool {
        self.guild_id
            .member(&self.ctx, Self::discord_user(user_id))
            .await
            .map(|member| member.roles.contains(&self.role_id))
            .unwrap_or(false)
    }

    async fn grant_role(&self, user_id: UserId) -> Result<(), RoleGrantError> {
        self.ctx
            .http
            .add_member_role(
                self.guild_id,
                Self::discord_user(user_id),
                self.role_id,
                Some(GRANT_REASON),
            )
            .await
            .map_err(|e| {
                let status = match &e {
                    serenity::Error::Http(http_error) => {
                        http_error.status_code().map(|code| code.as_u16())
                    }
                    _ => None,
                };
                classify_grant_error(status, e.to_string())
            })
    }
}

/// 按 HTTP 状态区分权限不足与其他失败
fn classify_grant_error(status: Option<u16>, detail: String) -> RoleGrantError {
    match status {
        Some(403) => RoleGrantError::PermissionDenied,
        _ => RoleGrantError::Failed(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_maps_to_permission_denied() {
        let err = classify_grant_error(Some(403), "Missing Permissions".to_string());
        assert!(matches!(err, RoleGrantError::PermissionDenied));
    }

    #[test]
    fn test_other_failures_keep_detail() {
        match classify_grant_error(Some(500), "Internal Server Error".to_string()) {
            RoleGrantError::Failed(detail) => assert_eq!(detail, "Internal Server Error"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            classify_grant_error(None, "socket closed".to_string()),
            RoleGrantError::Failed(_)
        ));
    }
}
