//! 目标社区查询接口

use async_trait::async_trait;
use mailgate_common::UserId;
use thiserror::Error;

/// 授予角色失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleGrantError {
    #[error("missing permission to assign the role")]
    PermissionDenied,

    #[error("{0}")]
    Failed(String),
}

/// 目标社区（guild）的成员与角色查询
#[async_trait]
pub trait GuildDirectory: Send + Sync {
    /// 配置的验证角色 ID，用于日志
    fn role_id(&self) -> u64;

    /// 目标社区是否可访问
    async fn guild_available(&self) -> bool;

    /// 用户是否为社区成员
    async fn member_present(&self, user_id: UserId) -> bool;

    /// 验证角色是否存在
    async fn role_present(&self) -> bool;

    /// 用户是否已持有验证角色
    async fn has_verified_role(&self, user_id: UserId) -> bool;

    /// 授予验证角色
    async fn grant_role(&self, user_id: UserId) -> Result<(), RoleGrantError>;
}
