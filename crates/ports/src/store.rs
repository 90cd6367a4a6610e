//! 验证状态存储 trait 定义

use std::time::Duration;

use mailgate_common::{PendingVerification, UserId};

/// 一次清理移除的记录数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub expired_pending: usize,
    pub expired_cooldowns: usize,
}

/// 验证状态存储
///
/// 独占两张表：user → 待验证记录，user → 最近一次请求时间。
/// 所有操作都是同步、非阻塞的内存操作。
pub trait VerificationStore: Send + Sync {
    /// 是否存在待验证记录
    fn has_pending(&self, user_id: UserId) -> bool;

    /// 获取待验证记录
    fn get_pending(&self, user_id: UserId) -> Option<PendingVerification>;

    /// 写入待验证记录，覆盖已有记录
    fn set_pending(&self, user_id: UserId, email: String, code: String);

    /// 删除待验证记录，不存在时无操作
    fn clear_pending(&self, user_id: UserId);

    /// 距上次请求经过的时间，从未请求时返回 `None`
    fn elapsed_since_last_request(&self, user_id: UserId) -> Option<Duration>;

    /// 记录本次请求时间
    fn record_request_now(&self, user_id: UserId);

    /// 清理超过 `pending_ttl` 的待验证记录与超过 `cooldown` 的请求时间记录
    fn purge_stale(&self, pending_ttl: Option<Duration>, cooldown: Duration) -> SweepStats;
}
