//! 内存验证状态存储

use std::collections::HashMap;
use std::time::{Duration, Instant};

use mailgate_common::{PendingVerification, UserId};
use mailgate_ports::{SweepStats, VerificationStore};
use parking_lot::RwLock;
use tracing::debug;

/// 进程内存中的验证状态，重启后丢失
#[derive(Debug, Default)]
pub struct InMemoryVerificationStore {
    pending: RwLock<HashMap<UserId, PendingVerification>>,
    last_requests: RwLock<HashMap<UserId, Instant>>,
}

impl InMemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前待验证记录数
    pub fn pending_count(&self) -> usize {
        self.pending.read().len()
    }

    /// 当前冷却记录数
    pub fn cooldown_count(&self) -> usize {
        self.last_requests.read().len()
    }
}

impl VerificationStore for InMemoryVerificationStore {
    fn has_pending(&self, user_id: UserId) -> bool {
        self.pending.read().contains_key(&user_id)
    }

    fn get_pending(&self, user_id: UserId) -> Option<PendingVerification> {
        self.pending.read().get(&user_id).cloned()
    }

    fn set_pending(&self, user_id: UserId, email: String, code: String) {
        self.pending
            .write()
            .insert(user_id, PendingVerification::new(user_id, email, code));
    }

    fn clear_pending(&self, user_id: UserId) {
        self.pending.write().remove(&user_id);
    }

    fn elapsed_since_last_request(&self, user_id: UserId) -> Option<Duration> {
        self.last_requests
            .read()
            .get(&user_id)
            .map(|requested_at| requested_at.elapsed())
    }

    fn record_request_now(&self, user_id: UserId) {
        self.last_requests.write().insert(user_id, Instant::now());
    }

    fn purge_stale(&self, pending_ttl: Option<Duration>, cooldown: Duration) -> SweepStats {
        let mut stats = SweepStats::default();

        if let Some(ttl) = pending_ttl.and_then(|ttl| chrono::Duration::from_std(ttl).ok()) {
            let mut pending = self.pending.write();
            let before = pending.len();
            pending.retain(|_, verification| verification.age() < ttl);
            stats.expired_pending = before - pending.len();
        }

        {
            let mut last_requests = self.last_requests.write();
            let before = last_requests.len();
            last_requests.retain(|_, requested_at| requested_at.elapsed() < cooldown);
            stats.expired_cooldowns = before - last_requests.len();
        }

        debug!(
            expired_pending = stats.expired_pending,
            expired_cooldowns = stats.expired_cooldowns,
            "Verification store swept"
        );

        stats
    }
}
