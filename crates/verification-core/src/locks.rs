//! 按用户串行化验证操作

use std::collections::HashMap;
use std::sync::Arc;

use mailgate_common::UserId;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 每个用户一把异步锁，不同用户互不阻塞
#[derive(Debug, Default)]
pub(crate) struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 获取用户锁，持有期间同一用户的其他操作等待
    pub(crate) async fn acquire(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            locks.entry(user_id).or_default().clone()
        };

        lock.lock_owned().await
    }

    /// 移除没有持有者的锁，返回移除数量
    pub(crate) fn prune(&self) -> usize {
        let mut locks = self.locks.lock();
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().len()
    }
}
