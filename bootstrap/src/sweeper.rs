//! 后台清理任务

use std::sync::Arc;
use std::time::Duration;

use mailgate_verification_core::VerificationEngine;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// 周期性清理过期的验证状态
pub fn spawn_sweeper(engine: Arc<VerificationEngine>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 第一次 tick 立即完成
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let stats = engine.sweep();
            if stats.expired_pending > 0 {
                info!(
                    expired_pending = stats.expired_pending,
                    "Expired pending verifications removed"
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mailgate_common::UserId;
    use mailgate_ports::{Mailer, NoopNotifier, VerificationStore};
    use mailgate_verification_core::{EngineSettings, InMemoryVerificationStore};

    struct AcceptingMailer;

    #[async_trait]
    impl Mailer for AcceptingMailer {
        async fn send_code(&self, _to: &str, _code: &str) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_sweeper_expires_pending() {
        let store = Arc::new(InMemoryVerificationStore::new());
        let engine = Arc::new(VerificationEngine::new(
            store.clone(),
            Arc::new(AcceptingMailer),
            Arc::new(NoopNotifier),
            EngineSettings {
                cooldown: Duration::ZERO,
                pending_ttl: Some(Duration::ZERO),
                ..Default::default()
            },
        ));
        let user_id = UserId::new(1);

        engine.start_verification(user_id, "a@b.com", false).await;
        assert!(store.has_pending(user_id));

        let handle = spawn_sweeper(engine, Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.abort();

        assert!(!store.has_pending(user_id));
        assert_eq!(store.cooldown_count(), 0);
    }
}
