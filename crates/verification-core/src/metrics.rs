//! 验证流程指标

use metrics::counter;

use crate::VerificationOutcome;
use mailgate_ports::SweepStats;

/// 记录一次验证结果
pub(crate) fn record_outcome(operation: &str, outcome: &VerificationOutcome) {
    let labels = [
        ("operation", operation.to_string()),
        ("outcome", outcome.kind().to_string()),
    ];

    counter!("mailgate_verification_outcomes_total", &labels).increment(1);

    match outcome {
        VerificationOutcome::CodeSent { .. } => {
            counter!("mailgate_codes_sent_total").increment(1);
        }
        VerificationOutcome::RoleGranted { .. } => {
            counter!("mailgate_users_verified_total").increment(1);
        }
        _ => {}
    }
}

/// 记录一次存储清理
pub(crate) fn record_sweep(stats: &SweepStats, pruned_locks: usize) {
    counter!("mailgate_expired_pending_total").increment(stats.expired_pending as u64);
    counter!("mailgate_expired_cooldowns_total").increment(stats.expired_cooldowns as u64);
    counter!("mailgate_pruned_locks_total").increment(pruned_locks as u64);
}
