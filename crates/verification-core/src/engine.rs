//! 验证引擎

use std::sync::Arc;
use std::time::Duration;

use mailgate_common::UserId;
use mailgate_ports::{
    AdminNotifier, GuildDirectory, Mailer, RoleGrantError, SweepStats, VerificationStore,
};
use tracing::{debug, info, warn};

use crate::code::generate_code;
use crate::locks::UserLocks;
use crate::metrics::{record_outcome, record_sweep};
use crate::VerificationOutcome;

/// 引擎参数
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// 两次请求验证邮件之间的最短间隔
    pub cooldown: Duration,
    /// 是否启用域名白名单
    pub restrict_to_domains: bool,
    /// 白名单（保留原始写法用于展示）
    pub allowed_domains: Vec<String>,
    /// 待验证记录的有效期，`None` 表示永不过期
    pub pending_ttl: Option<Duration>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(180),
            restrict_to_domains: false,
            allowed_domains: Vec::new(),
            pending_ttl: None,
        }
    }
}

/// 提取邮箱域名：最后一个 `@` 之后的部分，没有 `@` 时取整个字符串，统一小写
pub fn email_domain(email: &str) -> String {
    email.rsplit('@').next().unwrap_or(email).to_lowercase()
}

/// 冷却剩余整秒数，始终小于冷却时长
fn seconds_remaining(cooldown: Duration, elapsed: Duration) -> u64 {
    let remaining = cooldown.saturating_sub(elapsed).as_secs();
    remaining.min(cooldown.as_secs().saturating_sub(1))
}

/// 邮箱验证状态机
pub struct VerificationEngine {
    store: Arc<dyn VerificationStore>,
    mailer: Arc<dyn Mailer>,
    notifier: Arc<dyn AdminNotifier>,
    settings: EngineSettings,
    locks: UserLocks,
}

impl VerificationEngine {
    pub fn new(
        store: Arc<dyn VerificationStore>,
        mailer: Arc<dyn Mailer>,
        notifier: Arc<dyn AdminNotifier>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            mailer,
            notifier,
            settings,
            locks: UserLocks::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// 开始验证：检查前置条件并发送验证码
    ///
    /// # 参数
    /// - `user_id`: 用户 ID
    /// - `email`: 用户提交的邮箱
    /// - `already_verified`: 用户是否已持有验证角色
    pub async fn start_verification(
        &self,
        user_id: UserId,
        email: &str,
        already_verified: bool,
    ) -> VerificationOutcome {
        let _guard = self.locks.acquire(user_id).await;
        let outcome = self.start_locked(user_id, email, already_verified).await;

        record_outcome("start", &outcome);
        info!(user_id = %user_id, outcome = outcome.kind(), "Verification start handled");
        outcome
    }

    async fn start_locked(
        &self,
        user_id: UserId,
        email: &str,
        already_verified: bool,
    ) -> VerificationOutcome {
        // 1. 已验证
        if already_verified {
            return VerificationOutcome::AlreadyVerified;
        }

        // 2. 冷却检查
        if let Some(elapsed) = self.store.elapsed_since_last_request(user_id) {
            if elapsed < self.settings.cooldown {
                let seconds_remaining = seconds_remaining(self.settings.cooldown, elapsed);
                debug!(user_id = %user_id, remaining_secs = seconds_remaining, "Cooldown active");
                return VerificationOutcome::CooldownActive { seconds_remaining };
            }
        }

        // 3. 记录请求时间，后续步骤失败也保留
        self.store.record_request_now(user_id);

        // 4. 域名白名单
        if self.settings.restrict_to_domains {
            let domain = email_domain(email);
            if !self.domain_allowed(&domain) {
                warn!(user_id = %user_id, domain = %domain, "Rejected email domain");
                self.notifier.log(format!(
                    "User {} ({}) attempted to verify with an unauthorized email domain: {}",
                    user_id.mention(),
                    user_id,
                    domain
                ));
                return VerificationOutcome::DomainRejected {
                    allowed_domains: self.settings.allowed_domains.clone(),
                };
            }
        }

        // 5. 生成验证码并保存
        let code = generate_code();
        self.store
            .set_pending(user_id, email.to_string(), code.clone());

        // 6. 发送邮件；失败时待验证记录保留
        if !self.mailer.send_code(email, &code).await {
            warn!(user_id = %user_id, "Verification email could not be sent");
            self.notifier.log(format!(
                "Failed to send verification email to {} for user {} ({})",
                email,
                user_id.mention(),
                user_id
            ));
            return VerificationOutcome::EmailSendFailed;
        }

        self.notifier.log(format!(
            "Verification email sent to {} for user {} ({})",
            email,
            user_id.mention(),
            user_id
        ));

        VerificationOutcome::CodeSent {
            email: email.to_string(),
        }
    }

    fn domain_allowed(&self, domain: &str) -> bool {
        self.settings
            .allowed_domains
            .iter()
            .any(|allowed| allowed.trim().to_lowercase() == domain)
    }

    /// 提交验证码：比对成功后授予验证角色
    ///
    /// # 参数
    /// - `user_id`: 用户 ID
    /// - `entered_code`: 用户输入的验证码，精确比对
    /// - `directory`: 目标社区的成员与角色查询
    pub async fn submit_code(
        &self,
        user_id: UserId,
        entered_code: &str,
        directory: &dyn GuildDirectory,
    ) -> VerificationOutcome {
        let _guard = self.locks.acquire(user_id).await;
        let outcome = self.submit_locked(user_id, entered_code, directory).await;

        record_outcome("submit", &outcome);
        info!(user_id = %user_id, outcome = outcome.kind(), "Verification code handled");
        outcome
    }

    async fn submit_locked(
        &self,
        user_id: UserId,
        entered_code: &str,
        directory: &dyn GuildDirectory,
    ) -> VerificationOutcome {
        // 1. 查找待验证记录
        let Some(pending) = self.store.get_pending(user_id) else {
            return VerificationOutcome::NoPendingVerification;
        };

        // 2. 验证码比对，不匹配时记录保留
        if pending.code != entered_code {
            debug!(user_id = %user_id, "Verification code mismatch");
            return VerificationOutcome::CodeMismatch;
        }

        // 3. 目标社区
        if !directory.guild_available().await {
            warn!(user_id = %user_id, "Target guild unavailable");
            self.notifier.log(format!(
                "Error: target server unavailable while verifying {} ({})",
                user_id.mention(),
                user_id
            ));
            return VerificationOutcome::GuildMissing;
        }

        // 4. 成员
        if !directory.member_present(user_id).await {
            warn!(user_id = %user_id, "Member not found in target guild");
            self.notifier.log(format!(
                "Error: {} ({}) entered a valid code but is not a member of the server",
                user_id.mention(),
                user_id
            ));
            return VerificationOutcome::MembershipMissing;
        }

        // 5. 角色不存在时记录配置错误，仍按成功处理
        let role_assigned = if directory.role_present().await {
            // 6. 授予角色
            match directory.grant_role(user_id).await {
                Ok(()) => true,
                Err(RoleGrantError::PermissionDenied) => {
                    warn!(user_id = %user_id, "Missing permission to assign verified role");
                    self.notifier.log(format!(
                        "Error: missing permission to assign the verified role to {} ({})",
                        user_id.mention(),
                        user_id
                    ));
                    return VerificationOutcome::PermissionDenied;
                }
                Err(RoleGrantError::Failed(detail)) => {
                    warn!(user_id = %user_id, error = %detail, "Failed to assign verified role");
                    self.notifier.log(format!(
                        "Error: failed to assign the verified role to {} ({}): {}",
                        user_id.mention(),
                        user_id,
                        detail
                    ));
                    return VerificationOutcome::GrantFailed { detail };
                }
            }
        } else {
            warn!(role_id = directory.role_id(), "Verified role not found");
            self.notifier.log(format!(
                "Error: Verified role with ID {} not found!",
                directory.role_id()
            ));
            false
        };

        // 7. 完成验证
        self.store.clear_pending(user_id);
        self.notifier.log(format!(
            "User {} ({}) verified with email {}",
            user_id.mention(),
            user_id,
            pending.email
        ));

        VerificationOutcome::RoleGranted { role_assigned }
    }

    /// 清理过期状态与空闲的用户锁
    pub fn sweep(&self) -> SweepStats {
        let stats = self
            .store
            .purge_stale(self.settings.pending_ttl, self.settings.cooldown);
        let pruned_locks = self.locks.prune();

        record_sweep(&stats, pruned_locks);
        debug!(
            expired_pending = stats.expired_pending,
            expired_cooldowns = stats.expired_cooldowns,
            pruned_locks = pruned_locks,
            "Verification sweep finished"
        );

        stats
    }
}
