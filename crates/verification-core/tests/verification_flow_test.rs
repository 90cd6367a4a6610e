use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use mailgate_common::UserId;
use mailgate_ports::{
    GuildDirectory, Mailer, NoopNotifier, RoleGrantError, VerificationStore,
};
use mailgate_verification_core::{
    EngineSettings, InMemoryVerificationStore, VerificationEngine, VerificationOutcome,
};
use mockall::mock;

mock! {
    pub CodeMailer {}

    #[async_trait]
    impl Mailer for CodeMailer {
        async fn send_code(&self, to: &str, code: &str) -> bool;
    }
}

mock! {
    pub Directory {}

    #[async_trait]
    impl GuildDirectory for Directory {
        fn role_id(&self) -> u64;
        async fn guild_available(&self) -> bool;
        async fn member_present(&self, user_id: UserId) -> bool;
        async fn role_present(&self) -> bool;
        async fn has_verified_role(&self, user_id: UserId) -> bool;
        async fn grant_role(&self, user_id: UserId) -> Result<(), RoleGrantError>;
    }
}

fn mailer_returning(succeed: bool) -> MockCodeMailer {
    let mut mailer = MockCodeMailer::new();
    mailer.expect_send_code().returning(move |_, _| succeed);
    mailer
}

fn setup(
    mailer: MockCodeMailer,
    settings: EngineSettings,
) -> (VerificationEngine, Arc<InMemoryVerificationStore>) {
    let store = Arc::new(InMemoryVerificationStore::new());
    let engine = VerificationEngine::new(
        store.clone(),
        Arc::new(mailer),
        Arc::new(NoopNotifier),
        settings,
    );
    (engine, store)
}

/// 社区、成员、角色都存在且授予成功
fn healthy_directory() -> MockDirectory {
    let mut directory = MockDirectory::new();
    directory.expect_role_id().return_const(999_u64);
    directory.expect_guild_available().return_const(true);
    directory.expect_member_present().return_const(true);
    directory.expect_role_present().return_const(true);
    directory.expect_grant_role().times(1).returning(|_| Ok(()));
    directory
}

/// 只改动一位的错误验证码
fn off_by_one_digit(code: &str) -> String {
    let mut chars: Vec<char> = code.chars().collect();
    let digit = chars[0].to_digit(10).unwrap();
    chars[0] = char::from_digit((digit + 1) % 10, 10).unwrap();
    chars.into_iter().collect()
}

#[tokio::test]
async fn test_second_start_hits_cooldown() {
    let mut mailer = MockCodeMailer::new();
    mailer.expect_send_code().times(1).returning(|_, _| true);
    let (engine, _) = setup(mailer, EngineSettings::default());
    let user_id = UserId::new(1);

    let started = Instant::now();
    let first = engine.start_verification(user_id, "a@b.com", false).await;
    let second = engine.start_verification(user_id, "a@b.com", false).await;
    let elapsed = started.elapsed().as_secs_f64();

    assert!(matches!(first, VerificationOutcome::CodeSent { .. }));
    match second {
        VerificationOutcome::CooldownActive { seconds_remaining } => {
            assert!(seconds_remaining < 180);
            assert!(seconds_remaining as f64 > 180.0 - elapsed - 1.0);
        }
        other => panic!("expected cooldown, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cooldown_elapsed_allows_new_request() {
    let mut mailer = MockCodeMailer::new();
    mailer.expect_send_code().times(2).returning(|_, _| true);
    let settings = EngineSettings {
        cooldown: Duration::from_millis(50),
        ..Default::default()
    };
    let (engine, store) = setup(mailer, settings);
    let user_id = UserId::new(2);

    engine.start_verification(user_id, "first@b.com", false).await;
    tokio::time::sleep(Duration::from_millis(80)).await;
    let outcome = engine.start_verification(user_id, "second@b.com", false).await;

    assert_eq!(
        outcome,
        VerificationOutcome::CodeSent {
            email: "second@b.com".to_string()
        }
    );
    // 新提交覆盖旧记录
    assert_eq!(store.get_pending(user_id).unwrap().email, "second@b.com");
}

#[tokio::test]
async fn test_rejected_retry_does_not_extend_cooldown() {
    let mut mailer = MockCodeMailer::new();
    mailer.expect_send_code().times(2).returning(|_, _| true);
    let settings = EngineSettings {
        cooldown: Duration::from_millis(100),
        ..Default::default()
    };
    let (engine, _) = setup(mailer, settings);
    let user_id = UserId::new(12);

    let first = engine.start_verification(user_id, "a@b.com", false).await;
    assert!(matches!(first, VerificationOutcome::CodeSent { .. }));

    tokio::time::sleep(Duration::from_millis(60)).await;
    let retry = engine.start_verification(user_id, "a@b.com", false).await;
    assert!(matches!(retry, VerificationOutcome::CooldownActive { .. }));

    // 窗口从第一次请求开始计算
    tokio::time::sleep(Duration::from_millis(60)).await;
    let after = engine.start_verification(user_id, "a@b.com", false).await;
    assert!(matches!(after, VerificationOutcome::CodeSent { .. }));
}

#[tokio::test]
async fn test_correct_code_grants_role_and_clears_pending() {
    let (engine, store) = setup(mailer_returning(true), EngineSettings::default());
    let user_id = UserId::new(3);

    engine.start_verification(user_id, "a@b.com", false).await;
    let code = store.get_pending(user_id).unwrap().code;

    let outcome = engine
        .submit_code(user_id, &code, &healthy_directory())
        .await;

    assert_eq!(
        outcome,
        VerificationOutcome::RoleGranted {
            role_assigned: true
        }
    );
    assert!(store.get_pending(user_id).is_none());
}

#[tokio::test]
async fn test_wrong_code_never_clears_pending() {
    let (engine, store) = setup(mailer_returning(true), EngineSettings::default());
    let user_id = UserId::new(4);

    engine.start_verification(user_id, "a@b.com", false).await;
    let before = store.get_pending(user_id).unwrap();
    let wrong = off_by_one_digit(&before.code);

    // 比对失败时不会查询社区
    let directory = MockDirectory::new();
    for _ in 0..5 {
        let outcome = engine.submit_code(user_id, &wrong, &directory).await;
        assert_eq!(outcome, VerificationOutcome::CodeMismatch);
    }

    assert_eq!(store.get_pending(user_id), Some(before));
}

#[tokio::test]
async fn test_domain_allow_list_is_case_insensitive() {
    let settings = EngineSettings {
        restrict_to_domains: true,
        allowed_domains: vec!["example.com".to_string()],
        ..Default::default()
    };
    let mut mailer = MockCodeMailer::new();
    mailer.expect_send_code().times(1).returning(|_, _| true);
    let (engine, store) = setup(mailer, settings);

    let accepted = engine
        .start_verification(UserId::new(5), "user@EXAMPLE.com", false)
        .await;
    let rejected = engine
        .start_verification(UserId::new(6), "user@other.org", false)
        .await;

    assert!(matches!(accepted, VerificationOutcome::CodeSent { .. }));
    assert_eq!(
        rejected,
        VerificationOutcome::DomainRejected {
            allowed_domains: vec!["example.com".to_string()]
        }
    );
    assert!(!store.has_pending(UserId::new(6)));
}

#[tokio::test]
async fn test_full_flow_then_no_pending() {
    let (engine, store) = setup(mailer_returning(true), EngineSettings::default());
    let user_id = UserId::new(7);

    let sent = engine.start_verification(user_id, "a@b.com", false).await;
    assert_eq!(
        sent,
        VerificationOutcome::CodeSent {
            email: "a@b.com".to_string()
        }
    );

    let code = store.get_pending(user_id).unwrap().code;
    let directory = healthy_directory();

    let granted = engine.submit_code(user_id, &code, &directory).await;
    assert!(granted.is_success());

    let again = engine.submit_code(user_id, &code, &directory).await;
    assert_eq!(again, VerificationOutcome::NoPendingVerification);
}

#[tokio::test]
async fn test_mail_failure_still_starts_cooldown() {
    let (engine, store) = setup(mailer_returning(false), EngineSettings::default());
    let user_id = UserId::new(8);

    let failed = engine.start_verification(user_id, "a@b.com", false).await;
    let retried = engine.start_verification(user_id, "a@b.com", false).await;

    assert_eq!(failed, VerificationOutcome::EmailSendFailed);
    assert!(matches!(
        retried,
        VerificationOutcome::CooldownActive { .. }
    ));
    assert!(store.has_pending(user_id));
}

#[tokio::test]
async fn test_missing_role_still_succeeds() {
    let (engine, store) = setup(mailer_returning(true), EngineSettings::default());
    let user_id = UserId::new(9);

    engine.start_verification(user_id, "a@b.com", false).await;
    let code = store.get_pending(user_id).unwrap().code;

    let mut directory = MockDirectory::new();
    directory.expect_role_id().return_const(999_u64);
    directory.expect_guild_available().return_const(true);
    directory.expect_member_present().return_const(true);
    directory.expect_role_present().return_const(false);
    directory.expect_grant_role().never();

    let outcome = engine.submit_code(user_id, &code, &directory).await;

    assert_eq!(
        outcome,
        VerificationOutcome::RoleGranted {
            role_assigned: false
        }
    );
    assert!(!store.has_pending(user_id));
}

#[tokio::test]
async fn test_grant_failures_keep_pending() {
    let (engine, store) = setup(mailer_returning(true), EngineSettings::default());
    let user_id = UserId::new(10);

    engine.start_verification(user_id, "a@b.com", false).await;
    let code = store.get_pending(user_id).unwrap().code;

    let mut denied = MockDirectory::new();
    denied.expect_role_id().return_const(999_u64);
    denied.expect_guild_available().return_const(true);
    denied.expect_member_present().return_const(true);
    denied.expect_role_present().return_const(true);
    denied
        .expect_grant_role()
        .returning(|_| Err(RoleGrantError::PermissionDenied));

    let outcome = engine.submit_code(user_id, &code, &denied).await;
    assert_eq!(outcome, VerificationOutcome::PermissionDenied);
    assert!(store.has_pending(user_id));

    let mut broken = MockDirectory::new();
    broken.expect_role_id().return_const(999_u64);
    broken.expect_guild_available().return_const(true);
    broken.expect_member_present().return_const(true);
    broken.expect_role_present().return_const(true);
    broken
        .expect_grant_role()
        .returning(|_| Err(RoleGrantError::Failed("gateway timeout".to_string())));

    let outcome = engine.submit_code(user_id, &code, &broken).await;
    assert_eq!(
        outcome,
        VerificationOutcome::GrantFailed {
            detail: "gateway timeout".to_string()
        }
    );
    assert!(store.has_pending(user_id));
}

#[tokio::test]
async fn test_guild_and_member_lookups() {
    let (engine, store) = setup(mailer_returning(true), EngineSettings::default());
    let user_id = UserId::new(11);

    engine.start_verification(user_id, "a@b.com", false).await;
    let code = store.get_pending(user_id).unwrap().code;

    let mut no_guild = MockDirectory::new();
    no_guild.expect_guild_available().return_const(false);
    no_guild.expect_member_present().never();

    let outcome = engine.submit_code(user_id, &code, &no_guild).await;
    assert_eq!(outcome, VerificationOutcome::GuildMissing);

    let mut no_member = MockDirectory::new();
    no_member.expect_guild_available().return_const(true);
    no_member.expect_member_present().return_const(false);
    no_member.expect_role_present().never();

    let outcome = engine.submit_code(user_id, &code, &no_member).await;
    assert_eq!(outcome, VerificationOutcome::MembershipMissing);
    assert!(store.has_pending(user_id));
}

#[tokio::test]
async fn test_concurrent_users_are_independent() {
    let engine = Arc::new(setup(mailer_returning(true), EngineSettings::default()).0);

    let handles: Vec<_> = (100..110)
        .map(|id| {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .start_verification(UserId::new(id), "a@b.com", false)
                    .await
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.unwrap();
        assert!(matches!(outcome, VerificationOutcome::CodeSent { .. }));
    }
}
