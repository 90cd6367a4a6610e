//! 基础设施组装

use std::sync::Arc;

use mailgate_adapter_email::{CodeEmailTemplate, EmailClient, SmtpCodeMailer};
use mailgate_config::AppConfig;
use mailgate_errors::AppResult;
use mailgate_ports::{AdminNotifier, Mailer, VerificationStore};
use mailgate_verification_core::{EngineSettings, InMemoryVerificationStore, VerificationEngine};
use tracing::info;

/// 服务共享的基础设施
pub struct Infrastructure {
    config: AppConfig,
    store: Arc<dyn VerificationStore>,
    mailer: Arc<dyn Mailer>,
}

impl Infrastructure {
    /// 根据配置创建基础设施
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let email_client = Arc::new(EmailClient::new(&config.smtp)?);
        let template = CodeEmailTemplate::new(&config.email_templates);
        let mailer: Arc<dyn Mailer> = Arc::new(SmtpCodeMailer::new(email_client, template));

        info!(
            smtp_server = %config.smtp.smtp_server,
            smtp_port = config.smtp.smtp_port,
            starttls = config.smtp.smtp_starttls,
            "SMTP mailer configured"
        );

        Ok(Self::with_parts(
            config,
            Arc::new(InMemoryVerificationStore::new()),
            mailer,
        ))
    }

    /// 使用自定义存储与发送者组装
    pub fn with_parts(
        config: AppConfig,
        store: Arc<dyn VerificationStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            store,
            mailer,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 从验证配置推导引擎参数
    pub fn engine_settings(&self) -> EngineSettings {
        let verification = &self.config.verification;
        EngineSettings {
            cooldown: verification.cooldown(),
            restrict_to_domains: verification.restrict_to_domains,
            allowed_domains: verification.allowed_domains(),
            pending_ttl: verification.pending_ttl(),
        }
    }

    /// 组装验证引擎
    pub fn build_engine(&self, notifier: Arc<dyn AdminNotifier>) -> Arc<VerificationEngine> {
        Arc::new(VerificationEngine::new(
            self.store.clone(),
            self.mailer.clone(),
            notifier,
            self.engine_settings(),
        ))
    }
}
