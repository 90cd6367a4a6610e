//! mailgate-config - 配置加载库
//!
//! 所有配置项都是扁平的环境变量名（`DISCORD_TOKEN`、`SMTP_SERVER` …），
//! 可选的 `mailgate.toml` 使用相同的小写键名。

mod messages;
mod scalar;

pub use messages::{EmailTemplateConfig, MessageTemplates};

use std::net::SocketAddr;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Discord 配置
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    #[serde(deserialize_with = "scalar::secret")]
    pub discord_token: Secret<String>,
    pub target_guild_id: u64,
    pub verified_role_id: u64,
    pub admin_log_channel_id: u64,
}

/// SMTP 邮件配置
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    #[serde(deserialize_with = "scalar::string")]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(deserialize_with = "scalar::string")]
    pub smtp_username: String,
    #[serde(deserialize_with = "scalar::secret")]
    pub smtp_password: Secret<String>,
    #[serde(default = "default_true")]
    pub smtp_starttls: bool,
    #[serde(default = "default_timeout_seconds")]
    pub smtp_timeout_seconds: u64,
    #[serde(default = "default_email_from", deserialize_with = "scalar::string")]
    pub email_from: String,
    #[serde(default = "default_email_from_name", deserialize_with = "scalar::string")]
    pub email_from_name: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_email_from() -> String {
    "noreply@yourdomain.com".to_string()
}

fn default_email_from_name() -> String {
    "Discord Verification".to_string()
}

impl SmtpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.smtp_timeout_seconds)
    }
}

/// 验证流程配置
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    #[serde(default = "default_cooldown_seconds")]
    pub email_cooldown_seconds: u64,
    #[serde(default)]
    pub restrict_to_domains: bool,
    /// 逗号分隔的域名列表
    #[serde(default, deserialize_with = "scalar::string")]
    pub allowed_email_domains: String,
    /// 未设置时待验证记录永不过期
    #[serde(default)]
    pub pending_ttl_seconds: Option<u64>,
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

fn default_cooldown_seconds() -> u64 {
    180
}

fn default_sweep_interval_seconds() -> u64 {
    300
}

impl VerificationConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.email_cooldown_seconds)
    }

    pub fn pending_ttl(&self) -> Option<Duration> {
        self.pending_ttl_seconds.map(Duration::from_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }

    /// 解析允许的域名列表（去除空白与空项，保留原始大小写用于展示）
    pub fn allowed_domains(&self) -> Vec<String> {
        self.allowed_email_domains
            .split(',')
            .map(str::trim)
            .filter(|domain| !domain.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            email_cooldown_seconds: default_cooldown_seconds(),
            restrict_to_domains: false,
            allowed_email_domains: String::new(),
            pending_ttl_seconds: None,
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_app_env", deserialize_with = "scalar::string")]
    pub app_env: String,
    #[serde(default = "default_log_level", deserialize_with = "scalar::string")]
    pub log_level: String,
    /// Prometheus 导出地址，未设置时不启动
    #[serde(default)]
    pub metrics_addr: Option<SocketAddr>,
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            app_env: default_app_env(),
            log_level: default_log_level(),
            metrics_addr: None,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord: DiscordConfig,
    pub smtp: SmtpConfig,
    pub verification: VerificationConfig,
    pub telemetry: TelemetryConfig,
    pub messages: MessageTemplates,
    pub email_templates: EmailTemplateConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_file: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Toml::file(config_file))
            .merge(Env::raw());

        Self::from_figment(&figment)
    }

    /// 从已组装的 Figment 中逐段提取配置
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config = Self {
            discord: figment.extract()?,
            smtp: figment.extract()?,
            verification: figment.extract()?,
            telemetry: figment.extract()?,
            messages: figment.extract()?,
            email_templates: figment.extract()?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ids = [
            ("TARGET_GUILD_ID", self.discord.target_guild_id),
            ("VERIFIED_ROLE_ID", self.discord.verified_role_id),
            ("ADMIN_LOG_CHANNEL_ID", self.discord.admin_log_channel_id),
        ];

        if let Some((name, _)) = ids.iter().find(|(_, id)| *id == 0) {
            return Err(ConfigError::Invalid(format!("{} must be a non-zero id", name)));
        }

        if self.smtp.smtp_server.trim().is_empty() {
            return Err(ConfigError::Invalid("SMTP_SERVER must not be empty".to_string()));
        }

        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.telemetry.app_env == "production"
    }
}
