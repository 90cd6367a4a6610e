//! 服务启动器
//!
//! 提供统一的服务启动模式

use std::future::Future;

use mailgate_config::AppConfig;
use tracing::info;

use crate::infrastructure::Infrastructure;
use crate::runtime::init_runtime;

/// 运行服务
///
/// 负责：
/// 1. 读取 `.env`
/// 2. 加载配置（缺少必填项时返回错误，进程以非零状态退出）
/// 3. 初始化运行时（日志、指标）
/// 4. 创建基础设施（存储、邮件发送）
/// 5. 调用用户提供的闭包运行服务
///
/// # 示例
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     mailgate_bootstrap::run("mailgate.toml", |infra| async move {
///         serve(infra).await
///     })
///     .await
/// }
/// ```
pub async fn run<F, Fut>(config_file: &str, service: F) -> anyhow::Result<()>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    // 1. 读取 .env，文件不存在时忽略
    let _ = dotenvy::dotenv();

    // 2. 加载配置
    let config = AppConfig::load(config_file)?;

    // 3. 初始化运行时
    init_runtime(&config);

    // 4. 创建基础设施
    let infra = Infrastructure::from_config(config)?;

    // 5. 运行服务
    service(infra).await?;

    info!("Service stopped");

    Ok(())
}
