//! Verify Bot - 邮箱验证机器人入口
//!
//! 使用 mailgate-bootstrap 统一启动模式

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mailgate_bootstrap::run("mailgate.toml", |infra| async move {
        verify_bot::serve(infra).await
    })
    .await
}
