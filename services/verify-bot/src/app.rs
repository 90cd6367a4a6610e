//! 服务装配与运行

use std::sync::Arc;

use anyhow::Context as _;
use mailgate_bootstrap::{Infrastructure, shutdown_signal, spawn_sweeper};
use mailgate_ports::AdminNotifier;
use secrecy::ExposeSecret;
use serenity::Client;
use serenity::all::{ChannelId, GatewayIntents, Http};
use tracing::info;

use crate::handler::VerificationHandler;
use crate::notifier::DiscordAdminNotifier;
use crate::render::Renderer;

/// 连接 Discord 并运行直到收到关闭信号
pub async fn serve(infra: Infrastructure) -> anyhow::Result<()> {
    let config = infra.config();
    let token = config.discord.discord_token.expose_secret().clone();

    let http = Arc::new(Http::new(&token));
    let notifier: Arc<dyn AdminNotifier> = Arc::new(DiscordAdminNotifier::new(
        http,
        ChannelId::new(config.discord.admin_log_channel_id),
    ));

    let engine = infra.build_engine(notifier.clone());
    let sweeper = spawn_sweeper(engine.clone(), config.verification.sweep_interval());

    let handler = VerificationHandler::new(
        engine,
        Renderer::new(config.messages.clone()),
        notifier,
        &config.discord,
    );

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::DIRECT_MESSAGES;

    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await
        .context("Failed to create Discord client")?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shard_manager.shutdown_all().await;
    });

    info!(guild_id = config.discord.target_guild_id, "Starting Discord gateway");
    let result = client.start().await;

    sweeper.abort();
    result.context("Discord gateway stopped with an error")?;

    info!("Verify bot stopped");
    Ok(())
}
