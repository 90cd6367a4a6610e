//! Discord 事件处理

use std::sync::Arc;

use mailgate_common::UserId;
use mailgate_config::DiscordConfig;
use mailgate_ports::AdminNotifier;
use mailgate_verification_core::VerificationEngine;
use serenity::all::{
    ChannelId, ComponentInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, CreateMessage, GuildId,
    Interaction, Member, ModalInteraction, Ready, RoleId,
};
use serenity::async_trait;
use serenity::prelude::EventHandler;
use tracing::{debug, info, warn};

use crate::components::{
    ENTER_CODE_BUTTON, VERIFY_EMAIL_BUTTON, code_modal, email_modal, notice_components,
    notice_embed,
};
use crate::directory::DiscordGuildDirectory;
use crate::dispatch::{FormSubmission, dispatch_form};
use crate::render::{Notice, Renderer};

/// 验证流程的事件处理器
pub struct VerificationHandler {
    engine: Arc<VerificationEngine>,
    renderer: Renderer,
    notifier: Arc<dyn AdminNotifier>,
    guild_id: GuildId,
    role_id: RoleId,
    admin_channel_id: ChannelId,
}

impl VerificationHandler {
    pub fn new(
        engine: Arc<VerificationEngine>,
        renderer: Renderer,
        notifier: Arc<dyn AdminNotifier>,
        discord: &DiscordConfig,
    ) -> Self {
        Self {
            engine,
            renderer,
            notifier,
            guild_id: GuildId::new(discord.target_guild_id),
            role_id: RoleId::new(discord.verified_role_id),
            admin_channel_id: ChannelId::new(discord.admin_log_channel_id),
        }
    }

    fn directory(&self, ctx: &Context) -> DiscordGuildDirectory {
        DiscordGuildDirectory::new(ctx.clone(), self.guild_id, self.role_id)
    }

    async fn on_component(&self, ctx: &Context, component: &ComponentInteraction) {
        let modal = match component.data.custom_id.as_str() {
            VERIFY_EMAIL_BUTTON => email_modal(),
            ENTER_CODE_BUTTON => code_modal(),
            other => {
                debug!(custom_id = %other, "Ignoring unknown component");
                return;
            }
        };

        if let Err(e) = component
            .create_response(ctx, CreateInteractionResponse::Modal(modal))
            .await
        {
            warn!(user_id = %component.user.id, error = %e, "Failed to open form");
        }
    }

    async fn on_modal(&self, ctx: &Context, modal: &ModalInteraction) {
        let Some(submission) = FormSubmission::from_modal(&modal.data) else {
            debug!(custom_id = %modal.data.custom_id, "Ignoring unknown form");
            return;
        };

        // 先延迟响应，发信可能较慢
        let defer = CreateInteractionResponse::Defer(
            CreateInteractionResponseMessage::new().ephemeral(true),
        );
        if let Err(e) = modal.create_response(ctx, defer).await {
            warn!(user_id = %modal.user.id, error = %e, "Failed to defer form submission");
            return;
        }

        let user_id = UserId::new(modal.user.id.get());
        let directory = self.directory(ctx);
        let outcome = dispatch_form(&self.engine, user_id, &submission, &directory).await;

        let notice = self.renderer.outcome(&outcome);
        self.reply(ctx, modal, &notice).await;
    }

    async fn reply(&self, ctx: &Context, modal: &ModalInteraction, notice: &Notice) {
        let followup = CreateInteractionResponseFollowup::new()
            .embed(notice_embed(notice))
            .components(notice_components(notice))
            .ephemeral(true);

        if let Err(e) = modal.create_followup(ctx, followup).await {
            warn!(user_id = %modal.user.id, error = %e, "Failed to send reply");
        }
    }
}

#[async_trait]
impl EventHandler for VerificationHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(bot = %ready.user.name, guilds = ready.guilds.len(), "Connected to Discord");

        if let Err(e) = self.admin_channel_id.to_channel(&ctx).await {
            warn!(
                channel_id = %self.admin_channel_id,
                error = %e,
                "Admin log channel is not reachable"
            );
        }

        let settings = self.engine.settings();
        let status = if settings.restrict_to_domains {
            format!(
                "Bot started with email domain restriction enabled. Allowed domains: {}",
                settings.allowed_domains.join(", ")
            )
        } else {
            "Bot started with email domain restriction disabled. All email domains allowed."
                .to_string()
        };
        info!("{}", status);
        self.notifier.log(status);
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        if new_member.guild_id != self.guild_id {
            return;
        }

        let user = &new_member.user;
        let notice = self.renderer.welcome();
        let message = CreateMessage::new()
            .embed(notice_embed(&notice))
            .components(notice_components(&notice));

        match user.direct_message(&ctx, message).await {
            Ok(_) => {
                info!(user_id = %user.id, "Verification DM sent");
                self.notifier.log(format!(
                    "New member joined: <@{}> ({}). Verification DM sent.",
                    user.id, user.id
                ));
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Failed to send verification DM");
                self.notifier.log(format!(
                    "Failed to send verification DM to <@{}> ({}). User may have DMs disabled.",
                    user.id, user.id
                ));
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Component(component) => self.on_component(&ctx, &component).await,
            Interaction::Modal(modal) => self.on_modal(&ctx, &modal).await,
            _ => {}
        }
    }
}
