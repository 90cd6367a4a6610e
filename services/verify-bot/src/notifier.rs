//! 管理日志频道通知

use std::sync::Arc;

use mailgate_ports::AdminNotifier;
use serenity::all::{ChannelId, Http};
use tracing::debug;

/// 向管理频道发送文本，发送在后台任务中完成
pub struct DiscordAdminNotifier {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordAdminNotifier {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

impl AdminNotifier for DiscordAdminNotifier {
    fn log(&self, text: String) {
        let http = self.http.clone();
        let channel_id = self.channel_id;

        tokio::spawn(async move {
            if let Err(e) = channel_id.say(&http, text).await {
                debug!(channel_id = %channel_id, error = %e, "Admin log delivery failed");
            }
        });
    }
}
