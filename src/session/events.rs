use serenity::{async_trait, model::id::GuildId};
use songbird::{Event as VoiceEvent, EventContext, EventHandler as VoiceEventHandler};
use tracing::{debug, error};

/// Handler para el fin de un track.
///
/// No hace nada más que loguear: el bot se queda en el canal hasta que
/// alguien pida `stop`.
pub struct TrackIdleNotifier {
    pub guild_id: GuildId,
}

#[async_trait]
impl VoiceEventHandler for TrackIdleNotifier {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<VoiceEvent> {
        debug!("🎵 Track terminó en guild {}", self.guild_id);
        None
    }
}

/// Handler para errores de tracks. Solo log; sin reintento y sin aviso al
/// usuario.
pub struct TrackErrorNotifier {
    pub guild_id: GuildId,
}

#[async_trait]
impl VoiceEventHandler for TrackErrorNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<VoiceEvent> {
        if let EventContext::Track(track_list) = ctx {
            for (state, _handle) in *track_list {
                error!(
                    "❌ Error de player en guild {}: {:?}",
                    self.guild_id, state.playing
                );
            }
        }

        None
    }
}
