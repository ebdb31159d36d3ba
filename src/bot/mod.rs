//! # Bot Module
//!
//! Implementación del bot de Discord para VoiceCast.
//!
//! El bot gira alrededor de [`VoiceCastBot`], que implementa el
//! [`EventHandler`] de Serenity y es dueño del contexto de la aplicación:
//!
//! - [`crate::session::SessionRegistry`]: sesiones de voz por guild
//! - [`crate::sources::MediaResolver`]: resolución de enlaces y adjuntos
//!
//! Ambos se pasan de forma explícita a los handlers de comandos; no hay
//! estado global. Los eventos manejados son `ready` (registro de comandos),
//! `interaction_create` (dispatch de comandos slash) y `voice_state_update`
//! (limpieza del registro cuando el transporte destruye la conexión).

use anyhow::Result;
use serenity::{
    all::{Context, EventHandler, GuildId, Interaction, Ready, VoiceState},
    async_trait,
};
use std::sync::Arc;
use tracing::{error, info, warn};

pub mod commands;
pub mod handlers;

use crate::{config::Config, session::SessionRegistry, sources::MediaResolver};

/// Handler principal del bot.
pub struct VoiceCastBot {
    /// Configuración cargada de variables de entorno
    config: Arc<Config>,
    /// Registro de sesiones de voz por guild
    pub registry: Arc<SessionRegistry>,
    /// Resolución de enlaces y archivos adjuntos
    pub resolver: Arc<MediaResolver>,
}

impl VoiceCastBot {
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(SessionRegistry::new(config.opus_bitrate));
        let resolver = Arc::new(MediaResolver::new(&config));

        Self {
            config: Arc::new(config),
            registry,
            resolver,
        }
    }

    /// Registra los comandos slash: por guild si hay `GUILD_ID` (propagación
    /// inmediata, útil en desarrollo), globales si no.
    async fn register_commands(&self, ctx: &Context) -> Result<()> {
        info!("📝 Registrando comandos slash...");
        info!("🔧 Application ID: {}", self.config.application_id);

        match self.config.guild_id {
            Some(guild_id) => {
                let guild_id = GuildId::from(guild_id);

                commands::register_guild_commands(ctx, guild_id)
                    .await
                    .map_err(|e| {
                        error!("❌ Error registrando comandos de guild: {:?}", e);
                        anyhow::anyhow!(
                            "No se pudieron registrar comandos de guild. Verifica que el bot \
                             tenga permisos de 'applications.commands' en la guild."
                        )
                    })?;
                info!("✅ Comandos registrados para guild {}", guild_id);
            }
            None => {
                commands::register_global_commands(ctx).await.map_err(|e| {
                    error!("❌ Error registrando comandos globales: {:?}", e);
                    anyhow::anyhow!("No se pudieron registrar comandos globales.")
                })?;
                info!("🌐 Comandos registrados globalmente");
            }
        }

        Ok(())
    }
}

#[async_trait]
impl EventHandler for VoiceCastBot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🤖 {} está en línea!", ready.user.name);
        info!("📊 Conectado a {} servidores", ready.guilds.len());

        if let Err(e) = self.register_commands(&ctx).await {
            error!("Error al registrar comandos: {:?}", e);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            if let Err(e) = handlers::handle_command(&ctx, command, self).await {
                error!("Error manejando comando: {:?}", e);
            }
        }
    }

    /// Mantiene el invariante "hay sesión si y solo si el bot ocupa un canal
    /// de voz": si el transporte destruyó la conexión desde afuera (bot
    /// expulsado o movido fuera), la entrada del registro se descarta.
    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        let current_user_id = ctx.cache.current_user().id;

        if new.user_id == current_user_id && old.is_some() && new.channel_id.is_none() {
            if let Some(guild_id) = new.guild_id {
                if self.registry.discard(guild_id) {
                    warn!(
                        "🔌 Bot desconectado desde afuera en guild {}; sesión descartada",
                        guild_id
                    );
                }
            }
        }
    }
}
