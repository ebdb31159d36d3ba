//! # Session Module
//!
//! Registro de sesiones de voz por guild.
//!
//! Una [`Session`] es el par (conexión, player) de un guild: el `Call` de
//! songbird. El [`SessionRegistry`] es el único dueño de las sesiones y
//! garantiza a lo sumo una por guild: se crea bajo demanda en el primer
//! `play` exitoso, se reutiliza mientras la conexión siga viva y se elimina
//! con `stop` o cuando el transporte la destruye desde afuera.
//!
//! Dos comandos `play` concurrentes para el mismo guild no se serializan: el
//! último `play` gana y el anterior queda superado en el transporte.

pub mod events;

use std::sync::Arc;

use dashmap::DashMap;
use serenity::model::id::{ChannelId, GuildId};
use songbird::{
    driver::Bitrate, input::Input, tracks::TrackHandle, Call, Event, Songbird, TrackEvent,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::PlaybackError;
use events::{TrackErrorNotifier, TrackIdleNotifier};

/// La ocupación de voz activa de un guild: conexión + player.
#[derive(Clone)]
pub struct Session {
    call: Arc<Mutex<Call>>,
}

impl Session {
    /// Si la conexión subyacente sigue en un canal.
    pub async fn is_live(&self) -> bool {
        self.call.lock().await.current_channel().is_some()
    }

    /// Reproduce el input, reemplazando cualquier track en curso.
    ///
    /// `play_only_input` descarta los tracks anteriores: el último play gana.
    /// Se espera a que el track sea reproducible para que un stream que no se
    /// pudo abrir falle acá y no como evento asíncrono silencioso.
    pub async fn play(&self, input: Input) -> Result<TrackHandle, PlaybackError> {
        let handle = self.call.lock().await.play_only_input(input);

        handle
            .make_playable_async()
            .await
            .map_err(|e| PlaybackError::FetchFailed(e.to_string()))?;

        Ok(handle)
    }

    /// Detiene todos los tracks del player, descartando lo que esté en vuelo.
    async fn silence(&self) {
        self.call.lock().await.stop();
    }
}

/// Registro de sesiones: a lo sumo una por guild.
pub struct SessionRegistry {
    sessions: DashMap<GuildId, Session>,
    opus_bitrate: u32,
}

impl SessionRegistry {
    pub fn new(opus_bitrate: u32) -> Self {
        Self {
            sessions: DashMap::new(),
            opus_bitrate,
        }
    }

    /// Devuelve la sesión viva del guild o crea una nueva.
    ///
    /// Una sesión existente con conexión viva se devuelve sin cambios: no se
    /// mueve al canal del solicitante aunque esté en otro. Si la conexión
    /// quedó terminada, se descarta la entrada y se conecta de nuevo al canal
    /// indicado.
    pub async fn get_or_create(
        &self,
        manager: Arc<Songbird>,
        guild_id: GuildId,
        voice_channel: ChannelId,
    ) -> Result<Session, PlaybackError> {
        let existing = self.sessions.get(&guild_id).map(|e| e.value().clone());
        if let Some(session) = existing {
            if session.is_live().await {
                debug!("♻️ Reutilizando sesión de voz en guild {}", guild_id);
                return Ok(session);
            }
            // Conexión terminada: la entrada se reemplaza
            self.sessions.remove(&guild_id);
        }

        let call = manager
            .join(guild_id, voice_channel)
            .await
            .map_err(|e| PlaybackError::TransportError(e.to_string()))?;

        {
            let mut handler = call.lock().await;
            handler.set_bitrate(Bitrate::BitsPerSecond(self.opus_bitrate as i32));

            // Observadores fijos del player: fin de track y error, nada más.
            // Ambos solo loguean; no hay reintento ni re-encolado.
            handler.remove_all_global_events();
            handler.add_global_event(
                Event::Track(TrackEvent::End),
                TrackIdleNotifier { guild_id },
            );
            handler.add_global_event(
                Event::Track(TrackEvent::Error),
                TrackErrorNotifier { guild_id },
            );
        }

        let session = Session { call };
        self.sessions.insert(guild_id, session.clone());

        info!("🔊 Sesión de voz creada en guild {}", guild_id);
        Ok(session)
    }

    /// Detiene el player, desconecta y elimina la entrada del guild.
    ///
    /// Devuelve si existía una sesión. Sin entrada no se toca el transporte.
    /// Un disconnect fallido se tolera: la entrada ya salió del registro, que
    /// no debe filtrar claves de sesiones muertas.
    pub async fn remove(&self, manager: Arc<Songbird>, guild_id: GuildId) -> bool {
        let Some((_, session)) = self.sessions.remove(&guild_id) else {
            return false;
        };

        session.silence().await;

        if let Err(e) = manager.remove(guild_id).await {
            warn!(
                "⚠️ Error al desconectar del canal de voz en guild {}: {}",
                guild_id, e
            );
        }

        info!("👋 Sesión de voz terminada en guild {}", guild_id);
        true
    }

    /// Elimina la entrada sin operaciones de transporte.
    ///
    /// Para cuando el transporte ya destruyó la conexión por su cuenta (bot
    /// expulsado o desconectado desde afuera).
    pub fn discard(&self, guild_id: GuildId) -> bool {
        self.sessions.remove(&guild_id).is_some()
    }

    #[allow(dead_code)]
    pub fn contains(&self, guild_id: GuildId) -> bool {
        self.sessions.contains_key(&guild_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remove_without_session_returns_false() {
        let registry = SessionRegistry::new(96_000);
        let manager = Songbird::serenity();

        // Sin entrada: false y ninguna operación de transporte
        assert!(!registry.remove(manager, GuildId::new(1)).await);
    }

    #[tokio::test]
    async fn test_remove_does_not_touch_other_guilds() {
        let registry = SessionRegistry::new(96_000);
        let manager = Songbird::serenity();

        let _ = registry.remove(manager.clone(), GuildId::new(1)).await;
        assert!(!registry.contains(GuildId::new(2)));
    }

    #[test]
    fn test_discard_without_session_returns_false() {
        let registry = SessionRegistry::new(96_000);
        assert!(!registry.discard(GuildId::new(7)));
    }

    #[test]
    fn test_discard_is_idempotent() {
        let registry = SessionRegistry::new(96_000);
        assert!(!registry.discard(GuildId::new(7)));
        assert!(!registry.discard(GuildId::new(7)));
    }
}
