use thiserror::Error;

/// Errores de reproducción por comando.
///
/// Todo error de este tipo se captura en el límite del comando y se convierte
/// en un mensaje visible para el usuario vía [`PlaybackError::user_message`];
/// nunca tumba el proceso. La única excepción es `MissingConfiguration`, que
/// es fatal durante el arranque.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("configuración faltante o inválida: {0}")]
    MissingConfiguration(String),

    #[error("el usuario no está en un canal de voz")]
    NoVoiceChannel,

    #[error("enlace inválido: {0}")]
    InvalidLink(String),

    #[error("fuente no soportada: {0}")]
    UnsupportedSource(String),

    #[error("formato de archivo no soportado: {0}")]
    UnsupportedFormat(String),

    #[error("no se pudo obtener el stream: {0}")]
    FetchFailed(String),

    #[error("falló la transcodificación: {0}")]
    TranscodeFailed(String),

    #[error("error del transporte de voz: {0}")]
    TransportError(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl PlaybackError {
    /// Mensaje visible para el usuario, en el registro de los embeds del bot.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingConfiguration(name) => {
                format!("⚙️ Falta configuración del bot: `{name}`.")
            }
            Self::NoVoiceChannel => {
                "🔇 Debes estar en un canal de voz para usar este comando.".to_string()
            }
            Self::InvalidLink(_) => {
                "❌ Ese enlace no parece válido. Asegúrate de pasar la dirección completa \
                 (ej: https://youtube.com/...)."
                    .to_string()
            }
            Self::UnsupportedSource(_) => {
                "❌ Ese tipo de enlace no está soportado, o parece una búsqueda en vez de \
                 un enlace directo a un elemento reproducible."
                    .to_string()
            }
            Self::UnsupportedFormat(_) => {
                "❌ Ese tipo de archivo puede no estar soportado. Sube un archivo en formato \
                 MP3 / OGG / WEBM / WAV / FLAC / M4A."
                    .to_string()
            }
            Self::FetchFailed(detail) | Self::TranscodeFailed(detail) => {
                format!(
                    "⚠️ Ocurrió un error al intentar reproducir eso.\nDetalles: `{detail}`"
                )
            }
            Self::TransportError(detail) => {
                format!(
                    "⚠️ No pude conectarme al canal de voz.\nDetalles: `{detail}`"
                )
            }
            Self::Unexpected(err) => {
                format!("⚠️ Ocurrió un error inesperado.\nDetalles: `{err}`")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message_names_allowed_list() {
        let msg = PlaybackError::UnsupportedFormat("video.mp4".to_string()).user_message();
        for fmt in ["MP3", "OGG", "WEBM", "WAV", "FLAC", "M4A"] {
            assert!(msg.contains(fmt), "el mensaje debería mencionar {fmt}: {msg}");
        }
    }

    #[test]
    fn test_no_voice_channel_message() {
        let msg = PlaybackError::NoVoiceChannel.user_message();
        assert!(msg.contains("canal de voz"));
    }

    #[test]
    fn test_fetch_failed_message_includes_detail() {
        let msg = PlaybackError::FetchFailed("timeout".to_string()).user_message();
        assert!(msg.contains("timeout"));
    }
}
