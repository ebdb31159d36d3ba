use tracing::info;

use super::{has_audio_extension, ResolvedTrack};
use crate::{audio::transcode::Transcoder, error::PlaybackError};

/// Fuente para archivos adjuntos subidos a Discord.
///
/// El contenido no se valida contra la extensión: un contenedor que no
/// coincida con su nombre falla recién en la decodificación.
pub struct AttachmentSource {
    transcoder: Transcoder,
}

impl AttachmentSource {
    pub fn new(transcoder: Transcoder) -> Self {
        Self { transcoder }
    }

    /// Resuelve un adjunto por nombre y URL remota.
    ///
    /// La extensión se comprueba antes de abrir cualquier conexión; un
    /// adjunto rechazado nunca genera tráfico de red.
    pub async fn resolve(
        &self,
        file_name: &str,
        file_url: &str,
    ) -> Result<ResolvedTrack, PlaybackError> {
        if !has_audio_extension(file_name) {
            return Err(PlaybackError::UnsupportedFormat(file_name.to_string()));
        }

        info!("📎 Abriendo adjunto: {}", file_name);

        let input = self.transcoder.open(file_url)?;

        Ok(ResolvedTrack {
            input,
            title: file_name.to_string(),
            source_name: "archivo",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> AttachmentSource {
        AttachmentSource::new(Transcoder::new("ffmpeg"))
    }

    #[tokio::test]
    async fn test_rejects_mp4_before_any_fetch() {
        // URL inválida a propósito: si se intentara abrir, fallaría con otro error
        let result = source()
            .resolve("video.mp4", "http://invalid.invalid/video.mp4")
            .await;
        assert!(matches!(result, Err(PlaybackError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_rejects_extensionless_name() {
        let result = source().resolve("cancion", "http://invalid.invalid/cancion").await;
        assert!(matches!(result, Err(PlaybackError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(has_audio_extension("Cancion.MP3"));
        assert!(has_audio_extension("tema.M4A"));
    }
}
