use async_trait::async_trait;
use tracing::debug;

use super::{MediaSource, ResolvedTrack, FALLBACK_TITLE};
use crate::error::PlaybackError;

/// Cliente para enlaces directos a archivos de audio (https://.../cancion.mp3)
pub struct DirectAudioSource {
    client: reqwest::Client,
}

impl DirectAudioSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for DirectAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaSource for DirectAudioSource {
    async fn resolve(&self, reference: &str) -> Result<ResolvedTrack, PlaybackError> {
        debug!("🔗 Stream HTTP directo: {}", reference);

        // El nombre del archivo en el path sirve de título
        let title = reference
            .split('?')
            .next()
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_TITLE)
            .to_string();

        let request =
            songbird::input::HttpRequest::new(self.client.clone(), reference.to_string());

        Ok(ResolvedTrack {
            input: request.into(),
            title,
            source_name: self.source_name(),
        })
    }

    fn source_name(&self) -> &'static str {
        "direct"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_title_comes_from_file_name() {
        let source = DirectAudioSource::new();
        let track = source
            .resolve("https://example.com/media/cancion.mp3?token=abc")
            .await
            .unwrap();
        assert_eq!(track.title, "cancion.mp3");
    }
}
