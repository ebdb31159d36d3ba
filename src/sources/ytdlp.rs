use async_process::Command;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{MediaSource, ResolvedTrack, FALLBACK_TITLE};
use crate::error::PlaybackError;

/// Cliente para enlaces resueltos vía yt-dlp (YouTube, SoundCloud, etc.)
pub struct YtDlpSource {
    ytdlp_path: String,
    client: reqwest::Client,
}

/// Información extraída de yt-dlp
#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    title: String,
}

impl YtDlpSource {
    pub fn new(ytdlp_path: &str) -> Self {
        Self {
            ytdlp_path: ytdlp_path.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Obtiene el título del elemento, a mejor esfuerzo.
    ///
    /// Un fallo aquí no es fatal: la reproducción sigue con el título de
    /// respaldo.
    async fn fetch_title(&self, url: &str) -> Option<String> {
        debug!("📊 Obteniendo metadata de: {}", url);

        let output = Command::new(&self.ytdlp_path)
            .args([
                "--no-playlist",
                "--dump-json",
                "--skip-download",
                "--no-warnings",
                url,
            ])
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            warn!(
                "⚠️ yt-dlp no pudo obtener metadata de {}: {}",
                url,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let info: YtDlpInfo = serde_json::from_str(stdout.trim()).ok()?;

        Some(info.title)
    }
}

#[async_trait]
impl MediaSource for YtDlpSource {
    async fn resolve(&self, reference: &str) -> Result<ResolvedTrack, PlaybackError> {
        let title = match self.fetch_title(reference).await {
            Some(title) => title,
            None => FALLBACK_TITLE.to_string(),
        };

        // Input perezoso: yt-dlp extrae el stream recién al reproducir
        let ytdl = songbird::input::YoutubeDl::new(self.client.clone(), reference.to_string());

        Ok(ResolvedTrack {
            input: ytdl.into(),
            title,
            source_name: self.source_name(),
        })
    }

    fn source_name(&self) -> &'static str {
        "yt-dlp"
    }
}
