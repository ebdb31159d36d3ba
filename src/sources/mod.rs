//! # Sources Module
//!
//! Resolución de medios: convierte un enlace o un archivo adjunto en un
//! stream reproducible para songbird, más un título para mostrar.
//!
//! Cada proveedor implementa [`MediaSource`]; el [`MediaResolver`] clasifica
//! la referencia entrante y delega en la fuente que corresponda. Los enlaces
//! que resultan ser búsquedas o playlists se rechazan antes de pedir ningún
//! stream.

pub mod attachment;
pub mod direct_url;
pub mod ytdlp;

use async_trait::async_trait;
use songbird::input::Input;
use url::Url;

pub use attachment::AttachmentSource;
pub use direct_url::DirectAudioSource;
pub use ytdlp::YtDlpSource;

use crate::{audio::transcode::Transcoder, config::Config, error::PlaybackError};

/// Título de respaldo cuando no se pudo obtener metadata.
pub const FALLBACK_TITLE: &str = "Título desconocido";

/// Extensiones de audio aceptadas para archivos subidos y enlaces directos.
pub const ALLOWED_AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "ogg", "webm", "wav", "flac", "m4a"];

/// Resultado de resolver una referencia: el stream listo para el transporte
/// y el título a mostrar. Vive solo durante el manejo de un comando.
pub struct ResolvedTrack {
    pub input: Input,
    pub title: String,
    pub source_name: &'static str,
}

/// Trait común para todas las fuentes de medios
#[async_trait]
pub trait MediaSource {
    /// Resuelve la referencia a un stream reproducible
    async fn resolve(&self, reference: &str) -> Result<ResolvedTrack, PlaybackError>;

    /// Nombre de la fuente
    fn source_name(&self) -> &'static str;
}

/// Categoría de un enlace entrante.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    YouTubeVideo,
    SoundCloudTrack,
    DirectAudio,
    Search,
    Playlist,
    Unknown,
}

/// Clasifica un enlace ya parseado según proveedor y tipo de página.
pub fn classify_link(url: &Url) -> LinkKind {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    match host {
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            let path = url.path();
            if path == "/results" || url.query_pairs().any(|(k, _)| k == "search_query") {
                return LinkKind::Search;
            }
            if path == "/playlist" {
                return LinkKind::Playlist;
            }
            if path == "/watch" && url.query_pairs().any(|(k, _)| k == "v") {
                return LinkKind::YouTubeVideo;
            }
            if path.starts_with("/shorts/")
                || path.starts_with("/live/")
                || path.starts_with("/embed/")
            {
                return LinkKind::YouTubeVideo;
            }
            LinkKind::Unknown
        }
        "youtu.be" => {
            if url.path().len() > 1 {
                LinkKind::YouTubeVideo
            } else {
                LinkKind::Unknown
            }
        }
        "soundcloud.com" | "on.soundcloud.com" => {
            let segments: Vec<&str> = url
                .path_segments()
                .map(|s| s.filter(|p| !p.is_empty()).collect())
                .unwrap_or_default();
            match segments.as_slice() {
                ["search", ..] => LinkKind::Search,
                [_, "sets", ..] => LinkKind::Playlist,
                [_, _, ..] => LinkKind::SoundCloudTrack,
                _ => LinkKind::Unknown,
            }
        }
        _ if has_audio_extension(url.path()) => LinkKind::DirectAudio,
        _ => LinkKind::Unknown,
    }
}

/// Comprueba la extensión contra la lista de audio aceptada (sin abrir nada).
pub fn has_audio_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    ALLOWED_AUDIO_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

/// Manager de todas las fuentes de medios
pub struct MediaResolver {
    ytdlp: YtDlpSource,
    direct: DirectAudioSource,
    attachments: AttachmentSource,
}

impl MediaResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            ytdlp: YtDlpSource::new(&config.ytdlp_path),
            direct: DirectAudioSource::new(),
            attachments: AttachmentSource::new(Transcoder::new(&config.ffmpeg_path)),
        }
    }

    /// Resuelve un enlace pegado por el usuario.
    ///
    /// Valida la forma de la URL, clasifica el enlace y delega en la fuente
    /// correspondiente. Para enlaces rechazados no se pide ningún stream.
    pub async fn resolve(&self, link: &str) -> Result<ResolvedTrack, PlaybackError> {
        let parsed =
            Url::parse(link).map_err(|_| PlaybackError::InvalidLink(link.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PlaybackError::InvalidLink(link.to_string()));
        }

        match classify_link(&parsed) {
            LinkKind::YouTubeVideo | LinkKind::SoundCloudTrack => self.ytdlp.resolve(link).await,
            LinkKind::DirectAudio => self.direct.resolve(link).await,
            LinkKind::Search => Err(PlaybackError::UnsupportedSource(
                "el enlace parece una búsqueda, no un elemento reproducible".to_string(),
            )),
            LinkKind::Playlist => Err(PlaybackError::UnsupportedSource(
                "las playlists no están soportadas".to_string(),
            )),
            LinkKind::Unknown => Err(PlaybackError::UnsupportedSource(format!(
                "proveedor no soportado: {}",
                parsed.host_str().unwrap_or("desconocido")
            ))),
        }
    }

    /// Resuelve un archivo adjunto subido por el usuario.
    pub async fn resolve_attachment(
        &self,
        file_name: &str,
        file_url: &str,
    ) -> Result<ResolvedTrack, PlaybackError> {
        self.attachments.resolve(file_name, file_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classify(link: &str) -> LinkKind {
        classify_link(&Url::parse(link).unwrap())
    }

    #[test]
    fn test_classify_youtube_links() {
        assert_eq!(
            classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            LinkKind::YouTubeVideo
        );
        assert_eq!(classify("https://youtu.be/dQw4w9WgXcQ"), LinkKind::YouTubeVideo);
        assert_eq!(
            classify("https://music.youtube.com/watch?v=abc123"),
            LinkKind::YouTubeVideo
        );
        assert_eq!(
            classify("https://www.youtube.com/shorts/abc123"),
            LinkKind::YouTubeVideo
        );
    }

    #[test]
    fn test_classify_rejects_search_and_playlist_pages() {
        assert_eq!(
            classify("https://www.youtube.com/results?search_query=lofi"),
            LinkKind::Search
        );
        assert_eq!(
            classify("https://www.youtube.com/playlist?list=PL12345"),
            LinkKind::Playlist
        );
        assert_eq!(
            classify("https://soundcloud.com/search?q=lofi"),
            LinkKind::Search
        );
        assert_eq!(
            classify("https://soundcloud.com/algun-artista/sets/mi-lista"),
            LinkKind::Playlist
        );
    }

    #[test]
    fn test_classify_soundcloud_and_direct_audio() {
        assert_eq!(
            classify("https://soundcloud.com/artista/tema"),
            LinkKind::SoundCloudTrack
        );
        assert_eq!(
            classify("https://example.com/media/cancion.mp3"),
            LinkKind::DirectAudio
        );
        assert_eq!(classify("https://example.com/pagina"), LinkKind::Unknown);
    }

    #[test]
    fn test_has_audio_extension() {
        assert!(has_audio_extension("cancion.mp3"));
        assert!(has_audio_extension("CANCION.FLAC"));
        assert!(!has_audio_extension("video.mp4"));
        assert!(!has_audio_extension("sin_extension"));
    }

    #[tokio::test]
    async fn test_resolve_rejects_malformed_link() {
        let resolver = MediaResolver::new(&Config::default());
        let result = resolver.resolve("esto no es un enlace").await;
        assert!(matches!(result, Err(PlaybackError::InvalidLink(_))));
    }

    #[tokio::test]
    async fn test_resolve_rejects_non_http_scheme() {
        let resolver = MediaResolver::new(&Config::default());
        let result = resolver.resolve("ftp://example.com/cancion.mp3").await;
        assert!(matches!(result, Err(PlaybackError::InvalidLink(_))));
    }

    #[tokio::test]
    async fn test_resolve_rejects_search_without_requesting_stream() {
        let resolver = MediaResolver::new(&Config::default());
        let result = resolver
            .resolve("https://www.youtube.com/results?search_query=lofi")
            .await;
        assert!(matches!(result, Err(PlaybackError::UnsupportedSource(_))));
    }

    #[tokio::test]
    async fn test_resolve_rejects_unknown_provider() {
        let resolver = MediaResolver::new(&Config::default());
        let result = resolver.resolve("https://example.com/pagina").await;
        assert!(matches!(result, Err(PlaybackError::UnsupportedSource(_))));
    }
}
