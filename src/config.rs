use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    // Discord
    pub discord_token: String,
    pub application_id: u64,
    pub guild_id: Option<u64>, // Para registrar comandos solo en un servidor

    // Audio
    pub opus_bitrate: u32,

    // Binarios externos
    pub ffmpeg_path: String,
    pub ytdlp_path: String,
}

impl Config {
    /// Carga la configuración desde variables de entorno (con soporte .env).
    ///
    /// `DISCORD_TOKEN` y `APPLICATION_ID` son obligatorios; su ausencia es
    /// fatal en el arranque. El resto tiene valores por defecto razonables.
    pub fn load() -> Result<Self, PlaybackError> {
        dotenvy::dotenv().ok();

        let config = Self {
            // Discord
            discord_token: required_var("DISCORD_TOKEN")?,
            application_id: required_var("APPLICATION_ID")?.parse().map_err(|_| {
                PlaybackError::MissingConfiguration(
                    "APPLICATION_ID debe ser un número".to_string(),
                )
            })?,
            guild_id: std::env::var("GUILD_ID").ok().and_then(|s| s.parse().ok()),

            // Audio
            opus_bitrate: std::env::var("OPUS_BITRATE")
                .unwrap_or_else(|_| "96000".to_string()) // 96kbps (default de Discord)
                .parse()
                .map_err(|_| {
                    PlaybackError::MissingConfiguration(
                        "OPUS_BITRATE debe ser un número".to_string(),
                    )
                })?,

            // Binarios externos
            ffmpeg_path: std::env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ytdlp_path: std::env::var("YTDLP_PATH").unwrap_or_else(|_| "yt-dlp".to_string()),
        };

        config.validate()?;

        Ok(config)
    }

    /// Chequeos de sanidad sobre los valores cargados.
    pub fn validate(&self) -> Result<(), PlaybackError> {
        if self.discord_token.trim().is_empty() {
            return Err(PlaybackError::MissingConfiguration(
                "DISCORD_TOKEN está vacío".to_string(),
            ));
        }

        if self.application_id == 0 {
            return Err(PlaybackError::MissingConfiguration(
                "APPLICATION_ID no puede ser 0".to_string(),
            ));
        }

        // Límites de Opus que acepta el transporte de voz de Discord
        if self.opus_bitrate > 510_000 {
            return Err(PlaybackError::MissingConfiguration(format!(
                "OPUS_BITRATE no puede superar 510kbps, se recibió: {}",
                self.opus_bitrate
            )));
        }

        if self.opus_bitrate < 8_000 {
            return Err(PlaybackError::MissingConfiguration(format!(
                "OPUS_BITRATE demasiado bajo, mínimo 8kbps, se recibió: {}",
                self.opus_bitrate
            )));
        }

        Ok(())
    }

    /// Resumen de la configuración para logging, sin datos sensibles.
    pub fn summary(&self) -> String {
        format!(
            "Config: App ID {} (Guild: {}), Opus {}kbps, ffmpeg='{}', yt-dlp='{}'",
            self.application_id,
            self.guild_id
                .map_or("global".to_string(), |id| id.to_string()),
            self.opus_bitrate / 1000,
            self.ffmpeg_path,
            self.ytdlp_path,
        )
    }
}

fn required_var(name: &'static str) -> Result<String, PlaybackError> {
    std::env::var(name)
        .map_err(|_| PlaybackError::MissingConfiguration(format!("{name} no está definido")))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Discord (sin defaults - deben proveerse)
            discord_token: String::new(),
            application_id: 0,
            guild_id: None,

            // Audio
            opus_bitrate: 96_000, // 96kbps (default de Discord)

            // Binarios externos
            ffmpeg_path: "ffmpeg".to_string(),
            ytdlp_path: "yt-dlp".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            discord_token: "token-de-prueba".to_string(),
            application_id: 1234,
            ..Config::default()
        }
    }

    #[test]
    fn test_validate_accepts_defaults_with_credentials() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_token() {
        let config = Config {
            discord_token: "   ".to_string(),
            ..valid_config()
        };
        assert!(matches!(
            config.validate(),
            Err(PlaybackError::MissingConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bitrate_out_of_range() {
        let too_high = Config {
            opus_bitrate: 600_000,
            ..valid_config()
        };
        assert!(too_high.validate().is_err());

        let too_low = Config {
            opus_bitrate: 4_000,
            ..valid_config()
        };
        assert!(too_low.validate().is_err());
    }

    #[test]
    fn test_summary_does_not_leak_token() {
        let config = valid_config();
        assert!(!config.summary().contains("token-de-prueba"));
    }
}
