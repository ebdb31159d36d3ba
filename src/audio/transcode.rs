use std::process::Stdio;

use anyhow::{Context, Result};
use songbird::input::{ChildContainer, Input};
use tracing::{debug, info};

use crate::error::PlaybackError;

/// Frecuencia de muestreo que espera el transporte de voz.
pub const SAMPLE_RATE_HZ: u32 = 48_000;

/// Canales de salida del decodificador.
pub const CHANNELS: u32 = 2;

/// Decodificador externo con formato de salida fijo.
///
/// Produce PCM firmado de 16 bits little-endian a 48 kHz estéreo en un
/// envoltorio WAV, para que el probe del transporte nunca tenga que adivinar
/// el contenedor de origen. El encode Opus (frames de 960 muestras) corre en
/// el driver de voz.
pub struct Transcoder {
    ffmpeg_path: String,
}

impl Transcoder {
    pub fn new(ffmpeg_path: &str) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.to_string(),
        }
    }

    /// Abre un stream decodificado contra una URL remota.
    ///
    /// El proceso hijo queda ligado al `Input`; songbird lo termina al soltar
    /// el track. La salida parcial ya transmitida no se retrae si el proceso
    /// muere a mitad de stream: eso llega como evento de error del player.
    pub fn open(&self, url: &str) -> Result<Input, PlaybackError> {
        info!("🎛️ Transcodificando con {}: {}", self.ffmpeg_path, url);

        let child = std::process::Command::new(&self.ffmpeg_path)
            .args(Self::decode_args(url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                PlaybackError::TranscodeFailed(format!(
                    "no se pudo lanzar {}: {}",
                    self.ffmpeg_path, e
                ))
            })?;

        debug!("🎛️ Proceso ffmpeg lanzado (pid {})", child.id());

        let container = ChildContainer::from(child);
        Ok(container.into())
    }

    /// Argumentos de ffmpeg para el formato de salida fijo.
    fn decode_args(url: &str) -> Vec<String> {
        vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            // Las URLs de adjuntos son HTTPS; reintentar si el CDN corta
            "-reconnect".into(),
            "1".into(),
            "-reconnect_streamed".into(),
            "1".into(),
            "-i".into(),
            url.into(),
            "-vn".into(),
            "-c:a".into(),
            "pcm_s16le".into(),
            "-ar".into(),
            SAMPLE_RATE_HZ.to_string(),
            "-ac".into(),
            CHANNELS.to_string(),
            "-f".into(),
            "wav".into(),
            "pipe:1".into(),
        ]
    }

    /// Verifica que el binario ffmpeg exista y responda.
    pub async fn verify_available(&self) -> Result<()> {
        let output = async_process::Command::new(&self.ffmpeg_path)
            .arg("-version")
            .output()
            .await
            .with_context(|| format!("no se pudo ejecutar {}", self.ffmpeg_path))?;

        if !output.status.success() {
            anyhow::bail!("{} existe pero no responde", self.ffmpeg_path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_args_fix_output_format() {
        let args = Transcoder::decode_args("https://example.com/tema.ogg");

        // PCM s16le, 48 kHz, estéreo, contenedor WAV por stdout
        for expected in ["pcm_s16le", "48000", "2", "wav", "pipe:1"] {
            assert!(
                args.iter().any(|a| a == expected),
                "falta el argumento {expected}: {args:?}"
            );
        }
        assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
    }

    #[test]
    fn test_decode_args_include_source_url() {
        let url = "https://cdn.discordapp.com/attachments/1/2/tema.flac";
        let args = Transcoder::decode_args(url);

        let input_pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input_pos + 1], url);
    }

    #[test]
    fn test_fixed_format_constants() {
        assert_eq!(SAMPLE_RATE_HZ, 48_000);
        assert_eq!(CHANNELS, 2);
    }
}
