//! # Audio Module
//!
//! Pipeline de transcodificación para fuentes que el transporte no puede
//! sondear con fiabilidad (archivos subidos con contenedores arbitrarios).
//!
//! Los enlaces normales pasan directo al transporte, que decodifica con
//! Symphonia. Para adjuntos, [`transcode::Transcoder`] decodifica con un
//! proceso ffmpeg externo a un formato fijo (PCM s16le, 48 kHz, estéreo) y el
//! driver de voz se encarga del encode Opus (frames de 960 muestras, 20 ms).

pub mod transcode;
