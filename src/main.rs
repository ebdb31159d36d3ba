use anyhow::Result;
use serenity::{model::gateway::GatewayIntents, Client};
use songbird::SerenityInit;
use tracing::{debug, error, info};

mod audio;
mod bot;
mod config;
mod error;
mod session;
mod sources;
mod ui;

use crate::audio::transcode::Transcoder;
use crate::bot::VoiceCastBot;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("voicecast=debug".parse()?)
                .add_directive("serenity=info".parse()?)
                .add_directive("songbird=info".parse()?),
        )
        .init();

    info!("📻 Iniciando VoiceCast v{}", env!("CARGO_PKG_VERSION"));

    // Cargar configuración: su ausencia es fatal antes de atender comandos
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {}. Definila en .env o en las variables de entorno.", e);
            std::process::exit(1);
        }
    };

    // Manejar health check si es necesario
    if std::env::args().any(|arg| arg == "--health-check") {
        return health_check(&config).await;
    }

    debug!("{}", config.summary());

    // Intents mínimos: el proceso es un cliente puramente saliente
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    // Crear handler del bot
    let handler = VoiceCastBot::new(config.clone());

    // Construir cliente
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .register_songbird()
        .await?;

    // Manejar shutdown graceful
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Error al registrar Ctrl+C");
        info!("⚠️ Señal de shutdown recibida, cerrando...");
        std::process::exit(0);
    });

    // Iniciar bot
    info!("🚀 Bot iniciado exitosamente");
    if let Err(why) = client.start().await {
        error!("Error al ejecutar cliente: {:?}", why);
    }

    Ok(())
}

/// Verifica las dependencias externas (ffmpeg y yt-dlp).
async fn health_check(config: &Config) -> Result<()> {
    Transcoder::new(&config.ffmpeg_path).verify_available().await?;

    let yt_dlp = async_process::Command::new(&config.ytdlp_path)
        .arg("--version")
        .output()
        .await?;

    if yt_dlp.status.success() {
        println!("OK");
        Ok(())
    } else {
        anyhow::bail!("yt-dlp no puede ejecutarse correctamente");
    }
}
