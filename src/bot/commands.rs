use anyhow::Result;
use serenity::{
    builder::{CreateCommand, CreateCommandOption},
    model::{application::CommandOptionType, id::GuildId},
    prelude::Context,
};

/// Registra comandos globales
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    for command in all_commands() {
        ctx.http.create_global_command(&command).await?;
    }

    Ok(())
}

/// Registra comandos para una guild específica (propagación inmediata)
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    guild_id.set_commands(&ctx.http, all_commands()).await?;

    Ok(())
}

fn all_commands() -> Vec<CreateCommand> {
    vec![play_command(), play_file_command(), stop_command()]
}

fn play_command() -> CreateCommand {
    CreateCommand::new("play")
        .description("Reproduce audio desde un enlace (YouTube, SoundCloud, etc.)")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "url", "Enlace al contenido")
                .required(true),
        )
}

fn play_file_command() -> CreateCommand {
    CreateCommand::new("play-file")
        .description("Reproduce un archivo de audio subido")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Attachment,
                "file",
                "Archivo de audio (MP3, OGG, WEBM, WAV, FLAC, M4A)",
            )
            .required(true),
        )
}

fn stop_command() -> CreateCommand {
    CreateCommand::new("stop")
        .description("Detiene la reproducción y saca al bot del canal de voz")
}
