use anyhow::Result;
use serenity::{
    builder::{
        CreateInteractionResponse, CreateInteractionResponseMessage, EditInteractionResponse,
    },
    model::{
        application::CommandInteraction,
        id::{ChannelId, GuildId, UserId},
    },
    prelude::Context,
};
use tracing::{error, info};

use crate::{
    bot::VoiceCastBot,
    error::PlaybackError,
    sources::ResolvedTrack,
    ui::embeds,
};

pub const STOPPED_MESSAGE: &str = "⏹️ Reproducción detenida, salgo del canal de voz.";
pub const NOT_PLAYING_MESSAGE: &str = "🔇 No estoy reproduciendo nada ahora mismo.";

/// Maneja comandos slash.
///
/// Los errores de reproducción se convierten acá en respuestas visibles para
/// el usuario; solo los fallos al responder a Discord suben al log del caller.
pub async fn handle_command(
    ctx: &Context,
    command: CommandInteraction,
    bot: &VoiceCastBot,
) -> Result<()> {
    let guild_id = command
        .guild_id
        .ok_or_else(|| anyhow::anyhow!("Comando usado fuera de un servidor"))?;

    info!(
        "📝 Comando /{} usado por {} en guild {}",
        command.data.name, command.user.name, guild_id
    );

    match command.data.name.as_str() {
        "play" => handle_play(ctx, command, bot, guild_id).await?,
        "play-file" => handle_play_file(ctx, command, bot, guild_id).await?,
        "stop" => handle_stop(ctx, command, bot, guild_id).await?,
        _ => {
            command
                .create_response(
                    &ctx.http,
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new()
                            .content("❌ Comando no reconocido")
                            .ephemeral(true),
                    ),
                )
                .await?;
        }
    }

    Ok(())
}

// Handlers específicos para cada comando

async fn handle_play(
    ctx: &Context,
    command: CommandInteraction,
    bot: &VoiceCastBot,
    guild_id: GuildId,
) -> Result<()> {
    let url = command
        .data
        .options
        .iter()
        .find(|opt| opt.name == "url")
        .and_then(|opt| opt.value.as_str())
        .ok_or_else(|| anyhow::anyhow!("Opción url no proporcionada"))?
        .to_string();

    // Precondición: el solicitante debe estar en un canal de voz
    let Some(voice_channel) = user_voice_channel(ctx, guild_id, command.user.id) else {
        return reject(ctx, &command, &PlaybackError::NoVoiceChannel).await;
    };

    // Defer: resolver y conectar puede exceder la ventana de respuesta
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new()),
        )
        .await?;

    match play_link(ctx, bot, guild_id, voice_channel, &url).await {
        Ok((title, source_name)) => {
            command
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new()
                        .embed(embeds::create_playing_embed(&title, source_name)),
                )
                .await?;
        }
        Err(err) => {
            error!("❌ Error al reproducir {} en guild {}: {}", url, guild_id, err);
            command
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new()
                        .embed(embeds::create_error_embed(&err.user_message())),
                )
                .await?;
        }
    }

    Ok(())
}

async fn handle_play_file(
    ctx: &Context,
    command: CommandInteraction,
    bot: &VoiceCastBot,
    guild_id: GuildId,
) -> Result<()> {
    let attachment = command
        .data
        .options
        .iter()
        .find(|opt| opt.name == "file")
        .and_then(|opt| opt.value.as_attachment_id())
        .and_then(|id| command.data.resolved.attachments.get(&id))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Adjunto no proporcionado"))?;

    let Some(voice_channel) = user_voice_channel(ctx, guild_id, command.user.id) else {
        return reject(ctx, &command, &PlaybackError::NoVoiceChannel).await;
    };

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new()),
        )
        .await?;

    let outcome = match bot
        .resolver
        .resolve_attachment(&attachment.filename, &attachment.url)
        .await
    {
        Ok(resolved) => play_resolved(ctx, bot, guild_id, voice_channel, resolved).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok((title, source_name)) => {
            command
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new()
                        .embed(embeds::create_playing_embed(&title, source_name)),
                )
                .await?;
        }
        Err(err) => {
            error!(
                "❌ Error al reproducir el adjunto {} en guild {}: {}",
                attachment.filename, guild_id, err
            );
            command
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new()
                        .embed(embeds::create_error_embed(&err.user_message())),
                )
                .await?;
        }
    }

    Ok(())
}

async fn handle_stop(
    ctx: &Context,
    command: CommandInteraction,
    bot: &VoiceCastBot,
    guild_id: GuildId,
) -> Result<()> {
    let manager = songbird::get(ctx)
        .await
        .ok_or_else(|| anyhow::anyhow!("Songbird no inicializado"))?;

    let removed = bot.registry.remove(manager, guild_id).await;

    let response = if removed {
        CreateInteractionResponseMessage::new().content(STOPPED_MESSAGE)
    } else {
        CreateInteractionResponseMessage::new()
            .content(NOT_PLAYING_MESSAGE)
            .ephemeral(true)
    };

    command
        .create_response(&ctx.http, CreateInteractionResponse::Message(response))
        .await?;

    Ok(())
}

// Funciones auxiliares

/// Resuelve el enlace y lo reproduce en la sesión del guild.
async fn play_link(
    ctx: &Context,
    bot: &VoiceCastBot,
    guild_id: GuildId,
    voice_channel: ChannelId,
    url: &str,
) -> Result<(String, &'static str), PlaybackError> {
    let resolved = bot.resolver.resolve(url).await?;
    play_resolved(ctx, bot, guild_id, voice_channel, resolved).await
}

/// Obtiene (o crea) la sesión del guild y entrega el stream al player.
async fn play_resolved(
    ctx: &Context,
    bot: &VoiceCastBot,
    guild_id: GuildId,
    voice_channel: ChannelId,
    resolved: ResolvedTrack,
) -> Result<(String, &'static str), PlaybackError> {
    let manager = songbird::get(ctx)
        .await
        .ok_or_else(|| PlaybackError::TransportError("Songbird no inicializado".to_string()))?;

    let session = bot
        .registry
        .get_or_create(manager, guild_id, voice_channel)
        .await?;

    let ResolvedTrack {
        input,
        title,
        source_name,
    } = resolved;

    session.play(input).await?;

    Ok((title, source_name))
}

/// Respuesta efímera de precondición fallida.
async fn reject(
    ctx: &Context,
    command: &CommandInteraction,
    err: &PlaybackError,
) -> Result<()> {
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(err.user_message())
                    .ephemeral(true),
            ),
        )
        .await?;

    Ok(())
}

/// Canal de voz actual del usuario, según el caché de la guild.
fn user_voice_channel(ctx: &Context, guild_id: GuildId, user_id: UserId) -> Option<ChannelId> {
    let guild = guild_id.to_guild_cached(&ctx.cache)?;

    guild
        .voice_states
        .get(&user_id)
        .and_then(|voice_state| voice_state.channel_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_messages() {
        assert!(NOT_PLAYING_MESSAGE.contains("No estoy reproduciendo"));
        assert!(STOPPED_MESSAGE.contains("detenida"));
    }
}
