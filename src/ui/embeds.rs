use serenity::{
    all::Timestamp,
    builder::{CreateEmbed, CreateEmbedFooter},
};

/// Paleta de colores estandarizada para el bot
pub mod colors {
    use serenity::all::Colour;

    pub const SUCCESS_GREEN: Colour = Colour::from_rgb(67, 181, 129);
    pub const ERROR_RED: Colour = Colour::from_rgb(220, 53, 69);
}

/// Footer estandarizado para todos los embeds
const STANDARD_FOOTER: &str = "📻 VoiceCast";

/// Línea principal del mensaje de reproducción.
pub fn playing_line(title: &str) -> String {
    format!("▶️ Reproduciendo: **{title}**")
}

/// Embed de confirmación de reproducción.
pub fn create_playing_embed(title: &str, source_name: &str) -> CreateEmbed {
    CreateEmbed::default()
        .title("🎵 Reproduciendo")
        .description(playing_line(title))
        .field("🔗 Fuente", source_name.to_string(), true)
        .color(colors::SUCCESS_GREEN)
        .timestamp(Timestamp::now())
        .footer(CreateEmbedFooter::new(STANDARD_FOOTER))
}

/// Embed de error visible para el usuario.
pub fn create_error_embed(message: &str) -> CreateEmbed {
    CreateEmbed::default()
        .title("⚠️ No se pudo reproducir")
        .description(message.to_string())
        .color(colors::ERROR_RED)
        .footer(CreateEmbedFooter::new(STANDARD_FOOTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playing_line_contains_title() {
        let line = playing_line("Song A");
        assert!(line.contains("Song A"));
        assert!(line.contains("Reproduciendo"));
    }
}
