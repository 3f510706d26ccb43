use ratatui::style::Color;
use tictactoe_core::{
    config::{ThemeConfig, ThemeName},
    Mark,
};
use tracing::warn;

/// Resolved colours for one frame of the board.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub background: Color,
    pub cell_bg: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub x_color: Color,
    pub o_color: Color,
    pub win_bg: Color,
    pub win_fg: Color,
    pub tie_bg: Color,
    pub tie_fg: Color,
    pub hover_bg: Option<Color>,
    pub hover_preview: bool,
}

impl Theme {
    /// Flat palette: grey board, red X, blue O.
    pub fn classic() -> Self {
        Self {
            name: ThemeName::Classic,
            background: Color::Rgb(50, 50, 50),
            cell_bg: Color::Rgb(80, 80, 80),
            text: Color::White,
            muted: Color::Gray,
            accent: Color::Rgb(0, 0, 255),
            x_color: Color::Rgb(255, 0, 0),
            o_color: Color::Rgb(0, 0, 255),
            win_bg: Color::Rgb(0, 255, 0),
            win_fg: Color::White,
            tie_bg: Color::Rgb(255, 255, 0),
            tie_fg: Color::Black,
            hover_bg: None,
            hover_preview: false,
        }
    }

    /// Softer palette with hover feedback.
    pub fn enhanced() -> Self {
        Self {
            name: ThemeName::Enhanced,
            background: Color::Rgb(34, 40, 49),
            cell_bg: Color::Rgb(57, 62, 70),
            text: Color::Rgb(238, 238, 238),
            muted: Color::Rgb(130, 136, 145),
            accent: Color::Rgb(0, 173, 181),
            x_color: Color::Rgb(231, 76, 60),
            o_color: Color::Rgb(52, 152, 219),
            win_bg: Color::Rgb(46, 204, 113),
            win_fg: Color::White,
            tie_bg: Color::Rgb(241, 196, 15),
            tie_fg: Color::Black,
            hover_bg: Some(Color::Rgb(90, 97, 108)),
            hover_preview: true,
        }
    }

    /// Build the configured theme. The returned notes describe ignored overrides.
    pub fn from_config(config: &ThemeConfig) -> (Self, Vec<String>) {
        let mut theme = match config.name {
            ThemeName::Classic => Self::classic(),
            ThemeName::Enhanced => Self::enhanced(),
        };
        theme.hover_preview = theme.hover_bg.is_some() && config.hover_preview;

        let mut notes = Vec::new();
        let overrides = [
            ("x_color", config.x_color.as_deref(), &mut theme.x_color),
            ("o_color", config.o_color.as_deref(), &mut theme.o_color),
            ("win_color", config.win_color.as_deref(), &mut theme.win_bg),
            ("tie_color", config.tie_color.as_deref(), &mut theme.tie_bg),
        ];
        for (key, raw, slot) in overrides {
            let Some(raw) = raw else { continue };
            match parse_hex_color(raw) {
                Some(color) => *slot = color,
                None => {
                    warn!(key, raw, "ignoring colour override that is not a hex colour");
                    notes.push(format!("Ignoring theme.{key} = {raw:?}; expected #rrggbb"));
                }
            }
        }

        theme.win_fg = contrast_color(&theme.win_bg, theme.win_fg);
        theme.tie_fg = contrast_color(&theme.tie_bg, theme.tie_fg);
        (theme, notes)
    }

    pub fn mark_color(&self, mark: Mark) -> Color {
        match mark {
            Mark::X => self.x_color,
            Mark::O => self.o_color,
        }
    }
}

pub fn parse_hex_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Black or white, whichever reads better on `color`.
pub fn contrast_color(color: &Color, fallback: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let luminance = 0.299 * f64::from(*r) + 0.587 * f64::from(*g) + 0.114 * f64::from(*b);
            if luminance > 186.0 {
                Color::Black
            } else {
                Color::White
            }
        }
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use super::*;

    #[derive(Clone, Default)]
    struct SharedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn theme_config(name: ThemeName) -> ThemeConfig {
        ThemeConfig {
            name,
            hover_preview: true,
            x_color: None,
            o_color: None,
            win_color: None,
            tie_color: None,
        }
    }

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("0x0a0B0c"), Some(Color::Rgb(10, 11, 12)));
        assert_eq!(parse_hex_color("#fa0"), Some(Color::Rgb(255, 170, 0)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
        assert_eq!(parse_hex_color("é12"), None);
    }

    #[test]
    fn classic_never_previews_on_hover() {
        let (theme, notes) = Theme::from_config(&theme_config(ThemeName::Classic));
        assert!(notes.is_empty());
        assert_eq!(theme.hover_bg, None);
        assert!(!theme.hover_preview);
        assert_eq!(theme.x_color, Color::Rgb(255, 0, 0));
        // Bright yellow needs dark text.
        assert_eq!(theme.tie_fg, Color::Black);
    }

    #[test]
    fn overrides_apply_and_bad_values_are_reported() {
        let mut config = theme_config(ThemeName::Enhanced);
        config.o_color = Some("#00ff00".to_string());
        config.win_color = Some("#102030".to_string());
        config.tie_color = Some("yellowish".to_string());

        let (theme, notes) = Theme::from_config(&config);
        assert_eq!(theme.o_color, Color::Rgb(0, 255, 0));
        assert_eq!(theme.win_bg, Color::Rgb(16, 32, 48));
        assert_eq!(theme.win_fg, Color::White);
        assert_eq!(theme.tie_bg, Theme::enhanced().tie_bg);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("tie_color"));
    }

    #[test]
    fn ignored_override_is_logged_as_warning() {
        let log = SharedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut config = theme_config(ThemeName::Classic);
        config.x_color = Some("not-a-colour".to_string());
        let (theme, notes) =
            tracing::subscriber::with_default(subscriber, || Theme::from_config(&config));

        assert_eq!(theme.x_color, Theme::classic().x_color);
        assert_eq!(notes.len(), 1);
        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("x_color"));
        assert!(output.contains("not-a-colour"));
    }
}
