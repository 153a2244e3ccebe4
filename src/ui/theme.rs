use ratatui::style::{Color, Modifier, Style};

pub struct BrandColors;

impl BrandColors {
    pub const BLUE: Color = Color::Rgb(66, 133, 244);
    pub const RED: Color = Color::Rgb(219, 68, 55);
    pub const YELLOW: Color = Color::Rgb(244, 180, 0);
    pub const GREEN: Color = Color::Rgb(15, 157, 88);
    pub const PURPLE: Color = Color::Rgb(167, 139, 250);
    pub const GRAY: Color = Color::Rgb(117, 117, 117);
    pub const DARK_GRAY: Color = Color::Rgb(55, 65, 81);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const OFF_WHITE: Color = Color::Rgb(203, 213, 225);

    /// Order of the decorative bar under the header.
    pub const BAR: [Color; 4] = [Self::BLUE, Self::RED, Self::YELLOW, Self::GREEN];
}

pub struct BoxChars;

impl BoxChars {
    pub const ROUND_TOP_LEFT: &'static str = "╭";
    pub const ROUND_BOTTOM_LEFT: &'static str = "╰";
    pub const HORIZONTAL: &'static str = "─";
    pub const VERTICAL: &'static str = "│";
    pub const HEAVY_HORIZONTAL: &'static str = "━";
    pub const DOT: &'static str = "•";
    pub const BULLET: &'static str = "●";
    pub const SPARKLE: &'static str = "✦";
    pub const CURSOR: &'static str = "▊";
    pub const INFO: &'static str = "ⓘ";
}

pub struct Spinners;

impl Spinners {
    pub const BRAILLE: &'static [&'static str] =
        &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    /// Three bouncing dots, one highlighted per frame.
    pub const TYPING_DOTS: usize = 3;
}

pub struct Theme;

impl Theme {
    #[must_use]
    pub const fn primary() -> Style {
        Style::new().fg(BrandColors::BLUE)
    }

    #[must_use]
    pub const fn primary_bold() -> Style {
        Style::new()
            .fg(BrandColors::BLUE)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub const fn assistant() -> Style {
        Style::new().fg(BrandColors::RED)
    }

    #[must_use]
    pub const fn code() -> Style {
        Style::new().fg(BrandColors::PURPLE)
    }

    #[must_use]
    pub const fn success() -> Style {
        Style::new().fg(BrandColors::GREEN)
    }

    #[must_use]
    pub const fn warning() -> Style {
        Style::new().fg(BrandColors::YELLOW)
    }

    #[must_use]
    pub const fn error() -> Style {
        Style::new().fg(BrandColors::RED)
    }

    #[must_use]
    pub const fn muted() -> Style {
        Style::new().fg(BrandColors::GRAY)
    }

    #[must_use]
    pub const fn border() -> Style {
        Style::new().fg(BrandColors::DARK_GRAY)
    }

    #[must_use]
    pub const fn white() -> Style {
        Style::new().fg(BrandColors::WHITE)
    }

    #[must_use]
    pub const fn off_white() -> Style {
        Style::new().fg(BrandColors::OFF_WHITE)
    }

    /// Body of the user's bubble: white text on brand blue.
    #[must_use]
    pub const fn user_bubble() -> Style {
        Style::new().fg(BrandColors::WHITE).bg(BrandColors::BLUE)
    }

    #[must_use]
    pub const fn title() -> Style {
        Style::new()
            .fg(BrandColors::WHITE)
            .add_modifier(Modifier::BOLD)
    }
}
