use msxtools_core::Theme;
use ratatui::style::{Color, Style, Stylize};

/// Colors for one appearance preference. `System` leaves the terminal's own colors alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
    pub highlight: Color,
    pub danger: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                fg: Color::White,
                bg: Color::Black,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                highlight: Color::Yellow,
                danger: Color::LightRed,
            },
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::Gray,
                highlight: Color::Magenta,
                danger: Color::Red,
            },
            Theme::System => Self {
                fg: Color::Reset,
                bg: Color::Reset,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                highlight: Color::Yellow,
                danger: Color::Red,
            },
        }
    }

    pub fn base(&self) -> Style { Style::default().fg(self.fg).bg(self.bg) }
    pub fn title(&self) -> Style { self.base().fg(self.accent).bold() }
    pub fn hint(&self) -> Style { self.base().fg(self.muted) }
    pub fn selected(&self) -> Style { self.base().fg(self.highlight).bold() }
    pub fn footer(&self) -> Style { self.base().fg(self.muted) }
    pub fn error(&self) -> Style { self.base().fg(self.danger).bold() }
}
