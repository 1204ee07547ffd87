use crossterm::style::{
    style,
    Color,
    Stylize,
};

/// Colours used for the prompt and the per entry notices. `None` prints plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub warning: Option<Color>,
    pub notice: Option<Color>,
    pub skipped: Option<Color>,
}

impl Palette {
    pub fn plain() -> Self {
        Self {
            warning: None,
            notice: None,
            skipped: None,
        }
    }

    pub fn warning(&self, text: &str) -> String {
        paint(text, self.warning)
    }

    pub fn notice(&self, text: &str) -> String {
        paint(text, self.notice)
    }

    pub fn skipped(&self, text: &str) -> String {
        paint(text, self.skipped)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            warning: Some(Color::Yellow),
            notice: Some(Color::Blue),
            skipped: Some(Color::Cyan),
        }
    }
}

fn paint(text: &str, color: Option<Color>) -> String {
    match color {
        Some(color) => style(text).with(color).to_string(),
        None => text.to_string(),
    }
}
