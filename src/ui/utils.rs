/// Terminal colours used by the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Yellow,
    Red,
    Cyan,
    Gray,
    Bold,
}

/// Apply `tone` to `text` when colour output is enabled
#[cfg(feature = "color")]
pub fn paint(tone: Tone, text: &str, enabled: bool) -> String {
    use ansi_term::{Colour, Style};

    if !enabled {
        return text.to_string();
    }
    let style = match tone {
        Tone::Green => Colour::Green.normal(),
        Tone::Yellow => Colour::Yellow.normal(),
        Tone::Red => Colour::Red.normal(),
        Tone::Cyan => Colour::Cyan.normal(),
        Tone::Gray => Colour::Fixed(8).normal(),
        Tone::Bold => Style::new().bold(),
    };
    style.paint(text).to_string()
}

#[cfg(not(feature = "color"))]
pub fn paint(_tone: Tone, text: &str, _enabled: bool) -> String {
    text.to_string()
}

/// Mask a credential for display: first 7 characters followed by `****`
///
/// - empty → `N/A`
/// - shorter than 7 characters → `****`
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return "N/A".to_string();
    }
    if token.chars().count() < 7 {
        return "****".to_string();
    }
    let prefix: String = token.chars().take(7).collect();
    format!("{}****", prefix)
}

/// Pad `text` to `width`, or cut it to `width` ending in `...`
pub fn fit_column(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        let keep = width.saturating_sub(3);
        let head: String = text.chars().take(keep).collect();
        format!("{}...", head)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

/// Pad `text` to at least `width`; longer text is kept whole
pub fn pad_column(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}
