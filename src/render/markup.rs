use crate::parser::{FieldType, Level};
use colored::{ColoredString, Colorize};

/// Color role shared by markers, badges and message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Terminal default color
    Default,
    /// Dark grey
    Dim,
    Warn,
    Error,
    Fatal,
    /// Records with a highlighted term
    Match,
    /// Lines that are not JSON objects
    Passthrough,
}

impl Tone {
    /// Tone of the left edge marker for a level
    pub fn marker(level: Level) -> Self {
        match level {
            Level::None | Level::Debug | Level::Info => Tone::Dim,
            Level::Warn => Tone::Warn,
            Level::Error => Tone::Error,
            Level::Fatal => Tone::Fatal,
            Level::Other => Tone::Default,
        }
    }

    /// Tone of the message text and badge for a level
    pub fn text(level: Level) -> Self {
        match level {
            Level::Debug => Tone::Dim,
            Level::Warn => Tone::Warn,
            Level::Error => Tone::Error,
            Level::Fatal => Tone::Fatal,
            Level::None | Level::Info | Level::Other => Tone::Default,
        }
    }

    // xterm-256 palette entries
    fn rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            Tone::Warn => Some((255, 215, 0)),
            Tone::Error => Some((255, 135, 0)),
            Tone::Fatal => Some((255, 0, 0)),
            Tone::Match => Some((135, 215, 0)),
            Tone::Passthrough => Some((215, 95, 175)),
            Tone::Default | Tone::Dim => None,
        }
    }

    fn apply(&self, text: ColoredString) -> ColoredString {
        match (self, self.rgb()) {
            (Tone::Dim, _) => text.bright_black().dimmed(),
            (_, Some((r, g, b))) => text.truecolor(r, g, b),
            _ => text,
        }
    }
}

/// Semantic role of a piece of rendered text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    /// Left edge marker glyph
    Marker(Tone),
    /// Brackets, separators and other punctuation
    Punct,
    Timestamp,
    /// Level label
    Badge(Tone),
    Caller,
    Message(Tone),
    /// Message text matching a highlight term
    Highlight,
    FieldName,
    FieldValue(FieldType),
    /// Raw text of a non-JSON line
    Passthrough,
}

impl Style {
    fn paint(&self, text: &str) -> ColoredString {
        let text = text.normal();
        match self {
            Style::Plain => text,
            Style::Marker(tone) | Style::Message(tone) => tone.apply(text),
            Style::Punct | Style::Passthrough => text.bright_black().dimmed(),
            Style::Timestamp => text.bright_black(),
            Style::Badge(tone) => tone.apply(text).bold().reversed(),
            Style::Caller => text.bright_black().dimmed().italic(),
            Style::Highlight => Tone::Match.apply(text).underline(),
            Style::FieldName => text.truecolor(118, 118, 118),
            Style::FieldValue(field_type) => match field_type {
                FieldType::String => text.truecolor(95, 135, 95),
                FieldType::Number => text.truecolor(135, 175, 175).bold(),
                FieldType::Bool => text.truecolor(95, 175, 215),
                FieldType::Nil => text.bright_black().bold(),
                FieldType::Unknown => text,
            },
        }
    }
}

/// A run of text with a single style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// One output line made of styled spans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    pub fn push(&mut self, text: impl Into<String>, style: Style) -> &mut Self {
        let text = text.into();
        if !text.is_empty() {
            self.spans.push(Span { text, style });
        }
        self
    }

    pub fn append(&mut self, other: Line) -> &mut Self {
        self.spans.extend(other.spans);
        self
    }

    /// Text without any styling
    pub fn plain(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Visible width in characters
    pub fn width(&self) -> usize {
        self.spans.iter().map(|span| span.text.chars().count()).sum()
    }

    /// Renders the line as terminal text, with ANSI styling when `colorize` is set
    pub fn paint(&self, colorize: bool) -> String {
        if !colorize {
            return self.plain();
        }

        self.spans
            .iter()
            .map(|span| span.style.paint(&span.text).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_skips_empty_text() {
        let mut line = Line::new();
        line.push("", Style::Plain).push("a", Style::Punct);
        assert_eq!(line.spans.len(), 1);
    }

    #[test]
    fn test_plain_paint_has_no_escape_codes() {
        let mut line = Line::new();
        line.push("▎", Style::Marker(Tone::Warn))
            .push(" WARN ", Style::Badge(Tone::Warn))
            .push("text", Style::Message(Tone::Warn));

        let painted = line.paint(false);
        assert_eq!(painted, "▎ WARN text");
        assert!(!painted.contains('\x1b'));
        assert_eq!(line.width(), 11);
    }

    #[test]
    fn test_colorized_paint_keeps_text() {
        colored::control::set_override(true);
        let mut line = Line::new();
        line.push("hello", Style::Highlight);
        let painted = line.paint(true);
        assert!(painted.contains("hello"));
        assert!(painted.contains('\x1b'));
    }

    #[test]
    fn test_level_tones() {
        assert_eq!(Tone::marker(Level::Info), Tone::Dim);
        assert_eq!(Tone::marker(Level::Other), Tone::Default);
        assert_eq!(Tone::text(Level::Debug), Tone::Dim);
        assert_eq!(Tone::text(Level::Info), Tone::Default);
        assert_eq!(Tone::text(Level::Fatal), Tone::Fatal);
    }
}
