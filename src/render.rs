//! Terminal rendering of decoded records
//!
//! A rendered record is a header line followed by an optional block of packed
//! field lines:
//!
//! ```text
//! ▎[ 23/11/14 22:13:20.123 ]  WARN  (app/db.go:12) slow query
//! ▎                                         rows:3 • table:"users"
//! ```
//!
//! Field lines are indented so they line up under the message text.

use crate::filter::{FilterList, Highlights};
use crate::parser::{DecodedRecord, Field, Level, decode_line};
use chrono::{DateTime, Local, Utc};
use std::time::Duration;

pub mod markup;

pub use markup::{Line, Span, Style, Tone};

/// Left edge marker glyph
pub const MARKER: &str = "▎";
/// Maximum width of the field part of a field line
pub const FIELD_LINE_WIDTH: usize = 88;
/// Separator between fields on the same line
pub const FIELD_SEPARATOR: &str = " • ";
/// Width of the header before the message when there is no caller
pub const MESSAGE_INDENT: usize = 26;
/// Width of the idle separator rule
pub const SEPARATOR_WIDTH: usize = 88;

const FIELD_SEPARATOR_WIDTH: usize = 3;

/// Everything the renderer needs besides the record itself
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub filters: FilterList,
    pub highlights: Highlights,
    /// Drop lines that are not JSON objects instead of printing them
    pub strict: bool,
}

impl RenderConfig {
    pub fn new(filters: FilterList, highlights: Highlights, strict: bool) -> Self {
        Self {
            filters,
            highlights,
            strict,
        }
    }
}

/// Decodes and renders a raw input line
pub fn render_line(raw_line: &str, config: &RenderConfig) -> Option<Vec<Line>> {
    render(&decode_line(raw_line), config)
}

/// Renders a decoded record
///
/// Returns `None` when the record is not shown: a non-JSON line in strict
/// mode, an object without a message, or an object rejected by the filters.
pub fn render(record: &DecodedRecord, config: &RenderConfig) -> Option<Vec<Line>> {
    let Some(object) = &record.object else {
        if config.strict {
            return None;
        }
        return Some(vec![render_passthrough(&record.raw_line)]);
    };

    if !record.has_message() || !config.filters.is_match(object) {
        return None;
    }

    let level = record.level_kind();
    let text_tone = Tone::text(level);
    let (fragments, found) = config.highlights.apply(&record.message);
    let marker_tone = if found {
        Tone::Match
    } else {
        Tone::marker(level)
    };

    let mut header = Line::new();
    header.push(MARKER, Style::Marker(marker_tone));
    header.append(render_timestamp(record.timestamp));

    if let Some(label) = level.label() {
        header
            .push(format!(" {label} "), Style::Badge(text_tone))
            .push(" ", Style::Plain);
    }

    if !record.caller.is_empty() {
        header
            .push("(", Style::Punct)
            .push(record.caller.as_str(), Style::Caller)
            .push(")", Style::Punct)
            .push(" ", Style::Plain);
    }

    for fragment in fragments {
        let style = if fragment.highlighted {
            Style::Highlight
        } else {
            Style::Message(text_tone)
        };
        header.push(fragment.text, style);
    }

    let mut lines = vec![header];
    lines.extend(render_fields(level, message_indent(&record.caller), &record.fields));

    Some(lines)
}

/// Renders a line that is not a JSON object as-is
pub fn render_passthrough(raw_line: &str) -> Line {
    let mut line = Line::new();
    line.push(MARKER, Style::Marker(Tone::Passthrough))
        .push(raw_line, Style::Passthrough);
    line
}

/// Formats epoch seconds as `YY/MM/DD HH:MM:SS.mmm` in local time
pub fn format_timestamp(ts: f64) -> (String, String) {
    let micros = (ts * 1_000_000.0) as i64;
    let date = DateTime::<Utc>::from_timestamp_micros(micros)
        .unwrap_or_default()
        .with_timezone(&Local);

    (
        date.format("%y/%m/%d %H:%M:%S").to_string(),
        date.format("%3f").to_string(),
    )
}

fn render_timestamp(ts: f64) -> Line {
    let (date, millis) = format_timestamp(ts);
    let mut line = Line::new();
    line.push("[ ", Style::Punct)
        .push(date, Style::Timestamp)
        .push(format!(".{millis} ]"), Style::Punct)
        .push(" ", Style::Plain);
    line
}

/// Indentation that aligns field lines with the message text
pub fn message_indent(caller: &str) -> usize {
    if caller.is_empty() {
        MESSAGE_INDENT
    } else {
        MESSAGE_INDENT + caller.chars().count() + 3
    }
}

/// Splits fields into consecutive groups that fit on one field line
///
/// Greedy and single pass: a field moves to a new line when adding it with a
/// separator would exceed [`FIELD_LINE_WIDTH`]. A field wider than the limit
/// gets a line of its own.
pub fn pack_fields(fields: &[Field]) -> Vec<&[Field]> {
    let mut groups = Vec::new();
    let mut start = 0;
    let mut width = 0;

    for (idx, field) in fields.iter().enumerate() {
        let size = field.visual_size();

        if width > 0 && width + FIELD_SEPARATOR_WIDTH + size > FIELD_LINE_WIDTH {
            groups.push(&fields[start..idx]);
            start = idx;
            width = 0;
        }

        if width > 0 {
            width += FIELD_SEPARATOR_WIDTH;
        }
        width += size;
    }

    if start < fields.len() {
        groups.push(&fields[start..]);
    }

    groups
}

/// Renders the field block under a record header
pub fn render_fields(level: Level, indent: usize, fields: &[Field]) -> Vec<Line> {
    pack_fields(fields)
        .into_iter()
        .map(|group| {
            let mut line = Line::new();
            line.push(MARKER, Style::Marker(Tone::marker(level)))
                .push(" ".repeat(indent), Style::Plain);

            for (idx, field) in group.iter().enumerate() {
                if idx > 0 {
                    line.push(" ", Style::Plain)
                        .push("•", Style::Punct)
                        .push(" ", Style::Plain);
                }
                line.push(field.name.as_str(), Style::FieldName)
                    .push(":", Style::Punct)
                    .push(field.value.as_str(), Style::FieldValue(field.field_type));
            }

            line
        })
        .collect()
}

/// Formats a duration as `M:SS` or `H:MM:SS`
pub fn short_duration(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Rule marking a period without rendered records
pub fn idle_separator(elapsed: Duration) -> Line {
    let title = format!(" {} ", short_duration(elapsed));
    let fill = SEPARATOR_WIDTH.saturating_sub(title.chars().count());
    let left = fill / 2;

    let mut line = Line::new();
    line.push("─".repeat(left), Style::Punct)
        .push(title, Style::Timestamp)
        .push("─".repeat(fill - left), Style::Punct);
    line
}
