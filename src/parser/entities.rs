use serde_json::{Map, Value};

/// Display type of a record field, derived from its JSON kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Arrays and objects
    Unknown,
    String,
    Number,
    Bool,
    Nil,
}

/// A record key/value pair shown in the field block under the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Pre-formatted display text (quoted for strings, `nil` for null)
    pub value: String,
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>, field_type: FieldType) -> Self {
        Field {
            name: name.into(),
            value: value.into(),
            field_type,
        }
    }

    /// Width the field takes in a packed field line
    pub fn visual_size(&self) -> usize {
        let punctuation = match self.field_type {
            FieldType::String => 3,
            _ => 1,
        };

        self.name.chars().count() + self.value.chars().count() + punctuation
    }
}

/// Well-known record severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// No `level` key
    None,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    /// Any other level string, shown without color or badge
    Other,
}

impl Level {
    pub fn parse(level: &str) -> Self {
        match level {
            "" => Level::None,
            "debug" => Level::Debug,
            "info" => Level::Info,
            "warn" => Level::Warn,
            "error" => Level::Error,
            "fatal" => Level::Fatal,
            _ => Level::Other,
        }
    }

    /// Badge label shown before the message
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Level::Warn => Some("WARN"),
            Level::Error => Some("ERR"),
            Level::Fatal => Some("CRIT"),
            _ => None,
        }
    }
}

/// One decoded input line
#[derive(Debug, Clone, Default)]
pub struct DecodedRecord {
    /// Text of the `msg` or `log` key
    pub message: String,
    /// Raw `level` value
    pub level: String,
    pub caller: String,
    /// Seconds since the epoch from the `ts` key, 0 when absent
    pub timestamp: f64,
    /// Every other key in source order
    pub fields: Vec<Field>,
    /// The decoded object, `None` when the line is not a JSON object
    pub object: Option<Map<String, Value>>,
    /// The line as read
    pub raw_line: String,
}

impl DecodedRecord {
    pub fn is_valid_object(&self) -> bool {
        self.object.is_some()
    }

    pub fn has_message(&self) -> bool {
        !self.message.is_empty()
    }

    pub fn level_kind(&self) -> Level {
        Level::parse(&self.level)
    }
}
