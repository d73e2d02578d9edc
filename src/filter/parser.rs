use std::fmt;

/// Key used for bare search terms without a `key:` part
pub const MESSAGE_KEY: &str = "msg";

/// Comparison applied by a filter to a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Exact string equality (no marker)
    Positive,
    /// String inequality (`!`)
    Negative,
    /// Substring search (`~`)
    Contains,
    /// Numeric comparison (`<`)
    Less,
    /// Numeric comparison (`>`)
    Greater,
}

impl Condition {
    /// Map a condition marker character to its condition
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '!' => Some(Condition::Negative),
            '~' => Some(Condition::Contains),
            '<' => Some(Condition::Less),
            '>' => Some(Condition::Greater),
            _ => None,
        }
    }

    /// Marker character written before the value, if any
    pub fn marker(&self) -> Option<char> {
        match self {
            Condition::Positive => None,
            Condition::Negative => Some('!'),
            Condition::Contains => Some('~'),
            Condition::Less => Some('<'),
            Condition::Greater => Some('>'),
        }
    }

    /// Whether the condition compares numbers instead of text
    pub fn is_numeric(&self) -> bool {
        matches!(self, Condition::Less | Condition::Greater)
    }
}

/// Value a filter compares against, selected by the condition at parse time
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(text) => write!(f, "{text}"),
            FilterValue::Number(number) => write!(f, "{number}"),
        }
    }
}

/// A single parsed filter (e.g. "level:warn" or "proc-time:>15")
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Record key the filter applies to
    pub key: String,
    /// Comparison to apply
    pub condition: Condition,
    /// Value to compare with
    pub value: FilterValue,
}

impl Filter {
    /// Parse a single filter token
    ///
    /// Tokens without a `:` (or with an empty key or value around it) become a
    /// substring search in the message. Numeric conditions with a value that
    /// is not a number fall back to `0.0`.
    pub fn parse(token: &str) -> Self {
        let Some((key, rest)) = token.split_once(':') else {
            return Self::message_search(token);
        };

        if key.is_empty() || rest.is_empty() {
            return Self::message_search(token);
        }

        let mut chars = rest.chars();
        let (condition, raw_value) = match chars.next().and_then(Condition::from_marker) {
            Some(condition) => (condition, chars.as_str()),
            None => (Condition::Positive, rest),
        };

        let value = if condition.is_numeric() {
            FilterValue::Number(parse_threshold(token, raw_value))
        } else {
            FilterValue::Text(raw_value.to_string())
        };

        Filter {
            key: key.to_string(),
            condition,
            value,
        }
    }

    fn message_search(token: &str) -> Self {
        Filter {
            key: MESSAGE_KEY.to_string(),
            condition: Condition::Contains,
            value: FilterValue::Text(token.to_string()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.key)?;
        if let Some(marker) = self.condition.marker() {
            write!(f, "{marker}")?;
        }
        write!(f, "{}", self.value)
    }
}

fn parse_threshold(token: &str, raw: &str) -> f64 {
    match raw.parse::<f64>() {
        Ok(number) => number,
        Err(_) => {
            tracing::warn!(filter = token, value = raw, "filter value is not a number, using 0");
            0.0
        }
    }
}

/// An ordered list of filters combined with AND logic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterList {
    pub filters: Vec<Filter>,
}

impl FilterList {
    /// Create a new empty filter list (matches everything)
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Parse every token into a filter, preserving order
    pub fn parse<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FilterList {
            filters: tokens
                .into_iter()
                .map(|token| Filter::parse(token.as_ref()))
                .collect(),
        }
    }

    /// Check if this list is empty (no filters)
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }
}
