use super::parser::{Condition, Filter, FilterList, FilterValue};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Text form of a JSON value used by string comparisons
///
/// Strings compare without quotes, `null` compares as an empty string and
/// arrays/objects compare as compact JSON.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(flag) => Cow::Borrowed(if *flag { "true" } else { "false" }),
        Value::Number(number) => Cow::Owned(number.to_string()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Numeric form of a JSON value used by `<` and `>` comparisons
///
/// Numeric strings are parsed, `true` counts as 1 and everything else as 0.
pub fn value_number(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

impl Filter {
    /// Check a single field value against this filter
    ///
    /// `>` rejects values below the threshold and `<` rejects values above it,
    /// so both keep values equal to the threshold.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn matches_value(&self, field: &Value) -> bool {
        match (&self.condition, &self.value) {
            (Condition::Positive, FilterValue::Text(expected)) => value_text(field) == *expected,
            (Condition::Negative, FilterValue::Text(expected)) => value_text(field) != *expected,
            (Condition::Contains, FilterValue::Text(needle)) => {
                value_text(field).contains(needle.as_str())
            }
            (Condition::Greater, FilterValue::Number(threshold)) => {
                !(*threshold > value_number(field))
            }
            (Condition::Less, FilterValue::Number(threshold)) => {
                !(*threshold < value_number(field))
            }
            // Filter::parse never builds these pairs
            (_, FilterValue::Number(threshold)) => value_number(field) == *threshold,
            (_, FilterValue::Text(expected)) => value_text(field) == *expected,
        }
    }
}

impl FilterList {
    /// Check if a record's fields satisfy every filter
    ///
    /// A filter whose key is absent from the record rejects the record.
    pub fn is_match(&self, fields: &Map<String, Value>) -> bool {
        self.filters.iter().all(|filter| {
            fields
                .get(&filter.key)
                .is_some_and(|field| filter.matches_value(field))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_empty_list_matches_everything() {
        let filters = FilterList::new();
        assert!(filters.is_match(&Map::new()));
        assert!(filters.is_match(&record(json!({"msg": "x", "level": "info"}))));
    }

    #[test]
    fn test_positive_and_negative() {
        let fields = record(json!({"level": "warn", "count": 3, "ok": true}));

        assert!(FilterList::parse(["level:warn"]).is_match(&fields));
        assert!(!FilterList::parse(["level:error"]).is_match(&fields));
        assert!(FilterList::parse(["level:!error"]).is_match(&fields));
        assert!(!FilterList::parse(["level:!warn"]).is_match(&fields));
        assert!(FilterList::parse(["count:3"]).is_match(&fields));
        assert!(FilterList::parse(["ok:true"]).is_match(&fields));
    }

    #[test]
    fn test_contains() {
        let fields = record(json!({"caller": "app/db.go:42", "msg": "update users"}));

        assert!(FilterList::parse(["caller:~app/db.go"]).is_match(&fields));
        assert!(!FilterList::parse(["caller:~cache.go"]).is_match(&fields));
        assert!(FilterList::parse(["update"]).is_match(&fields));
        assert!(!FilterList::parse(["insert"]).is_match(&fields));
    }

    #[test]
    fn test_missing_key_rejects() {
        let fields = record(json!({"msg": "hello"}));
        assert!(!FilterList::parse(["level:!warn"]).is_match(&fields));
        assert!(!FilterList::parse(["proc-time:>1"]).is_match(&fields));
    }

    // `>N` keeps fields >= N and `<N` keeps fields <= N.
    #[test]
    fn test_numeric_comparison_direction() {
        let greater = FilterList::parse(["proc-time:>15"]);
        assert!(greater.is_match(&record(json!({"proc-time": 20}))));
        assert!(greater.is_match(&record(json!({"proc-time": 15}))));
        assert!(!greater.is_match(&record(json!({"proc-time": 10}))));

        let less = FilterList::parse(["proc-time:<15"]);
        assert!(less.is_match(&record(json!({"proc-time": 10}))));
        assert!(less.is_match(&record(json!({"proc-time": 15}))));
        assert!(!less.is_match(&record(json!({"proc-time": 20}))));
    }

    #[test]
    fn test_numeric_coercion_of_fields() {
        let greater = FilterList::parse(["v:>1.5"]);
        assert!(greater.is_match(&record(json!({"v": "2.5"}))));
        assert!(!greater.is_match(&record(json!({"v": "abc"}))));
        assert!(!greater.is_match(&record(json!({"v": null}))));

        let zero = FilterList::parse(["v:>junk"]);
        assert!(zero.is_match(&record(json!({"v": 0}))));
        assert!(!zero.is_match(&record(json!({"v": -1}))));
    }

    #[test]
    fn test_conjunction_short_circuits() {
        let fields = record(json!({"level": "warn", "msg": "disk full"}));
        assert!(FilterList::parse(["level:warn", "disk"]).is_match(&fields));
        assert!(!FilterList::parse(["level:warn", "memory"]).is_match(&fields));
        assert!(!FilterList::parse(["missing:x", "disk"]).is_match(&fields));
    }

    #[test]
    fn test_value_text_forms() {
        assert_eq!(value_text(&json!("a")), "a");
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!(false)), "false");
        assert_eq!(value_text(&json!(12)), "12");
        assert_eq!(value_text(&json!([1, 2])), "[1,2]");
    }
}
