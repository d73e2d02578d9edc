//! Record filter expressions and message highlighting
//!
//! Filters are given as separate command line tokens and combine with AND
//! logic. Each token is scanned once, left to right.
//!
//! # Syntax
//!
//! ```text
//! value          Search for occurrences in the msg field
//! field:value    Positive exact match
//! field:!value   Negative exact match
//! field:~value   Search for occurrences in the field
//! field:>value   Equal or greater (numeric)
//! field:<value   Equal or less (numeric)
//! ```
//!
//! # Examples
//!
//! ```text
//! level:warn                  # Warnings only
//! caller:~app/db.go           # Records logged from app/db.go
//! proc-time:>15               # Slow operations
//! update                      # Message mentions "update"
//! ```

pub mod highlight;
pub mod matcher;
pub mod parser;

pub use highlight::{Fragment, Highlights};
pub use matcher::{value_number, value_text};
pub use parser::{Condition, Filter, FilterList, FilterValue, MESSAGE_KEY};
