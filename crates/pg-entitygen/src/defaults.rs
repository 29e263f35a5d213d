//! Classification of raw column default expressions.
//!
//! PostgreSQL reports defaults as SQL text (`'draft'::character varying`,
//! `0`, `now()`, ...). The classifier sniffs that text once and sorts it into
//! a literal the entity can carry as-is, or an expression the database must
//! evaluate.

use crate::core::schema::SEQUENCE_DEFAULT_MARKER;

/// Marker of an explicit type cast inside a default expression.
const TYPE_CAST_MARKER: &str = "::";

/// A classified column default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue<'a> {
    /// Fully quoted string literal, quotes included (`'draft'`).
    String(&'a str),
    /// Numeric literal.
    Number(&'a str),
    /// `true` or `false`.
    Boolean(&'a str),
    /// Expression carrying a type cast (`'{}'::jsonb`).
    TypedCast(&'a str),
    /// Anything else, typically a function call (`now()`).
    Expression(&'a str),
}

impl<'a> DefaultValue<'a> {
    /// Classify a raw default expression.
    pub fn classify(raw: &'a str) -> Self {
        if is_quoted_string(raw) {
            DefaultValue::String(raw)
        } else if is_number(raw) {
            DefaultValue::Number(raw)
        } else if raw == "true" || raw == "false" {
            DefaultValue::Boolean(raw)
        } else if raw.contains(TYPE_CAST_MARKER) {
            DefaultValue::TypedCast(raw)
        } else {
            DefaultValue::Expression(raw)
        }
    }

    /// Check if the value can be written into the entity verbatim.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            DefaultValue::String(_) | DefaultValue::Number(_) | DefaultValue::Boolean(_)
        )
    }

    /// The raw text this value was classified from.
    pub fn raw(&self) -> &'a str {
        match self {
            DefaultValue::String(s)
            | DefaultValue::Number(s)
            | DefaultValue::Boolean(s)
            | DefaultValue::TypedCast(s)
            | DefaultValue::Expression(s) => s,
        }
    }
}

/// Classify a column default for a plain (non generated) column.
///
/// Sequence defaults belong to the primary key strategy and are dropped.
pub fn plain_default(raw: Option<&str>) -> Option<DefaultValue<'_>> {
    let raw = raw?;
    if raw.contains(SEQUENCE_DEFAULT_MARKER) {
        return None;
    }
    Some(DefaultValue::classify(raw))
}

fn is_quoted_string(raw: &str) -> bool {
    raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'')
}

fn is_number(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    // f64 parsing also accepts "inf" and "nan", which are not numeric literals here
    trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}
