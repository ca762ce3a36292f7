use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

use super::error::FilterError;
use super::schema::Kind;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A filter operand after coercion to the target attribute's type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Bool(bool),
    Enum(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Float(f32),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

impl TypedValue {
    /// Reads a stored JSON value as `kind`. `None` for nulls and mismatches.
    pub fn from_json(kind: Kind, value: &Value) -> Option<Self> {
        match kind {
            Kind::Bool => value.as_bool().map(TypedValue::Bool),
            Kind::Enum(_) => value.as_str().map(|s| TypedValue::Enum(s.to_string())),
            Kind::Integer => value
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .map(TypedValue::Integer),
            Kind::Long => value.as_i64().map(TypedValue::Long),
            Kind::Double => value.as_f64().map(TypedValue::Double),
            Kind::Float => value.as_f64().map(|f| TypedValue::Float(f as f32)),
            Kind::Date => value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
                .map(TypedValue::Date),
            Kind::DateTime => value
                .as_str()
                .and_then(|s| s.parse::<NaiveDateTime>().ok())
                .map(TypedValue::DateTime),
            Kind::String => value.as_str().map(|s| TypedValue::Text(s.to_string())),
            Kind::Relation { .. } => None,
        }
    }

    /// Ordering between two operands. Same-typed values compare natively; a
    /// text right-hand side compares against the left side's string form.
    pub fn compare(&self, other: &TypedValue) -> Option<Ordering> {
        use TypedValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.partial_cmp(b),
            (Enum(a), Enum(b)) => a.partial_cmp(b),
            (Integer(a), Integer(b)) => a.partial_cmp(b),
            (Long(a), Long(b)) => a.partial_cmp(b),
            (Double(a), Double(b)) => a.partial_cmp(b),
            (Float(a), Float(b)) => a.partial_cmp(b),
            (Date(a), Date(b)) => a.partial_cmp(b),
            (DateTime(a), DateTime(b)) => a.partial_cmp(b),
            (Text(a), Text(b)) => a.partial_cmp(b),
            (left, Text(b)) => left.to_string().as_str().partial_cmp(b.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Bool(b) => write!(f, "{}", b),
            TypedValue::Enum(s) | TypedValue::Text(s) => f.write_str(s),
            TypedValue::Integer(i) => write!(f, "{}", i),
            TypedValue::Long(i) => write!(f, "{}", i),
            TypedValue::Double(d) => write!(f, "{}", d),
            TypedValue::Float(d) => write!(f, "{}", d),
            TypedValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            TypedValue::DateTime(dt) => write!(f, "{}", dt.format(DATE_TIME_FORMAT)),
        }
    }
}

/// Converts `raw` to the declared type of `field`.
///
/// Dispatch is on the attribute's kind only, never on what the string looks
/// like. Relations cannot be coerced.
pub fn coerce(field: &str, kind: Kind, raw: &str) -> Result<TypedValue, FilterError> {
    let invalid = |expected: &'static str| FilterError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        expected,
    };

    match kind {
        Kind::Bool => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(TypedValue::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(TypedValue::Bool(false))
            } else {
                Err(invalid("true or false"))
            }
        }
        Kind::Enum(variants) => {
            if variants.contains(&raw) {
                Ok(TypedValue::Enum(raw.to_string()))
            } else {
                Err(invalid("one of the declared enum values"))
            }
        }
        Kind::Integer => raw.parse().map(TypedValue::Integer).map_err(|_| invalid("integer")),
        Kind::Long => raw.parse().map(TypedValue::Long).map_err(|_| invalid("long")),
        Kind::Double => match raw.parse::<f64>() {
            Ok(d) if d.is_finite() => Ok(TypedValue::Double(d)),
            _ => Err(invalid("double")),
        },
        Kind::Float => match raw.parse::<f32>() {
            Ok(f) if f.is_finite() => Ok(TypedValue::Float(f)),
            _ => Err(invalid("float")),
        },
        Kind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(TypedValue::Date)
            .map_err(|_| invalid("date (YYYY-MM-DD)")),
        Kind::DateTime => NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT)
            .map(TypedValue::DateTime)
            .map_err(|_| invalid("date-time (YYYY-MM-DDTHH:mm:ss)")),
        Kind::String => Ok(TypedValue::Text(raw.to_string())),
        Kind::Relation { .. } => Err(FilterError::NotScalar(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STATES: Kind = Kind::Enum(&["OPEN", "CLOSED"]);

    #[test]
    fn booleans_are_case_insensitive() {
        assert_eq!(coerce("done", Kind::Bool, "TRUE").unwrap(), TypedValue::Bool(true));
        assert_eq!(coerce("done", Kind::Bool, "False").unwrap(), TypedValue::Bool(false));
        assert!(coerce("done", Kind::Bool, "yes").is_err());
    }

    #[test]
    fn enums_are_case_sensitive() {
        assert_eq!(coerce("state", STATES, "OPEN").unwrap(), TypedValue::Enum("OPEN".into()));
        let err = coerce("state", STATES, "open").unwrap_err();
        assert_eq!(err.field(), Some("state"));
    }

    #[test]
    fn numbers_parse_locale_independently() {
        assert_eq!(coerce("price", Kind::Double, "50.00").unwrap(), TypedValue::Double(50.0));
        assert_eq!(coerce("count", Kind::Integer, "7").unwrap(), TypedValue::Integer(7));
        assert_eq!(coerce("id", Kind::Long, "9000000000").unwrap(), TypedValue::Long(9_000_000_000));
        assert_eq!(coerce("weight", Kind::Float, "1.5").unwrap(), TypedValue::Float(1.5));
        assert!(coerce("price", Kind::Double, "1,5").is_err());
        assert!(coerce("count", Kind::Integer, "7.0").is_err());
    }

    #[test]
    fn dates_use_iso_formats() {
        assert_eq!(
            coerce("dueOn", Kind::Date, "2025-01-31").unwrap(),
            TypedValue::Date(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap())
        );
        assert!(coerce("dueOn", Kind::Date, "31/01/2025").is_err());
        let dt = coerce("seenAt", Kind::DateTime, "2025-01-31T08:30:00").unwrap();
        assert_eq!(dt.to_string(), "2025-01-31T08:30:00");
        assert!(coerce("seenAt", Kind::DateTime, "2025-01-31").is_err());
    }

    #[test]
    fn strings_are_verbatim() {
        assert_eq!(coerce("title", Kind::String, " a b ").unwrap(), TypedValue::Text(" a b ".into()));
    }

    #[test]
    fn coercion_error_names_field_and_value() {
        let err = coerce("price", Kind::Double, "abc").unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidValue { field: "price".into(), value: "abc".into(), expected: "double" }
        );
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for raw in ["NaN", "nan", "inf", "-infinity"] {
            assert!(matches!(coerce("price", Kind::Double, raw), Err(FilterError::InvalidValue { .. })), "{}", raw);
            assert!(matches!(coerce("weight", Kind::Float, raw), Err(FilterError::InvalidValue { .. })), "{}", raw);
        }
        assert_eq!(coerce("price", Kind::Double, "1e3").unwrap(), TypedValue::Double(1000.0));
    }

    #[test]
    fn reads_json_rows_by_kind() {
        assert_eq!(TypedValue::from_json(Kind::Double, &json!(100)), Some(TypedValue::Double(100.0)));
        assert_eq!(
            TypedValue::from_json(Kind::DateTime, &json!("2025-02-01T10:00:00")).unwrap().to_string(),
            "2025-02-01T10:00:00"
        );
        assert_eq!(TypedValue::from_json(Kind::String, &Value::Null), None);
    }

    #[test]
    fn text_bounds_compare_against_string_form() {
        let left = TypedValue::Bool(true);
        assert_eq!(left.compare(&TypedValue::Text("true".into())), Some(Ordering::Equal));
        assert_eq!(TypedValue::Long(1).compare(&TypedValue::Double(1.0)), None);
    }
}
