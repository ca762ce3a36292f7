use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Lt,
    Like,
    In,
    Between,
    IsNull,
    NotNull,
    Join,
}

impl FilterOp {
    /// Maps the token after the last `_` of a filter key.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "eq" => FilterOp::Eq,
            "neq" => FilterOp::Neq,
            "gt" => FilterOp::Gt,
            "lt" => FilterOp::Lt,
            "like" => FilterOp::Like,
            "in" => FilterOp::In,
            "between" => FilterOp::Between,
            "isnull" => FilterOp::IsNull,
            "notnull" => FilterOp::NotNull,
            "join" => FilterOp::Join,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::Gt => "gt",
            FilterOp::Lt => "lt",
            FilterOp::Like => "like",
            FilterOp::In => "in",
            FilterOp::Between => "between",
            FilterOp::IsNull => "isnull",
            FilterOp::NotNull => "notnull",
            FilterOp::Join => "join",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dotted attribute path, e.g. `client.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AttributePath(Vec<String>);

impl AttributePath {
    /// Splits on `.`; `None` when the path or any segment is empty.
    pub fn parse(dotted: &str) -> Option<Self> {
        if dotted.is_empty() {
            return None;
        }
        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self(segments))
    }

    pub fn single(name: &str) -> Self {
        Self(vec![name.to_string()])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<AttributePath> for String {
    fn from(path: AttributePath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for AttributePath {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AttributePath::parse(&value).ok_or_else(|| format!("invalid attribute path: '{}'", value))
    }
}

/// Structured form of the `joinField:joinOperator:joinValue` encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinTerm {
    pub field: AttributePath,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    Single(String),
    List(Vec<String>),
    Range(String, String),
    Join(JoinTerm),
}

/// One parsed `field_operator=value` query parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterTerm {
    pub path: AttributePath,
    pub op: FilterOp,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive `ASC`; everything else sorts descending.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("ASC") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}
