use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Unknown attribute '{path}' on {entity}")]
    AttributeNotFound { entity: &'static str, path: String },

    #[error("Invalid value for '{field}': expected {expected}, got '{value}'")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("Operator '{op}' is not supported on {kind} attribute '{field}'")]
    OperatorNotSupported {
        field: String,
        op: &'static str,
        kind: &'static str,
    },

    #[error("Attribute '{0}' is not a relation")]
    NotARelation(String),

    #[error("Attribute '{0}' is a relation and cannot be compared directly")]
    NotScalar(String),

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid operator data: {0}")]
    InvalidOperatorData(String),
}

impl FilterError {
    /// Filter key the error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            FilterError::AttributeNotFound { path, .. } => Some(path),
            FilterError::InvalidValue { field, .. } => Some(field),
            FilterError::OperatorNotSupported { field, .. } => Some(field),
            FilterError::NotARelation(field) => Some(field),
            FilterError::NotScalar(field) => Some(field),
            FilterError::InvalidSortField(field) => Some(field),
            FilterError::InvalidOperatorData(_) => None,
        }
    }
}
