use std::fmt;

use super::coerce::{coerce, TypedValue};
use super::error::FilterError;
use super::schema::{EntitySchema, Kind, ResolvedAttribute};
use super::types::{FilterOp, FilterTerm, FilterValue, JoinTerm};

/// Side-effect-free condition over one entity root.
///
/// Leaves hold resolved attribute handles; lowering into SQL or an in-memory
/// matcher happens elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    And(Vec<Predicate>),
    Eq { attr: ResolvedAttribute, value: TypedValue },
    Neq { attr: ResolvedAttribute, value: TypedValue },
    Gt { attr: ResolvedAttribute, value: TypedValue },
    Lt { attr: ResolvedAttribute, value: TypedValue },
    /// Case-insensitive match; `pattern` is lower-cased and `%`-wrapped.
    Like { attr: ResolvedAttribute, pattern: String },
    /// Compared against the attribute's string form.
    In { attr: ResolvedAttribute, values: Vec<String> },
    Between { attr: ResolvedAttribute, low: TypedValue, high: TypedValue },
    IsNull { attr: ResolvedAttribute },
    NotNull { attr: ResolvedAttribute },
    /// `predicate` is evaluated against the entity reached through `relation`.
    Join { relation: ResolvedAttribute, predicate: Box<Predicate> },
}

impl Predicate {
    /// AND of all predicates; `None` when there is nothing to constrain.
    pub fn all(predicates: Vec<Predicate>) -> Option<Predicate> {
        let mut flat = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            match predicate {
                Predicate::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Predicate::And(flat)),
        }
    }

    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::all(vec![self, other]).unwrap_or(Predicate::And(Vec::new()))
    }

    /// Number of leaf comparisons.
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::And(inner) => inner.iter().map(Predicate::leaf_count).sum(),
            Predicate::Join { predicate, .. } => predicate.leaf_count(),
            _ => 1,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::And(inner) => {
                let parts: Vec<String> = inner.iter().map(|p| format!("({})", p)).collect();
                f.write_str(&parts.join(" AND "))
            }
            Predicate::Eq { attr, value } => write!(f, "{} = '{}'", attr, value),
            Predicate::Neq { attr, value } => write!(f, "{} <> '{}'", attr, value),
            Predicate::Gt { attr, value } => write!(f, "{} > '{}'", attr, value),
            Predicate::Lt { attr, value } => write!(f, "{} < '{}'", attr, value),
            Predicate::Like { attr, pattern } => write!(f, "lower({}) LIKE '{}'", attr, pattern),
            Predicate::In { attr, values } => write!(f, "{} IN ({})", attr, values.join(", ")),
            Predicate::Between { attr, low, high } => {
                write!(f, "{} BETWEEN '{}' AND '{}'", attr, low, high)
            }
            Predicate::IsNull { attr } => write!(f, "{} IS NULL", attr),
            Predicate::NotNull { attr } => write!(f, "{} IS NOT NULL", attr),
            Predicate::Join { relation, predicate } => write!(f, "{} -> {}", relation, predicate),
        }
    }
}

/// Builds one predicate per filter term.
pub struct PredicateFactory;

impl PredicateFactory {
    pub fn build(entity: &'static EntitySchema, term: &FilterTerm) -> Result<Predicate, FilterError> {
        if let (FilterOp::Join, FilterValue::Join(join)) = (term.op, &term.value) {
            let relation = entity.resolve(&term.path)?;
            return Self::join(relation, join);
        }

        let attr = entity.resolve_scalar(&term.path)?;
        match (term.op, &term.value) {
            (FilterOp::Eq, FilterValue::Single(raw)) => Self::eq(attr, raw),
            (FilterOp::Neq, FilterValue::Single(raw)) => Self::neq(attr, raw),
            (FilterOp::Gt, FilterValue::Single(raw)) => Self::gt(attr, raw),
            (FilterOp::Lt, FilterValue::Single(raw)) => Self::lt(attr, raw),
            (FilterOp::Like, FilterValue::Single(raw)) => Self::like(attr, raw),
            (FilterOp::In, FilterValue::List(values)) => Ok(Self::in_list(attr, values.clone())),
            (FilterOp::Between, FilterValue::Range(low, high)) => Self::between(attr, low, high),
            (FilterOp::IsNull, _) => Ok(Predicate::IsNull { attr }),
            (FilterOp::NotNull, _) => Ok(Predicate::NotNull { attr }),
            (op, value) => Err(FilterError::InvalidOperatorData(format!(
                "operator '{}' cannot take {:?}",
                op, value
            ))),
        }
    }

    pub fn eq(attr: ResolvedAttribute, raw: &str) -> Result<Predicate, FilterError> {
        let value = coerce(&attr.field(), attr.kind(), raw)?;
        Ok(Predicate::Eq { attr, value })
    }

    pub fn neq(attr: ResolvedAttribute, raw: &str) -> Result<Predicate, FilterError> {
        let value = coerce(&attr.field(), attr.kind(), raw)?;
        Ok(Predicate::Neq { attr, value })
    }

    pub fn gt(attr: ResolvedAttribute, raw: &str) -> Result<Predicate, FilterError> {
        let value = Self::ordered_value(&attr, FilterOp::Gt, raw)?;
        Ok(Predicate::Gt { attr, value })
    }

    pub fn lt(attr: ResolvedAttribute, raw: &str) -> Result<Predicate, FilterError> {
        let value = Self::ordered_value(&attr, FilterOp::Lt, raw)?;
        Ok(Predicate::Lt { attr, value })
    }

    pub fn like(attr: ResolvedAttribute, raw: &str) -> Result<Predicate, FilterError> {
        if !matches!(attr.kind(), Kind::String) {
            return Err(Self::unsupported(&attr, FilterOp::Like));
        }
        let pattern = format!("%{}%", raw.to_lowercase());
        Ok(Predicate::Like { attr, pattern })
    }

    /// Values stay uncoerced; membership is checked on the string form.
    pub fn in_list(attr: ResolvedAttribute, values: Vec<String>) -> Predicate {
        Predicate::In { attr, values }
    }

    pub fn between(attr: ResolvedAttribute, low: &str, high: &str) -> Result<Predicate, FilterError> {
        let field = attr.field();
        let (low, high) = match attr.kind() {
            kind @ (Kind::Date | Kind::DateTime | Kind::Integer | Kind::Long | Kind::Double | Kind::Float) => {
                (coerce(&field, kind, low)?, coerce(&field, kind, high)?)
            }
            _ => (TypedValue::Text(low.to_string()), TypedValue::Text(high.to_string())),
        };
        Ok(Predicate::Between { attr, low, high })
    }

    /// One extra hop through `relation`, then `eq` or `like` on the joined attribute.
    pub fn join(relation: ResolvedAttribute, term: &JoinTerm) -> Result<Predicate, FilterError> {
        let hop = relation
            .hop()
            .ok_or_else(|| FilterError::NotARelation(relation.field()))?;
        let target = hop.target.resolve_scalar(&term.field)?;
        let predicate = match term.op {
            FilterOp::Like => Self::like(target, &term.value)?,
            _ => Self::eq(target, &term.value)?,
        };
        Ok(Predicate::Join { relation, predicate: Box::new(predicate) })
    }

    fn ordered_value(attr: &ResolvedAttribute, op: FilterOp, raw: &str) -> Result<TypedValue, FilterError> {
        match attr.kind() {
            Kind::Date | Kind::DateTime | Kind::String => coerce(&attr.field(), attr.kind(), raw),
            kind if kind.is_numeric() => coerce(&attr.field(), kind, raw),
            _ => Err(Self::unsupported(attr, op)),
        }
    }

    fn unsupported(attr: &ResolvedAttribute, op: FilterOp) -> FilterError {
        FilterError::OperatorNotSupported {
            field: attr.field(),
            op: op.as_str(),
            kind: attr.kind().name(),
        }
    }
}
