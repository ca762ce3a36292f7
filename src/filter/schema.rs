use std::fmt;

use super::error::FilterError;
use super::types::AttributePath;

/// Declared type of an entity attribute.
#[derive(Clone, Copy)]
pub enum Kind {
    Bool,
    Enum(&'static [&'static str]),
    Integer,
    Long,
    Double,
    Float,
    Date,
    DateTime,
    String,
    /// Many-to-one link; `via` names the foreign-key attribute on the same
    /// entity, joined against the target's `id`.
    Relation {
        target: &'static EntitySchema,
        via: &'static str,
    },
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "boolean",
            Kind::Enum(_) => "enum",
            Kind::Integer => "integer",
            Kind::Long => "long",
            Kind::Double => "double",
            Kind::Float => "float",
            Kind::Date => "date",
            Kind::DateTime => "date-time",
            Kind::String => "string",
            Kind::Relation { .. } => "relation",
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Kind::Relation { .. })
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Kind::Integer | Kind::Long | Kind::Double | Kind::Float)
    }

    /// Stored as text in the database.
    pub fn is_textual(&self) -> bool {
        matches!(self, Kind::String | Kind::Enum(_))
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Enum(variants) => write!(f, "Enum({:?})", variants),
            Kind::Relation { target, via } => write!(f, "Relation({} via {})", target.name, via),
            other => f.write_str(other.name()),
        }
    }
}

#[derive(Debug)]
pub struct Attribute {
    /// API name, used in filter keys and JSON rows.
    pub name: &'static str,
    pub column: &'static str,
    pub kind: Kind,
}

impl Attribute {
    pub const fn new(name: &'static str, column: &'static str, kind: Kind) -> Self {
        Self { name, column, kind }
    }
}

/// Statically declared attribute graph of one entity.
#[derive(Debug)]
pub struct EntitySchema {
    pub name: &'static str,
    pub table: &'static str,
    pub attributes: &'static [Attribute],
}

impl EntitySchema {
    pub const ID_COLUMN: &'static str = "id";

    pub fn attribute(&'static self, name: &str) -> Option<&'static Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Walks `path` segment by segment, following relations as implicit joins.
    pub fn resolve(&'static self, path: &AttributePath) -> Result<ResolvedAttribute, FilterError> {
        let not_found = || FilterError::AttributeNotFound {
            entity: self.name,
            path: path.to_string(),
        };

        let mut current: &'static EntitySchema = self;
        let mut joins = Vec::new();
        let segments = path.segments();
        let Some((last, parents)) = segments.split_last() else {
            return Err(not_found());
        };

        for segment in parents {
            let attribute = current.attribute(segment).ok_or_else(not_found)?;
            let hop = JoinHop::from_attribute(current, attribute).ok_or_else(not_found)?;
            current = hop.target;
            joins.push(hop);
        }

        let attribute = current.attribute(last).ok_or_else(not_found)?;
        Ok(ResolvedAttribute {
            entity: self,
            owner: current,
            path: path.clone(),
            joins,
            attribute,
        })
    }

    /// Like [`resolve`](Self::resolve) but rejects relation-valued terminals.
    pub fn resolve_scalar(&'static self, path: &AttributePath) -> Result<ResolvedAttribute, FilterError> {
        let resolved = self.resolve(path)?;
        if resolved.kind().is_relation() {
            return Err(FilterError::NotScalar(path.to_string()));
        }
        Ok(resolved)
    }
}

/// One relation traversal: `source.via` = `target.id`.
#[derive(Debug, Clone, Copy)]
pub struct JoinHop {
    pub source: &'static EntitySchema,
    pub relation: &'static Attribute,
    pub via: &'static Attribute,
    pub target: &'static EntitySchema,
}

impl JoinHop {
    pub fn from_attribute(source: &'static EntitySchema, relation: &'static Attribute) -> Option<Self> {
        let Kind::Relation { target, via } = relation.kind else {
            return None;
        };
        let via = source.attribute(via)?;
        Some(Self { source, relation, via, target })
    }

    pub fn name(&self) -> &'static str {
        self.relation.name
    }
}

impl PartialEq for JoinHop {
    fn eq(&self, other: &Self) -> bool {
        self.source.name == other.source.name && self.relation.name == other.relation.name
    }
}

/// Handle to a terminal attribute reached from an entity root.
#[derive(Debug, Clone)]
pub struct ResolvedAttribute {
    pub entity: &'static EntitySchema,
    /// Entity that declares `attribute` (the root unless joins were walked).
    pub owner: &'static EntitySchema,
    pub path: AttributePath,
    pub joins: Vec<JoinHop>,
    pub attribute: &'static Attribute,
}

impl ResolvedAttribute {
    pub fn kind(&self) -> Kind {
        self.attribute.kind
    }

    pub fn field(&self) -> String {
        self.path.to_string()
    }

    /// Hop out of this attribute when it is relation-valued.
    pub fn hop(&self) -> Option<JoinHop> {
        JoinHop::from_attribute(self.owner, self.attribute)
    }
}

impl PartialEq for ResolvedAttribute {
    fn eq(&self, other: &Self) -> bool {
        self.entity.name == other.entity.name && self.path == other.path
    }
}

impl fmt::Display for ResolvedAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{CHILD, ITEM};
    use super::*;

    fn path(p: &str) -> AttributePath {
        AttributePath::parse(p).unwrap()
    }

    #[test]
    fn resolves_scalar_on_root() {
        let resolved = ITEM.resolve(&path("price")).unwrap();
        assert!(resolved.joins.is_empty());
        assert_eq!(resolved.attribute.column, "price");
        assert!(matches!(resolved.kind(), Kind::Double));
    }

    #[test]
    fn walks_relations_as_joins() {
        let resolved = CHILD.resolve(&path("item.owner.name")).unwrap();
        let hops: Vec<&str> = resolved.joins.iter().map(|h| h.name()).collect();
        assert_eq!(hops, vec!["item", "owner"]);
        assert_eq!(resolved.owner.name, "owner");
        assert_eq!(resolved.joins[0].via.column, "item_id");
    }

    #[test]
    fn unknown_segment_is_an_error() {
        let err = ITEM.resolve(&path("owner.nickname")).unwrap_err();
        assert_eq!(
            err,
            FilterError::AttributeNotFound { entity: "item", path: "owner.nickname".into() }
        );
        assert!(ITEM.resolve(&path("missing")).is_err());
    }

    #[test]
    fn scalar_in_the_middle_is_not_walkable() {
        assert!(matches!(
            ITEM.resolve(&path("price.value")),
            Err(FilterError::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn resolve_scalar_rejects_relations() {
        assert_eq!(
            ITEM.resolve_scalar(&path("owner")).unwrap_err(),
            FilterError::NotScalar("owner".into())
        );
        let relation = ITEM.resolve(&path("owner")).unwrap();
        assert_eq!(relation.hop().unwrap().target.name, "owner");
    }
}
