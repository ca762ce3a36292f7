//! In-memory lowering of the predicate tree.
//!
//! Rows are JSON objects keyed by attribute API names. Relation hops are
//! followed through a [`RelationLookup`]; a missing related row behaves like
//! a SQL `NULL` reached through a `LEFT JOIN`.

use serde_json::{Map, Value};
use std::cmp::Ordering;

use super::coerce::TypedValue;
use super::predicate::Predicate;
use super::schema::{JoinHop, ResolvedAttribute};
use super::types::SortDirection;

pub type Row = Map<String, Value>;

pub trait RelationLookup {
    /// Row on the far side of `hop` for `row`, if any.
    fn follow<'a>(&'a self, hop: &JoinHop, row: &Row) -> Option<&'a Row>;
}

pub fn matches<L: RelationLookup>(predicate: &Predicate, row: &Row, lookup: &L) -> bool {
    Matcher { lookup }.eval(&[], predicate, row)
}

/// Row ordering for `sort`; nulls sort after every value in ascending order.
pub fn compare_rows<L: RelationLookup>(
    sort: &ResolvedAttribute,
    direction: SortDirection,
    a: &Row,
    b: &Row,
    lookup: &L,
) -> Ordering {
    let matcher = Matcher { lookup };
    let left = matcher.read(&[], sort, a);
    let right = matcher.read(&[], sort, b);
    let ordering = match (left, right) {
        (Some(l), Some(r)) => l.compare(&r).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

struct Matcher<'l, L> {
    lookup: &'l L,
}

impl<L: RelationLookup> Matcher<'_, L> {
    fn eval(&self, scope: &[JoinHop], predicate: &Predicate, row: &Row) -> bool {
        match predicate {
            Predicate::And(inner) => inner.iter().all(|p| self.eval(scope, p, row)),
            Predicate::Eq { attr, value } => self.read(scope, attr, row).is_some_and(|v| &v == value),
            Predicate::Neq { attr, value } => self.read(scope, attr, row).is_some_and(|v| &v != value),
            Predicate::Gt { attr, value } => self.ordered(scope, attr, row, value, Ordering::Greater),
            Predicate::Lt { attr, value } => self.ordered(scope, attr, row, value, Ordering::Less),
            Predicate::Like { attr, pattern } => self
                .read(scope, attr, row)
                .is_some_and(|v| like(&v.to_string().to_lowercase(), pattern)),
            Predicate::In { attr, values } => self
                .read(scope, attr, row)
                .is_some_and(|v| values.contains(&v.to_string())),
            Predicate::Between { attr, low, high } => self.read(scope, attr, row).is_some_and(|v| {
                matches!(v.compare(low), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(v.compare(high), Some(Ordering::Less | Ordering::Equal))
            }),
            Predicate::IsNull { attr } => self.read(scope, attr, row).is_none(),
            Predicate::NotNull { attr } => self.read(scope, attr, row).is_some(),
            Predicate::Join { relation, predicate } => {
                let Some(hop) = relation.hop() else { return false };
                let mut inner_scope: Vec<JoinHop> = scope.to_vec();
                inner_scope.extend(relation.joins.iter().copied());
                inner_scope.push(hop);
                self.eval(&inner_scope, predicate, row)
            }
        }
    }

    fn ordered(&self, scope: &[JoinHop], attr: &ResolvedAttribute, row: &Row, value: &TypedValue, want: Ordering) -> bool {
        self.read(scope, attr, row)
            .and_then(|v| v.compare(value))
            .is_some_and(|o| o == want)
    }

    fn read(&self, scope: &[JoinHop], attr: &ResolvedAttribute, row: &Row) -> Option<TypedValue> {
        let mut current = row;
        for hop in scope.iter().chain(attr.joins.iter()) {
            current = self.lookup.follow(hop, current)?;
        }
        TypedValue::from_json(attr.kind(), current.get(attr.attribute.name)?)
    }
}

/// SQL `LIKE` semantics: `%` matches any run, `_` matches one character.
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((bp, bt)) = backtrack {
            p = bp + 1;
            t = bt + 1;
            backtrack = Some((bp, bt + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::builder::SpecificationBuilder;
    use crate::filter::schema::fixtures::{ITEM, OWNER};
    use serde_json::json;
    use std::collections::HashMap;

    struct Tables {
        owners: HashMap<i64, Row>,
    }

    impl RelationLookup for Tables {
        fn follow<'a>(&'a self, hop: &JoinHop, row: &Row) -> Option<&'a Row> {
            assert_eq!(hop.target.name, OWNER.name);
            let id = row.get(hop.via.name)?.as_i64()?;
            self.owners.get(&id)
        }
    }

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn tables() -> Tables {
        let mut owners = HashMap::new();
        owners.insert(1, row(json!({ "id": 1, "name": "Acme Corp" })));
        owners.insert(2, row(json!({ "id": 2, "name": "Globex" })));
        Tables { owners }
    }

    fn items() -> Vec<Row> {
        vec![
            row(json!({ "id": 1, "title": "Logo", "state": "OPEN", "done": false, "price": 40.0, "dueOn": "2025-01-05", "ownerId": 1 })),
            row(json!({ "id": 2, "title": "Site", "state": "CLOSED", "done": true, "price": 120.5, "dueOn": "2025-02-01", "ownerId": 2 })),
            row(json!({ "id": 3, "title": "Audit", "state": "OPEN", "done": true, "price": 75.0, "dueOn": null, "ownerId": null })),
        ]
    }

    fn ids(params: &[(&str, &str)]) -> Vec<i64> {
        let params: Vec<(String, String)> = params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let predicate = SpecificationBuilder::new(&ITEM).build(&params).unwrap();
        let tables = tables();
        items()
            .iter()
            .filter(|r| predicate.as_ref().map_or(true, |p| matches(p, r, &tables)))
            .map(|r| r["id"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn boolean_eq_matches_exactly() {
        assert_eq!(ids(&[("done_eq", "true")]), vec![2, 3]);
        assert_eq!(ids(&[("done_eq", "FALSE")]), vec![1]);
    }

    #[test]
    fn combination_is_order_independent() {
        let a = ids(&[("state_eq", "OPEN"), ("price_gt", "50")]);
        let b = ids(&[("price_gt", "50"), ("state_eq", "OPEN")]);
        assert_eq!(a, vec![3]);
        assert_eq!(a, b);
    }

    #[test]
    fn between_is_inclusive() {
        assert_eq!(ids(&[("dueOn_between", "2025-01-05,2025-02-01")]), vec![1, 2]);
        assert_eq!(ids(&[("price_between", "40,75")]), vec![1, 3]);
    }

    #[test]
    fn nulls_behave_like_sql() {
        assert_eq!(ids(&[("dueOn_isnull", "true")]), vec![3]);
        assert_eq!(ids(&[("dueOn_notnull", "true")]), vec![1, 2]);
        assert_eq!(ids(&[("dueOn_neq", "2025-01-05")]), vec![2]);
    }

    #[test]
    fn in_compares_string_forms() {
        assert_eq!(ids(&[("state_in", "CLOSED,PENDING")]), vec![2]);
        assert_eq!(ids(&[("done_in", "true")]), vec![2, 3]);
    }

    #[test]
    fn implicit_and_explicit_joins() {
        assert_eq!(ids(&[("owner.name_like", "acme")]), vec![1]);
        assert_eq!(ids(&[("owner_join", "name:like:GLOB")]), vec![2]);
        assert_eq!(ids(&[("owner_join", "name:eq:Globex")]), vec![2]);
        assert_eq!(ids(&[("owner.name_isnull", "1")]), vec![3]);
    }

    #[test]
    fn like_supports_sql_wildcards() {
        assert!(like("acme corp", "%acme%"));
        assert!(like("acme", "%%"));
        assert!(like("abc", "a_c"));
        assert!(!like("abc", "%abd%"));
        assert!(like("mississippi", "%iss%pi%"));
    }

    #[test]
    fn rows_sort_with_nulls_last_ascending() {
        let tables = tables();
        let sort = ITEM.resolve(&crate::filter::types::AttributePath::parse("owner.name").unwrap()).unwrap();
        let mut rows = items();
        rows.sort_by(|a, b| compare_rows(&sort, SortDirection::Asc, a, b, &tables));
        let order: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(order, vec![1, 2, 3]);

        rows.sort_by(|a, b| compare_rows(&sort, SortDirection::Desc, a, b, &tables));
        let order: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }
}
