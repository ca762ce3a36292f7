use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::api::envelope::RawPage;
use crate::database::manager::DatabaseError;
use crate::database::repository::{Entity, PageQuery, Store};
use crate::filter::eval::{self, RelationLookup, Row};
use crate::filter::schema::{EntitySchema, JoinHop};
use crate::filter::SortDirection;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Row>,
    by_id: HashMap<i64, usize>,
}

/// Fixture-backed store. Rows are kept as JSON objects and predicates are
/// evaluated in memory, with the same null and join semantics as `PgStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<&'static str, Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Entity>(&mut self, entities: impl IntoIterator<Item = T>) -> Result<(), DatabaseError> {
        let schema = T::schema();
        let table = self.tables.entry(schema.table).or_default();
        for entity in entities {
            let row = match serde_json::to_value(&entity) {
                Ok(Value::Object(row)) => row,
                Ok(other) => {
                    return Err(DatabaseError::Fixture(format!(
                        "{} row is not an object: {}",
                        schema.name, other
                    )))
                }
                Err(e) => return Err(DatabaseError::Fixture(e.to_string())),
            };
            let id = row
                .get(EntitySchema::ID_COLUMN)
                .and_then(Value::as_i64)
                .ok_or_else(|| DatabaseError::Fixture(format!("{} row without numeric id", schema.name)))?;
            if table.by_id.contains_key(&id) {
                return Err(DatabaseError::Fixture(format!("duplicate {} id {}", schema.name, id)));
            }
            table.by_id.insert(id, table.rows.len());
            table.rows.push(row);
        }
        Ok(())
    }

    pub fn len(&self, schema: &EntitySchema) -> usize {
        self.tables.get(schema.table).map_or(0, |t| t.rows.len())
    }

    fn rows(&self, schema: &EntitySchema) -> &[Row] {
        self.tables.get(schema.table).map(|t| t.rows.as_slice()).unwrap_or(&[])
    }
}

impl RelationLookup for MemoryStore {
    fn follow<'a>(&'a self, hop: &JoinHop, row: &Row) -> Option<&'a Row> {
        let id = row.get(hop.via.name)?.as_i64()?;
        let table = self.tables.get(hop.target.table)?;
        table.by_id.get(&id).map(|&index| &table.rows[index])
    }
}

fn row_id(row: &Row) -> Option<i64> {
    row.get(EntitySchema::ID_COLUMN).and_then(Value::as_i64)
}

#[async_trait]
impl Store for MemoryStore {
    async fn fetch_page<T: Entity>(&self, query: &PageQuery) -> Result<RawPage<T>, DatabaseError> {
        let mut matched: Vec<&Row> = self
            .rows(T::schema())
            .iter()
            .filter(|row| query.predicate.as_ref().map_or(true, |p| eval::matches(p, row, self)))
            .collect();

        let direction = query.paging.sort_direction;
        matched.sort_by(|a, b| {
            eval::compare_rows(&query.sort, direction, a, b, self).then_with(|| {
                let ordering = row_id(a).cmp(&row_id(b));
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            })
        });

        let total = matched.len() as u64;
        let offset = usize::try_from(query.paging.offset()).unwrap_or(usize::MAX);
        let items = matched
            .into_iter()
            .skip(offset)
            .take(query.paging.page_size as usize)
            .map(|row| {
                serde_json::from_value::<T>(Value::Object(row.clone()))
                    .map_err(|e| DatabaseError::QueryError(format!("{} row: {}", T::schema().name, e)))
            })
            .collect::<Result<Vec<T>, DatabaseError>>()?;

        Ok(RawPage::from_total(items, &query.paging, total))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
