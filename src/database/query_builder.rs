use sqlx::{self, postgres::PgArguments, FromRow, PgPool, Row};
use std::marker::PhantomData;

use crate::database::manager::DatabaseError;
use crate::filter::schema::{EntitySchema, JoinHop, Kind, ResolvedAttribute};
use crate::filter::{Predicate, SortDirection, TypedValue};

const ROOT_ALIAS: &str = "t0";

/// Parameterized SQL plus its positional (`$n`) bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<TypedValue>,
}

/// SELECT/COUNT over one entity table, with the predicate tree lowered into a
/// WHERE clause. Every relation hop becomes a `LEFT JOIN`, shared between
/// predicates and ORDER BY when they walk the same path.
pub struct QueryBuilder<'a, T> {
    entity: &'static EntitySchema,
    predicate: Option<&'a Predicate>,
    order: Option<(&'a ResolvedAttribute, SortDirection)>,
    limit: Option<(u32, u64)>,
    _phantom: PhantomData<T>,
}

impl<'a, T> QueryBuilder<'a, T> {
    pub fn new(entity: &'static EntitySchema) -> Self {
        Self {
            entity,
            predicate: None,
            order: None,
            limit: None,
            _phantom: PhantomData,
        }
    }

    pub fn filter(mut self, predicate: Option<&'a Predicate>) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn order(mut self, sort: &'a ResolvedAttribute, direction: SortDirection) -> Self {
        self.order = Some((sort, direction));
        self
    }

    pub fn page(mut self, size: u32, offset: u64) -> Self {
        self.limit = Some((size, offset));
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut writer = SqlWriter::new(self.entity);
        let where_clause = writer.where_clause(self.predicate);

        let mut order_parts = Vec::new();
        if let Some((sort, direction)) = self.order {
            let column = writer.column(&[], sort);
            order_parts.push(format!("{} {}", column, direction.to_sql()));
            // Stable paging needs a unique tiebreaker.
            if !(sort.joins.is_empty() && sort.attribute.column == EntitySchema::ID_COLUMN) {
                order_parts.push(format!("{}.\"{}\" {}", ROOT_ALIAS, EntitySchema::ID_COLUMN, direction.to_sql()));
            }
        }

        let mut query = format!("SELECT {}.* FROM {}{} WHERE {}", ROOT_ALIAS, writer.from_clause(), writer.join_clause(), where_clause);
        if !order_parts.is_empty() {
            query.push_str(&format!(" ORDER BY {}", order_parts.join(", ")));
        }
        if let Some((size, offset)) = self.limit {
            query.push_str(&format!(" LIMIT {} OFFSET {}", size, offset));
        }

        SqlResult { query, params: writer.params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let mut writer = SqlWriter::new(self.entity);
        let where_clause = writer.where_clause(self.predicate);
        let query = format!(
            "SELECT COUNT(*) AS count FROM {}{} WHERE {}",
            writer.from_clause(),
            writer.join_clause(),
            where_clause
        );
        SqlResult { query, params: writer.params }
    }
}

impl<'a, T> QueryBuilder<'a, T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub async fn select_all(&self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.to_sql();
        tracing::debug!("SQL: {} {:?}", sql_result.query, sql_result.params);
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn count(&self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = self.to_count_sql();
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

/// Accumulates bindings and join aliases while lowering one statement.
struct SqlWriter {
    entity: &'static EntitySchema,
    params: Vec<TypedValue>,
    /// Hop path from the root and the alias it was joined as.
    joins: Vec<(Vec<JoinHop>, String)>,
}

impl SqlWriter {
    fn new(entity: &'static EntitySchema) -> Self {
        Self { entity, params: Vec::new(), joins: Vec::new() }
    }

    fn from_clause(&self) -> String {
        format!("\"{}\" {}", self.entity.table, ROOT_ALIAS)
    }

    fn join_clause(&self) -> String {
        let mut sql = String::new();
        for (path, alias) in &self.joins {
            let Some((hop, parent)) = path.split_last() else { continue };
            let parent_alias = self.alias_of(parent);
            sql.push_str(&format!(
                " LEFT JOIN \"{}\" {} ON {}.\"{}\" = {}.\"{}\"",
                hop.target.table,
                alias,
                alias,
                EntitySchema::ID_COLUMN,
                parent_alias,
                hop.via.column
            ));
        }
        sql
    }

    fn alias_of(&self, path: &[JoinHop]) -> String {
        if path.is_empty() {
            return ROOT_ALIAS.to_string();
        }
        self.joins
            .iter()
            .find(|(p, _)| p.as_slice() == path)
            .map(|(_, alias)| alias.clone())
            .unwrap_or_else(|| ROOT_ALIAS.to_string())
    }

    /// Registers every prefix of `path` as a join and returns the alias of the last one.
    fn join(&mut self, path: &[JoinHop]) -> String {
        for end in 1..=path.len() {
            let prefix = &path[..end];
            if !self.joins.iter().any(|(p, _)| p.as_slice() == prefix) {
                let alias = format!("t{}", self.joins.len() + 1);
                self.joins.push((prefix.to_vec(), alias));
            }
        }
        self.alias_of(path)
    }

    fn column(&mut self, scope: &[JoinHop], attr: &ResolvedAttribute) -> String {
        let path: Vec<JoinHop> = scope.iter().chain(attr.joins.iter()).copied().collect();
        let alias = self.join(&path);
        format!("{}.\"{}\"", alias, attr.attribute.column)
    }

    /// Column rendered the way `TypedValue` displays it.
    fn text_column(&mut self, scope: &[JoinHop], attr: &ResolvedAttribute) -> String {
        let column = self.column(scope, attr);
        match attr.kind() {
            Kind::String | Kind::Enum(_) => column,
            Kind::DateTime => format!("to_char({}, 'YYYY-MM-DD\"T\"HH24:MI:SS')", column),
            _ => format!("{}::text", column),
        }
    }

    fn param(&mut self, value: TypedValue) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    fn where_clause(&mut self, predicate: Option<&Predicate>) -> String {
        match predicate {
            Some(predicate) => self.condition(&[], predicate),
            None => "1=1".to_string(),
        }
    }

    fn condition(&mut self, scope: &[JoinHop], predicate: &Predicate) -> String {
        match predicate {
            Predicate::And(inner) if inner.is_empty() => "1=1".to_string(),
            Predicate::And(inner) => {
                let parts: Vec<String> = inner
                    .iter()
                    .map(|p| format!("({})", self.condition(scope, p)))
                    .collect();
                parts.join(" AND ")
            }
            Predicate::Eq { attr, value } => self.compare(scope, attr, "=", value),
            Predicate::Neq { attr, value } => self.compare(scope, attr, "<>", value),
            Predicate::Gt { attr, value } => self.compare(scope, attr, ">", value),
            Predicate::Lt { attr, value } => self.compare(scope, attr, "<", value),
            Predicate::Like { attr, pattern } => {
                let column = self.column(scope, attr);
                format!("LOWER({}) LIKE {}", column, self.param(TypedValue::Text(pattern.clone())))
            }
            Predicate::In { attr, values } => {
                if values.is_empty() {
                    return "1=0".to_string();
                }
                let column = self.text_column(scope, attr);
                let params: Vec<String> = values
                    .iter()
                    .map(|v| self.param(TypedValue::Text(v.clone())))
                    .collect();
                format!("{} IN ({})", column, params.join(", "))
            }
            Predicate::Between { attr, low, high } => {
                let column = match low {
                    TypedValue::Text(_) => self.text_column(scope, attr),
                    _ => self.column(scope, attr),
                };
                let low = self.param(low.clone());
                let high = self.param(high.clone());
                format!("{} BETWEEN {} AND {}", column, low, high)
            }
            Predicate::IsNull { attr } => format!("{} IS NULL", self.column(scope, attr)),
            Predicate::NotNull { attr } => format!("{} IS NOT NULL", self.column(scope, attr)),
            Predicate::Join { relation, predicate } => match relation.hop() {
                Some(hop) => {
                    let mut inner: Vec<JoinHop> = scope.to_vec();
                    inner.extend(relation.joins.iter().copied());
                    inner.push(hop);
                    self.condition(&inner, predicate)
                }
                None => "1=0".to_string(),
            },
        }
    }

    fn compare(&mut self, scope: &[JoinHop], attr: &ResolvedAttribute, op: &str, value: &TypedValue) -> String {
        let column = self.column(scope, attr);
        format!("{} {} {}", column, op, self.param(value.clone()))
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &TypedValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        TypedValue::Bool(b) => q.bind(*b),
        TypedValue::Enum(s) | TypedValue::Text(s) => q.bind(s.clone()),
        TypedValue::Integer(i) => q.bind(*i),
        TypedValue::Long(i) => q.bind(*i),
        TypedValue::Double(f) => q.bind(*f),
        TypedValue::Float(f) => q.bind(*f),
        TypedValue::Date(d) => q.bind(*d),
        TypedValue::DateTime(dt) => q.bind(*dt),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &TypedValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        TypedValue::Bool(b) => q.bind(*b),
        TypedValue::Enum(s) | TypedValue::Text(s) => q.bind(s.clone()),
        TypedValue::Integer(i) => q.bind(*i),
        TypedValue::Long(i) => q.bind(*i),
        TypedValue::Double(f) => q.bind(*f),
        TypedValue::Float(f) => q.bind(*f),
        TypedValue::Date(d) => q.bind(*d),
        TypedValue::DateTime(dt) => q.bind(*dt),
    }
}
