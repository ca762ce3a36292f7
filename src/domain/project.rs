use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::database::Entity;
use crate::domain::client::CLIENT_SCHEMA;
use crate::filter::{Attribute, EntitySchema, Kind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const NAMES: &'static [&'static str] = &["ACTIVE", "ON_HOLD", "COMPLETED", "CANCELLED"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "ACTIVE",
            ProjectStatus::OnHold => "ON_HOLD",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// One of [`ProjectStatus::NAMES`]; stored as text.
    pub status: String,
    pub hourly_rate: f64,
    pub budget: Option<f64>,
    pub billable: bool,
    pub start_date: NaiveDate,
    pub deadline: Option<NaiveDate>,
    pub client_id: i64,
    pub created_at: NaiveDateTime,
}

pub static PROJECT_SCHEMA: EntitySchema = EntitySchema {
    name: "project",
    table: "projects",
    attributes: &[
        Attribute::new("id", "id", Kind::Long),
        Attribute::new("name", "name", Kind::String),
        Attribute::new("description", "description", Kind::String),
        Attribute::new("status", "status", Kind::Enum(ProjectStatus::NAMES)),
        Attribute::new("hourlyRate", "hourly_rate", Kind::Double),
        Attribute::new("budget", "budget", Kind::Double),
        Attribute::new("billable", "billable", Kind::Bool),
        Attribute::new("startDate", "start_date", Kind::Date),
        Attribute::new("deadline", "deadline", Kind::Date),
        Attribute::new("clientId", "client_id", Kind::Long),
        Attribute::new("client", "client_id", Kind::Relation { target: &CLIENT_SCHEMA, via: "clientId" }),
        Attribute::new("createdAt", "created_at", Kind::DateTime),
    ],
};

impl Entity for Project {
    fn schema() -> &'static EntitySchema {
        &PROJECT_SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub hourly_rate: f64,
    pub budget: Option<f64>,
    pub billable: bool,
    pub start_date: NaiveDate,
    pub deadline: Option<NaiveDate>,
    pub client_id: i64,
}

impl From<Project> for ProjectDto {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            status: project.status,
            hourly_rate: project.hourly_rate,
            budget: project.budget,
            billable: project.billable,
            start_date: project.start_date,
            deadline: project.deadline,
            client_id: project.client_id,
        }
    }
}

/// Canned project predicates for callers that do not go through a query string.
pub mod specs {
    use chrono::NaiveDate;

    use super::{ProjectStatus, PROJECT_SCHEMA};
    use crate::filter::{AttributePath, FilterError, Predicate, ResolvedAttribute, TypedValue};

    fn attr(name: &str) -> Result<ResolvedAttribute, FilterError> {
        PROJECT_SCHEMA.resolve_scalar(&AttributePath::single(name))
    }

    pub fn belongs_to_client(client_id: i64) -> Result<Predicate, FilterError> {
        Ok(Predicate::Eq { attr: attr("clientId")?, value: TypedValue::Long(client_id) })
    }

    pub fn has_status(status: ProjectStatus) -> Result<Predicate, FilterError> {
        Ok(Predicate::Eq { attr: attr("status")?, value: TypedValue::Enum(status.as_str().to_string()) })
    }

    pub fn is_billable(billable: bool) -> Result<Predicate, FilterError> {
        Ok(Predicate::Eq { attr: attr("billable")?, value: TypedValue::Bool(billable) })
    }

    /// Projects with a deadline strictly before `date`; no deadline never matches.
    pub fn deadline_before(date: NaiveDate) -> Result<Predicate, FilterError> {
        Ok(Predicate::Lt { attr: attr("deadline")?, value: TypedValue::Date(date) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::filter::eval;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn project(id: i64, status: ProjectStatus, billable: bool, deadline: Option<&str>, client_id: i64) -> Project {
        Project {
            id,
            name: format!("Project {}", id),
            description: None,
            status: status.to_string(),
            hourly_rate: 80.0,
            budget: None,
            billable,
            start_date: date("2025-01-01"),
            deadline: deadline.map(date),
            client_id,
            created_at: date("2025-01-01").and_hms_opt(9, 0, 0).unwrap(),
        }
    }

    fn projects() -> Vec<Project> {
        vec![
            project(1, ProjectStatus::Active, true, Some("2025-03-01"), 1),
            project(2, ProjectStatus::OnHold, false, None, 1),
            project(3, ProjectStatus::Active, false, Some("2025-06-01"), 2),
        ]
    }

    fn matching(predicate: &crate::filter::Predicate) -> Vec<i64> {
        let store = MemoryStore::new();
        projects()
            .into_iter()
            .filter(|p| {
                let row = serde_json::to_value(p).unwrap();
                eval::matches(predicate, row.as_object().unwrap(), &store)
            })
            .map(|p| p.id)
            .collect()
    }

    #[test]
    fn status_names_match_serde() {
        for status in [ProjectStatus::Active, ProjectStatus::OnHold, ProjectStatus::Completed, ProjectStatus::Cancelled] {
            assert_eq!(serde_json::to_value(status).unwrap(), serde_json::json!(status.as_str()));
            assert!(ProjectStatus::NAMES.contains(&status.as_str()));
        }
    }

    #[test]
    fn helpers_select_expected_projects() {
        assert_eq!(matching(&specs::belongs_to_client(1).unwrap()), vec![1, 2]);
        assert_eq!(matching(&specs::has_status(ProjectStatus::Active).unwrap()), vec![1, 3]);
        assert_eq!(matching(&specs::is_billable(false).unwrap()), vec![2, 3]);
        assert_eq!(matching(&specs::deadline_before(date("2025-04-01")).unwrap()), vec![1]);
    }

    #[test]
    fn helpers_compose_with_and() {
        let predicate = specs::belongs_to_client(1)
            .unwrap()
            .and(specs::has_status(ProjectStatus::Active).unwrap());
        assert_eq!(matching(&predicate), vec![1]);
    }
}
