use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Entity;
use crate::domain::project::PROJECT_SCHEMA;
use crate::filter::{Attribute, EntitySchema, Kind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: i64,
    pub description: String,
    pub minutes: i32,
    pub hours: f32,
    pub billable: bool,
    pub work_date: NaiveDate,
    pub started_at: NaiveDateTime,
    pub project_id: i64,
}

pub static TIME_ENTRY_SCHEMA: EntitySchema = EntitySchema {
    name: "timeEntry",
    table: "time_entries",
    attributes: &[
        Attribute::new("id", "id", Kind::Long),
        Attribute::new("description", "description", Kind::String),
        Attribute::new("minutes", "minutes", Kind::Integer),
        Attribute::new("hours", "hours", Kind::Float),
        Attribute::new("billable", "billable", Kind::Bool),
        Attribute::new("workDate", "work_date", Kind::Date),
        Attribute::new("startedAt", "started_at", Kind::DateTime),
        Attribute::new("projectId", "project_id", Kind::Long),
        Attribute::new("project", "project_id", Kind::Relation { target: &PROJECT_SCHEMA, via: "projectId" }),
    ],
};

impl Entity for TimeEntry {
    fn schema() -> &'static EntitySchema {
        &TIME_ENTRY_SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryDto {
    pub id: i64,
    pub description: String,
    pub minutes: i32,
    pub hours: f32,
    pub billable: bool,
    pub work_date: NaiveDate,
    pub started_at: NaiveDateTime,
    pub project_id: i64,
}

impl From<TimeEntry> for TimeEntryDto {
    fn from(entry: TimeEntry) -> Self {
        Self {
            id: entry.id,
            description: entry.description,
            minutes: entry.minutes,
            hours: entry.hours,
            billable: entry.billable,
            work_date: entry.work_date,
            started_at: entry.started_at,
            project_id: entry.project_id,
        }
    }
}
