use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::database::Entity;
use crate::domain::client::CLIENT_SCHEMA;
use crate::domain::project::PROJECT_SCHEMA;
use crate::filter::{Attribute, EntitySchema, Kind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub const NAMES: &'static [&'static str] = &["DRAFT", "SENT", "PAID", "OVERDUE", "CANCELLED"];

    /// Sent but not settled.
    pub const OUTSTANDING: &'static [InvoiceStatus] = &[InvoiceStatus::Sent, InvoiceStatus::Overdue];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Sent => "SENT",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
            InvoiceStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i64,
    pub number: String,
    pub status: String,
    pub amount: f64,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub client_id: i64,
    pub project_id: Option<i64>,
    pub created_at: NaiveDate,
}

pub static INVOICE_SCHEMA: EntitySchema = EntitySchema {
    name: "invoice",
    table: "invoices",
    attributes: &[
        Attribute::new("id", "id", Kind::Long),
        Attribute::new("number", "number", Kind::String),
        Attribute::new("status", "status", Kind::Enum(InvoiceStatus::NAMES)),
        Attribute::new("amount", "amount", Kind::Double),
        Attribute::new("issueDate", "issue_date", Kind::Date),
        Attribute::new("dueDate", "due_date", Kind::Date),
        Attribute::new("clientId", "client_id", Kind::Long),
        Attribute::new("client", "client_id", Kind::Relation { target: &CLIENT_SCHEMA, via: "clientId" }),
        Attribute::new("projectId", "project_id", Kind::Long),
        Attribute::new("project", "project_id", Kind::Relation { target: &PROJECT_SCHEMA, via: "projectId" }),
        Attribute::new("createdAt", "created_at", Kind::Date),
    ],
};

impl Entity for Invoice {
    fn schema() -> &'static EntitySchema {
        &INVOICE_SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub id: i64,
    pub number: String,
    pub status: String,
    pub amount: f64,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub client_id: i64,
    pub project_id: Option<i64>,
}

impl From<Invoice> for InvoiceDto {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            number: invoice.number,
            status: invoice.status,
            amount: invoice.amount,
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            client_id: invoice.client_id,
            project_id: invoice.project_id,
        }
    }
}

pub mod specs {
    use chrono::NaiveDate;

    use super::{InvoiceStatus, INVOICE_SCHEMA};
    use crate::filter::{AttributePath, FilterError, Predicate, ResolvedAttribute, TypedValue};

    fn attr(name: &str) -> Result<ResolvedAttribute, FilterError> {
        INVOICE_SCHEMA.resolve_scalar(&AttributePath::single(name))
    }

    pub fn belongs_to_client(client_id: i64) -> Result<Predicate, FilterError> {
        Ok(Predicate::Eq { attr: attr("clientId")?, value: TypedValue::Long(client_id) })
    }

    pub fn has_status(status: InvoiceStatus) -> Result<Predicate, FilterError> {
        Ok(Predicate::Eq { attr: attr("status")?, value: TypedValue::Enum(status.as_str().to_string()) })
    }

    pub fn has_any_status(statuses: &[InvoiceStatus]) -> Result<Predicate, FilterError> {
        let values = statuses.iter().map(|s| s.as_str().to_string()).collect();
        Ok(Predicate::In { attr: attr("status")?, values })
    }

    pub fn amount_above(amount: f64) -> Result<Predicate, FilterError> {
        Ok(Predicate::Gt { attr: attr("amount")?, value: TypedValue::Double(amount) })
    }

    pub fn due_before(date: NaiveDate) -> Result<Predicate, FilterError> {
        Ok(Predicate::Lt { attr: attr("dueDate")?, value: TypedValue::Date(date) })
    }
}
