use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Entity;
use crate::filter::{Attribute, EntitySchema, Kind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

pub static CLIENT_SCHEMA: EntitySchema = EntitySchema {
    name: "client",
    table: "clients",
    attributes: &[
        Attribute::new("id", "id", Kind::Long),
        Attribute::new("name", "name", Kind::String),
        Attribute::new("email", "email", Kind::String),
        Attribute::new("company", "company", Kind::String),
        Attribute::new("active", "active", Kind::Bool),
        Attribute::new("createdAt", "created_at", Kind::DateTime),
    ],
};

impl Entity for Client {
    fn schema() -> &'static EntitySchema {
        &CLIENT_SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl From<Client> for ClientDto {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            email: client.email,
            company: client.company,
            active: client.active,
            created_at: client.created_at,
        }
    }
}
