// src/models/event.rs
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub titulo: String,
    pub descricao: String,
    pub data: DateTime<Utc>,
    pub semester_id: String,
    pub created_by: Option<String>,
    pub criador: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct NewEventPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub titulo: String,
    pub descricao: String,
    pub data: DateTime<Utc>,
    pub semester_id: String,
    pub created_by: String,
}
