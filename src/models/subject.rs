// src/models/subject.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Matéria de um semestre.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub nome: String,
    pub semester_id: String,
}

#[derive(Debug, Deserialize)]
pub struct NewSubjectPayload {
    #[serde(default)]
    pub nome: Option<String>,
}
