// src/models/folder.rs
use crate::models::content::ContentSummary;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub semester_id: String,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Pasta com o nome do criador, lida com LEFT JOIN em `users`.
#[derive(Debug, Clone, FromRow)]
pub struct FolderRow {
    #[sqlx(flatten)]
    pub folder: Folder,
    pub criador: Option<String>,
}

/// Pasta devolvida pela API, já com os conteúdos (sem o ficheiro em si).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderWithContents {
    #[serde(flatten)]
    pub folder: Folder,
    pub criador: Option<String>,
    pub contents: Vec<ContentSummary>,
}

#[derive(Debug, Deserialize)]
pub struct FolderPayload {
    #[serde(default)]
    pub name: Option<String>,
}
