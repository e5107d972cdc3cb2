// src/models/qanda.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Pergunta do fórum com os nomes do autor e da matéria.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRow {
    pub id: String,
    pub pergunta: String,
    pub user_id: String,
    pub autor: String,
    pub subject_id: Option<String>,
    pub subject: Option<String>,
    pub semester_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRow {
    pub id: String,
    pub conteudo: String,
    pub pergunta_id: String,
    pub autor_id: String,
    pub autor: String,
    pub data_resposta: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionWithAnswers {
    #[serde(flatten)]
    pub question: QuestionRow,
    pub respostas: Vec<AnswerRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestionPayload {
    #[serde(default)]
    pub pergunta: Option<String>,
    #[serde(default)]
    pub subject_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewAnswerPayload {
    #[serde(default)]
    pub resposta: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionListQuery {
    pub user_id: Option<String>,
}
