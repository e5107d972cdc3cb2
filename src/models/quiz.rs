// src/models/quiz.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

/// Número fixo de alternativas por pergunta.
pub const ALTERNATIVAS_POR_PERGUNTA: usize = 4;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub titulo: String,
    pub descricao: String,
    pub subject_id: Option<String>,
    pub semester_id: String,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Quiz com os nomes da matéria e do criador (LEFT JOIN).
#[derive(Debug, Clone, FromRow)]
pub struct QuizRow {
    #[sqlx(flatten)]
    pub quiz: Quiz,
    pub subject_nome: Option<String>,
    pub criador: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct QuizQuestion {
    pub id: String,
    pub quiz_id: String,
    pub posicao: i64,
    pub enunciado: String,
    pub alternativas: Json<Vec<String>>,
    pub resposta_correta: String,
}

/// Pergunta exposta ao aluno; a resposta correta só aparece no detalhe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub posicao: i64,
    pub enunciado: String,
    pub alternativas: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resposta_correta: Option<String>,
}

impl QuestionView {
    pub fn from_question(question: QuizQuestion, with_answer: bool) -> Self {
        Self {
            id: question.id,
            posicao: question.posicao,
            enunciado: question.enunciado,
            alternativas: question.alternativas.0,
            resposta_correta: with_answer.then_some(question.resposta_correta),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub subject: Option<String>,
    pub criador: Option<String>,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Deserialize)]
pub struct NewQuestionPayload {
    #[serde(default)]
    pub enunciado: Option<String>,
    #[serde(default)]
    pub alternativas: Option<Vec<String>>,
    #[serde(default)]
    pub correta: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuizPayload {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub perguntas: Option<Vec<NewQuestionPayload>>,
}

#[derive(Debug, Deserialize)]
pub struct RenameQuizPayload {
    #[serde(default)]
    pub titulo: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizListQuery {
    pub subject_id: Option<String>,
}

/// Pergunta validada para inserção.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub enunciado: String,
    pub alternativas: Vec<String>,
    pub correta: String,
}

#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub titulo: String,
    pub descricao: String,
    pub subject_id: Option<String>,
    pub semester_id: String,
    pub created_by: String,
    pub perguntas: Vec<NewQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub resposta: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswersPayload {
    #[serde(default)]
    pub respostas: Vec<SubmittedAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub quiz_id: String,
    pub acertos: i64,
    pub erros: i64,
    pub total: i64,
    pub percentual: f64,
}
