// src/web/quiz_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::quiz::{NewQuiz, NewQuizPayload, QuizListQuery, QuizResult, QuizView, RenameQuizPayload, SubmitAnswersPayload},
    services::{quiz_service, subject_service},
    state::AppState,
    web::{
        extract::{required_text, ApiJson, ApiQuery},
        mw_semester::SemesterScope,
    },
};
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

// GET /api/quizzes?subjectId=
pub async fn list_quizzes(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    ApiQuery(query): ApiQuery<QuizListQuery>,
) -> AppResult<Json<Vec<QuizView>>> {
    let subject_id = required_text(query.subject_id);
    let quizzes = quiz_service::list_quizzes(&state.db_pool, &scope.semester_id, subject_id.as_deref()).await?;
    Ok(Json(quizzes))
}

// GET /api/quizzes/{id}
pub async fn get_quiz(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
) -> AppResult<Json<QuizView>> {
    quiz_service::get_quiz(&state.db_pool, &id, &scope.semester_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Simulado não encontrado.".into()))
}

// POST /api/quizzes (admin)
pub async fn create_quiz(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    ApiJson(payload): ApiJson<NewQuizPayload>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let (Some(titulo), Some(descricao)) = (required_text(payload.titulo), required_text(payload.descricao)) else {
        return Err(AppError::BadRequest("Campos obrigatórios estão faltando.".into()));
    };
    let perguntas = quiz_service::validate_questions(payload.perguntas.unwrap_or_default())?;
    let subject_id =
        subject_service::resolve_optional_subject(&state.db_pool, payload.subject_id.as_deref(), &scope.semester_id)
            .await?;

    let quiz = quiz_service::create_quiz(
        &state.db_pool,
        NewQuiz {
            titulo,
            descricao,
            subject_id,
            semester_id: scope.semester_id,
            created_by: scope.user_id,
            perguntas,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "quiz": quiz }))))
}

// PUT /api/quizzes/{id} (admin)
pub async fn rename_quiz(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<RenameQuizPayload>,
) -> AppResult<Json<QuizView>> {
    let titulo = required_text(payload.titulo)
        .ok_or_else(|| AppError::BadRequest("O título do simulado é obrigatório.".into()))?;
    Ok(Json(quiz_service::rename_quiz(&state.db_pool, &id, &scope.semester_id, &titulo).await?))
}

// DELETE /api/quizzes/{id} (admin)
pub async fn delete_quiz(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    quiz_service::delete_quiz(&state.db_pool, &id, &scope.semester_id).await?;
    Ok(Json(json!({ "message": "Simulado excluído com sucesso!" })))
}

// POST /api/quizzes/{id}/answers
pub async fn submit_answers(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<SubmitAnswersPayload>,
) -> AppResult<Json<QuizResult>> {
    let result = quiz_service::submit_answers(
        &state.db_pool,
        &id,
        &scope.semester_id,
        &scope.user_id,
        &payload.respostas,
    )
    .await?;
    Ok(Json(result))
}
