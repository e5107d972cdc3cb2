// src/web/qanda_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::qanda::{AnswerRow, NewAnswerPayload, NewQuestionPayload, QuestionListQuery, QuestionWithAnswers},
    services::{qanda_service, subject_service},
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

fn question_not_found() -> AppError {
    AppError::NotFound("Pergunta não encontrada.".into())
}

// GET /api/qanda?userId=
pub async fn list_questions(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    ApiQuery(query): ApiQuery<QuestionListQuery>,
) -> AppResult<Json<Vec<QuestionWithAnswers>>> {
    let user_id = required_text(query.user_id);
    let questions = qanda_service::list_questions(&state.db_pool, &scope.semester_id, user_id.as_deref()).await?;
    Ok(Json(questions))
}

// GET /api/qanda/{id}
pub async fn get_question(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
) -> AppResult<Json<QuestionWithAnswers>> {
    qanda_service::get_question(&state.db_pool, &id, &scope.semester_id)
        .await?
        .map(Json)
        .ok_or_else(question_not_found)
}

// POST /api/qanda
pub async fn create_question(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    ApiJson(payload): ApiJson<NewQuestionPayload>,
) -> AppResult<(StatusCode, Json<QuestionWithAnswers>)> {
    let pergunta =
        required_text(payload.pergunta).ok_or_else(|| AppError::BadRequest("A pergunta é obrigatória.".into()))?;
    let subject_id =
        subject_service::resolve_optional_subject(&state.db_pool, payload.subject_id.as_deref(), &scope.semester_id)
            .await?;

    let question = qanda_service::create_question(
        &state.db_pool,
        &scope.semester_id,
        &scope.user_id,
        &pergunta,
        subject_id.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

// POST /api/qanda/{id}/answers
pub async fn add_answer(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<NewAnswerPayload>,
) -> AppResult<(StatusCode, Json<AnswerRow>)> {
    let resposta =
        required_text(payload.resposta).ok_or_else(|| AppError::BadRequest("A resposta é obrigatória.".into()))?;
    let answer = qanda_service::add_answer(&state.db_pool, &id, &scope.semester_id, &scope.user_id, &resposta).await?;
    Ok((StatusCode::CREATED, Json(answer)))
}

// DELETE /api/qanda/{id}
pub async fn delete_question(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let question = qanda_service::get_question(&state.db_pool, &id, &scope.semester_id)
        .await?
        .ok_or_else(question_not_found)?;

    if !scope.can_manage(Some(&question.question.user_id)) {
        return Err(AppError::Forbidden("Apenas o autor ou um administrador pode excluir esta pergunta.".into()));
    }
    qanda_service::delete_question(&state.db_pool, &id).await?;
    Ok(Json(json!({ "message": "Pergunta excluída com sucesso!" })))
}

// DELETE /api/qanda/{id}/answers/{answer_id}
pub async fn delete_answer(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path((id, answer_id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    let answer = qanda_service::find_answer(&state.db_pool, &answer_id, &id, &scope.semester_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resposta não encontrada.".into()))?;

    if !scope.can_manage(Some(&answer.autor_id)) {
        return Err(AppError::Forbidden("Apenas o autor ou um administrador pode excluir esta resposta.".into()));
    }
    qanda_service::delete_answer(&state.db_pool, &answer_id).await?;
    Ok(Json(json!({ "message": "Resposta excluída com sucesso!" })))
}
