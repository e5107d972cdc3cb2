// src/web/event_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::event::{Event, NewEvent, NewEventPayload},
    services::event_service,
    state::AppState,
    web::{
        extract::{required_text, ApiJson},
        mw_semester::SemesterScope,
    },
};
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
) -> AppResult<Json<Vec<Event>>> {
    Ok(Json(event_service::list_events(&state.db_pool, &scope.semester_id).await?))
}

// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
) -> AppResult<Json<Event>> {
    event_service::find_event(&state.db_pool, &id, &scope.semester_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Evento não encontrado.".into()))
}

// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    ApiJson(payload): ApiJson<NewEventPayload>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let (Some(titulo), Some(date)) = (required_text(payload.title), required_text(payload.date)) else {
        return Err(AppError::BadRequest("Título e data são obrigatórios.".into()));
    };
    let data = event_service::parse_event_date(&date)?;

    let event = event_service::create_event(
        &state.db_pool,
        NewEvent {
            titulo,
            descricao: payload.description.map(|d| d.trim().to_string()).unwrap_or_default(),
            data,
            semester_id: scope.semester_id,
            created_by: scope.user_id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

// DELETE /api/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let event = event_service::find_event(&state.db_pool, &id, &scope.semester_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Evento não encontrado.".into()))?;

    if !scope.can_manage(event.created_by.as_deref()) {
        return Err(AppError::Forbidden("Apenas o criador ou um administrador pode excluir este evento.".into()));
    }
    event_service::delete_event(&state.db_pool, &id).await?;
    Ok(Json(json!({ "message": "Evento excluído com sucesso!" })))
}
