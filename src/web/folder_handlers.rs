// src/web/folder_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::folder::{Folder, FolderPayload, FolderWithContents},
    services::folder_service,
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

fn folder_name(payload: FolderPayload) -> AppResult<String> {
    required_text(payload.name).ok_or_else(|| AppError::BadRequest("O nome da pasta é obrigatório.".into()))
}

// GET /api/folders
pub async fn list_folders(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
) -> AppResult<Json<Vec<FolderWithContents>>> {
    Ok(Json(folder_service::list_folders(&state.db_pool, &scope.semester_id).await?))
}

// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
) -> AppResult<Json<FolderWithContents>> {
    folder_service::get_folder_details(&state.db_pool, &id, &scope.semester_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Pasta não encontrada.".into()))
}

// POST /api/folders (admin)
pub async fn create_folder(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    ApiJson(payload): ApiJson<FolderPayload>,
) -> AppResult<(StatusCode, Json<Folder>)> {
    let name = folder_name(payload)?;
    let folder = folder_service::create_folder(&state.db_pool, &scope.semester_id, &name, &scope.user_id).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

// PUT /api/folders/{id} (admin)
pub async fn rename_folder(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<FolderPayload>,
) -> AppResult<Json<Value>> {
    let name = folder_name(payload)?;
    let folder = folder_service::rename_folder(&state.db_pool, &id, &scope.semester_id, &name).await?;
    Ok(Json(json!({ "message": "Pasta atualizada com sucesso!", "folder": folder })))
}

// DELETE /api/folders/{id} (admin)
pub async fn delete_folder(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    folder_service::delete_folder(&state.db_pool, &id, &scope.semester_id).await?;
    Ok(Json(json!({ "message": "Pasta excluída com sucesso!" })))
}
