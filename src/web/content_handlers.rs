// src/web/content_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::content::{ContentSummary, ContentType, NewContent, RenameContentPayload},
    services::{content_service, folder_service},
    state::AppState,
    web::{
        extract::{required_text, ApiJson},
        mw_semester::SemesterScope,
    },
};
use axum::{
    extract::{multipart::MultipartRejection, Extension, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

#[derive(Default)]
struct UploadForm {
    titulo: Option<String>,
    tipo: Option<String>,
    folder_id: Option<String>,
    arquivo: Option<(String, Vec<u8>)>,
}

async fn read_upload_form(mut multipart: Multipart, max_bytes: usize) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "nomeConteudo" => form.titulo = Some(field.text().await?),
            "tipoArquivo" => form.tipo = Some(field.text().await?),
            "folderId" => form.folder_id = Some(field.text().await?),
            "arquivo" => {
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_ascii_lowercase();
                let bytes = field.bytes().await?;
                if bytes.len() > max_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "O arquivo excede o limite de {} bytes.",
                        max_bytes
                    )));
                }
                form.arquivo = Some((mime, bytes.to_vec()));
            }
            other => tracing::debug!("Campo multipart ignorado: {}", other),
        }
    }
    Ok(form)
}

// POST /api/contents (admin, multipart)
pub async fn upload_content(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ContentSummary>)> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(format!("Formulário inválido: {}", e.body_text())))?;
    let form = read_upload_form(multipart, state.config.max_upload_bytes).await?;

    let (Some(titulo), Some(tipo), Some(folder_id), Some((mime_type, bytes))) = (
        required_text(form.titulo),
        required_text(form.tipo),
        required_text(form.folder_id),
        form.arquivo.filter(|(_, bytes)| !bytes.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Campos obrigatórios: nomeConteudo, tipoArquivo, folderId e arquivo.".into(),
        ));
    };

    let tipo: ContentType = tipo.parse().map_err(|_| {
        let aceites: Vec<&str> = ContentType::ALL.iter().map(ContentType::as_str).collect();
        AppError::BadRequest(format!("Tipo de arquivo inválido. Tipos aceitos: {}", aceites.join(", ")))
    })?;
    if !tipo.accepts_mime(&mime_type) {
        return Err(AppError::BadRequest(format!(
            "Arquivo '{}' não corresponde ao tipo {}. Tipos aceitos: {}",
            mime_type,
            tipo,
            tipo.accepted_mime_types().join(", ")
        )));
    }

    folder_service::find_folder_in_semester(&state.db_pool, &folder_id, &scope.semester_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pasta não encontrada.".into()))?;

    let content = content_service::create_content(
        &state.db_pool,
        NewContent {
            titulo,
            tipo,
            mime_type,
            folder_id,
            created_by: scope.user_id,
            bytes,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(content)))
}

/// `Content-Disposition` com nome ASCII de recurso e `filename*` em UTF-8.
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(file_name)
    )
}

// GET /api/contents/{id}
pub async fn download_content(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let (content, bytes) = content_service::load_content_payload(&state.db_pool, &id, &scope.semester_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Conteúdo não encontrado.".into()))?;

    tracing::debug!("Download de '{}' ({} bytes)", content.id, bytes.len());
    Ok((
        [
            (header::CONTENT_TYPE, content.mime_type.clone()),
            (header::CONTENT_DISPOSITION, content_disposition(&content.download_file_name())),
        ],
        bytes,
    )
        .into_response())
}

// PUT /api/contents/{id} (admin)
pub async fn rename_content(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<RenameContentPayload>,
) -> AppResult<Json<Value>> {
    let titulo = required_text(payload.titulo)
        .ok_or_else(|| AppError::BadRequest("O título do conteúdo é obrigatório.".into()))?;
    let content = content_service::rename_content(&state.db_pool, &id, &scope.semester_id, &titulo).await?;
    Ok(Json(json!({ "message": "Conteúdo atualizado com sucesso!", "content": content })))
}

// DELETE /api/contents/{id} (admin)
pub async fn delete_content(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    content_service::delete_content(&state.db_pool, &id, &scope.semester_id).await?;
    Ok(Json(json!({ "message": "Conteúdo excluído com sucesso!" })))
}
