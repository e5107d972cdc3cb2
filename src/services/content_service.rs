// src/services/content_service.rs
use crate::{
    error::{AppError, AppResult},
    models::content::{ContentSummary, NewContent},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sqlx::SqlitePool;
use uuid::Uuid;

// Colunas de metadados; `dados` só é lido no download.
const SUMMARY_COLUMNS: &str =
    "c.id, c.titulo, c.descricao, c.tipo, c.mime_type, c.tamanho, c.folder_id, c.created_by, c.created_at";

/// Todos os conteúdos das pastas de um semestre.
pub async fn list_contents_for_semester(db_pool: &SqlitePool, semester_id: &str) -> AppResult<Vec<ContentSummary>> {
    let contents = sqlx::query_as::<_, ContentSummary>(&format!(
        r#"
        SELECT {SUMMARY_COLUMNS}
        FROM contents c
        JOIN folders f ON f.id = c.folder_id
        WHERE f.semester_id = ?1
        ORDER BY c.created_at ASC, c.rowid ASC
        "#
    ))
    .bind(semester_id)
    .fetch_all(db_pool)
    .await?;
    Ok(contents)
}

pub async fn list_contents_for_folder(db_pool: &SqlitePool, folder_id: &str) -> AppResult<Vec<ContentSummary>> {
    let contents = sqlx::query_as::<_, ContentSummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM contents c WHERE c.folder_id = ?1 ORDER BY c.created_at ASC, c.rowid ASC"
    ))
    .bind(folder_id)
    .fetch_all(db_pool)
    .await?;
    Ok(contents)
}

pub async fn find_content_in_semester(
    db_pool: &SqlitePool,
    content_id: &str,
    semester_id: &str,
) -> AppResult<Option<ContentSummary>> {
    let content = sqlx::query_as::<_, ContentSummary>(&format!(
        r#"
        SELECT {SUMMARY_COLUMNS}
        FROM contents c
        JOIN folders f ON f.id = c.folder_id
        WHERE c.id = ?1 AND f.semester_id = ?2
        "#
    ))
    .bind(content_id)
    .bind(semester_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(content)
}

/// Grava o ficheiro (em base64) e devolve os metadados.
pub async fn create_content(db_pool: &SqlitePool, new_content: NewContent) -> AppResult<ContentSummary> {
    let id = Uuid::new_v4().to_string();
    let descricao = format!("Arquivo de tipo: {}", new_content.tipo);
    let tamanho = new_content.bytes.len() as i64;
    let dados = STANDARD.encode(&new_content.bytes);

    sqlx::query(
        r#"
        INSERT INTO contents (id, titulo, descricao, tipo, mime_type, tamanho, dados, folder_id, created_by)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&id)
    .bind(&new_content.titulo)
    .bind(&descricao)
    .bind(new_content.tipo)
    .bind(&new_content.mime_type)
    .bind(tamanho)
    .bind(dados)
    .bind(&new_content.folder_id)
    .bind(&new_content.created_by)
    .execute(db_pool)
    .await?;

    tracing::info!(
        "📄 Conteúdo '{}' ({}, {} bytes) criado na pasta {}.",
        new_content.titulo,
        new_content.tipo,
        tamanho,
        new_content.folder_id
    );

    sqlx::query_as::<_, ContentSummary>(&format!("SELECT {SUMMARY_COLUMNS} FROM contents c WHERE c.id = ?1"))
        .bind(&id)
        .fetch_optional(db_pool)
        .await?
        .ok_or(AppError::InternalServerError)
}

/// Metadados mais o ficheiro descodificado.
pub async fn load_content_payload(
    db_pool: &SqlitePool,
    content_id: &str,
    semester_id: &str,
) -> AppResult<Option<(ContentSummary, Vec<u8>)>> {
    let Some(summary) = find_content_in_semester(db_pool, content_id, semester_id).await? else {
        return Ok(None);
    };

    let dados: String = sqlx::query_scalar("SELECT dados FROM contents WHERE id = ?1")
        .bind(content_id)
        .fetch_one(db_pool)
        .await?;

    let bytes = STANDARD.decode(dados.as_bytes()).map_err(|e| {
        tracing::error!("Conteúdo '{}' com base64 inválido: {}", content_id, e);
        AppError::InternalServerError
    })?;
    Ok(Some((summary, bytes)))
}

pub async fn rename_content(
    db_pool: &SqlitePool,
    content_id: &str,
    semester_id: &str,
    titulo: &str,
) -> AppResult<ContentSummary> {
    let rows_affected = sqlx::query(
        r#"
        UPDATE contents SET titulo = ?1
        WHERE id = ?2 AND folder_id IN (SELECT id FROM folders WHERE semester_id = ?3)
        "#,
    )
    .bind(titulo)
    .bind(content_id)
    .bind(semester_id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound("Conteúdo não encontrado.".into()));
    }
    find_content_in_semester(db_pool, content_id, semester_id)
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn delete_content(db_pool: &SqlitePool, content_id: &str, semester_id: &str) -> AppResult<()> {
    let rows_affected = sqlx::query(
        "DELETE FROM contents WHERE id = ?1 AND folder_id IN (SELECT id FROM folders WHERE semester_id = ?2)",
    )
    .bind(content_id)
    .bind(semester_id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound("Conteúdo não encontrado.".into()));
    }
    tracing::info!("🗑️ Conteúdo '{}' excluído.", content_id);
    Ok(())
}
