// src/services/folder_service.rs
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::{
        content::ContentSummary,
        folder::{Folder, FolderRow, FolderWithContents},
    },
    services::content_service,
};
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

const FOLDER_SELECT: &str = r#"
    SELECT f.id, f.name, f.semester_id, f.created_by, f.created_at, f.updated_at, u.nome AS criador
    FROM folders f
    LEFT JOIN users u ON u.id = f.created_by
"#;

/// Pastas do semestre, mais recentes primeiro, com os respetivos conteúdos.
pub async fn list_folders(db_pool: &SqlitePool, semester_id: &str) -> AppResult<Vec<FolderWithContents>> {
    let rows = sqlx::query_as::<_, FolderRow>(&format!(
        "{FOLDER_SELECT} WHERE f.semester_id = ?1 ORDER BY f.created_at DESC, f.rowid DESC"
    ))
    .bind(semester_id)
    .fetch_all(db_pool)
    .await?;

    let mut by_folder: HashMap<String, Vec<ContentSummary>> = HashMap::new();
    for content in content_service::list_contents_for_semester(db_pool, semester_id).await? {
        by_folder.entry(content.folder_id.clone()).or_default().push(content);
    }

    let folders: Vec<FolderWithContents> = rows
        .into_iter()
        .map(|row| FolderWithContents {
            contents: by_folder.remove(&row.folder.id).unwrap_or_default(),
            folder: row.folder,
            criador: row.criador,
        })
        .collect();

    tracing::debug!("Encontradas {} pastas no semestre {}.", folders.len(), semester_id);
    Ok(folders)
}

pub async fn find_folder_in_semester(
    db_pool: &SqlitePool,
    folder_id: &str,
    semester_id: &str,
) -> AppResult<Option<Folder>> {
    let folder = sqlx::query_as::<_, Folder>(
        r#"
        SELECT id, name, semester_id, created_by, created_at, updated_at
        FROM folders WHERE id = ?1 AND semester_id = ?2
        "#,
    )
    .bind(folder_id)
    .bind(semester_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(folder)
}

pub async fn get_folder_details(
    db_pool: &SqlitePool,
    folder_id: &str,
    semester_id: &str,
) -> AppResult<Option<FolderWithContents>> {
    let row = sqlx::query_as::<_, FolderRow>(&format!("{FOLDER_SELECT} WHERE f.id = ?1 AND f.semester_id = ?2"))
        .bind(folder_id)
        .bind(semester_id)
        .fetch_optional(db_pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let contents = content_service::list_contents_for_folder(db_pool, folder_id).await?;
    Ok(Some(FolderWithContents {
        folder: row.folder,
        criador: row.criador,
        contents,
    }))
}

async fn name_taken(db_pool: &SqlitePool, semester_id: &str, name: &str, except_id: Option<&str>) -> AppResult<bool> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM folders WHERE semester_id = ?1 AND name = ?2 AND id <> COALESCE(?3, ''))",
    )
    .bind(semester_id)
    .bind(name)
    .bind(except_id)
    .fetch_one(db_pool)
    .await?;
    Ok(taken)
}

fn duplicate_name() -> AppError {
    AppError::Conflict("Já existe uma pasta com este nome no semestre selecionado.".into())
}

pub async fn create_folder(db_pool: &SqlitePool, semester_id: &str, name: &str, created_by: &str) -> AppResult<Folder> {
    if name_taken(db_pool, semester_id, name, None).await? {
        return Err(duplicate_name());
    }

    let id = Uuid::new_v4().to_string();
    let result = sqlx::query("INSERT INTO folders (id, name, semester_id, created_by) VALUES (?1, ?2, ?3, ?4)")
        .bind(&id)
        .bind(name)
        .bind(semester_id)
        .bind(created_by)
        .execute(db_pool)
        .await;

    match result {
        // Corrida entre a verificação e o INSERT
        Err(e) if is_unique_violation(&e) => return Err(duplicate_name()),
        other => {
            other?;
        }
    }

    tracing::info!("📁 Nova pasta criada: {} - {}", id, name);
    find_folder_in_semester(db_pool, &id, semester_id)
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn rename_folder(db_pool: &SqlitePool, folder_id: &str, semester_id: &str, name: &str) -> AppResult<Folder> {
    if find_folder_in_semester(db_pool, folder_id, semester_id).await?.is_none() {
        return Err(AppError::NotFound("Pasta não encontrada.".into()));
    }
    if name_taken(db_pool, semester_id, name, Some(folder_id)).await? {
        return Err(duplicate_name());
    }

    let result = sqlx::query("UPDATE folders SET name = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2")
        .bind(name)
        .bind(folder_id)
        .execute(db_pool)
        .await;
    match result {
        Err(e) if is_unique_violation(&e) => return Err(duplicate_name()),
        other => {
            other?;
        }
    }

    tracing::info!("✏️ Pasta '{}' renomeada para '{}'.", folder_id, name);
    find_folder_in_semester(db_pool, folder_id, semester_id)
        .await?
        .ok_or(AppError::InternalServerError)
}

/// Exclui a pasta; os conteúdos saem em cascata.
pub async fn delete_folder(db_pool: &SqlitePool, folder_id: &str, semester_id: &str) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM folders WHERE id = ?1 AND semester_id = ?2")
        .bind(folder_id)
        .bind(semester_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound("Pasta não encontrada.".into()));
    }
    tracing::info!("🗑️ Pasta '{}' excluída com os seus conteúdos.", folder_id);
    Ok(())
}
