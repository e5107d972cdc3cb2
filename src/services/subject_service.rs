// src/services/subject_service.rs
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::subject::Subject,
};
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn list_subjects(db_pool: &SqlitePool, semester_id: &str) -> AppResult<Vec<Subject>> {
    let subjects = sqlx::query_as::<_, Subject>(
        "SELECT id, nome, semester_id FROM subjects WHERE semester_id = ?1 ORDER BY nome ASC",
    )
    .bind(semester_id)
    .fetch_all(db_pool)
    .await?;
    Ok(subjects)
}

/// Busca uma matéria, mas só se pertencer ao semestre indicado.
pub async fn find_subject_in_semester(
    db_pool: &SqlitePool,
    subject_id: &str,
    semester_id: &str,
) -> AppResult<Option<Subject>> {
    let subject = sqlx::query_as::<_, Subject>(
        "SELECT id, nome, semester_id FROM subjects WHERE id = ?1 AND semester_id = ?2",
    )
    .bind(subject_id)
    .bind(semester_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(subject)
}

/// Valida um `subjectId` opcional vindo de um payload.
pub async fn resolve_optional_subject(
    db_pool: &SqlitePool,
    subject_id: Option<&str>,
    semester_id: &str,
) -> AppResult<Option<String>> {
    match subject_id.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(id) => find_subject_in_semester(db_pool, id, semester_id)
            .await?
            .map(|s| Some(s.id))
            .ok_or_else(|| AppError::NotFound("Matéria não encontrada.".into())),
    }
}

pub async fn create_subject(db_pool: &SqlitePool, semester_id: &str, nome: &str) -> AppResult<Subject> {
    let id = Uuid::new_v4().to_string();
    let result = sqlx::query("INSERT INTO subjects (id, nome, semester_id) VALUES (?1, ?2, ?3)")
        .bind(&id)
        .bind(nome)
        .bind(semester_id)
        .execute(db_pool)
        .await;

    match result {
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
            "Já existe uma matéria com este nome no semestre selecionado.".into(),
        )),
        Err(e) => Err(e.into()),
        Ok(_) => {
            tracing::info!("📚 Matéria '{}' criada no semestre {}.", nome, semester_id);
            Ok(Subject {
                id,
                nome: nome.to_string(),
                semester_id: semester_id.to_string(),
            })
        }
    }
}
