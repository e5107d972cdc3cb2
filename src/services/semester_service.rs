// src/services/semester_service.rs
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::semester::Semester,
};
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn list_semesters(db_pool: &SqlitePool) -> AppResult<Vec<Semester>> {
    let semesters = sqlx::query_as::<_, Semester>("SELECT id, nome, created_at FROM semesters ORDER BY nome ASC")
        .fetch_all(db_pool)
        .await?;
    tracing::debug!("Encontrados {} semestres.", semesters.len());
    Ok(semesters)
}

pub async fn find_semester(db_pool: &SqlitePool, semester_id: &str) -> AppResult<Option<Semester>> {
    let semester = sqlx::query_as::<_, Semester>("SELECT id, nome, created_at FROM semesters WHERE id = ?1")
        .bind(semester_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(semester)
}

pub async fn create_semester(db_pool: &SqlitePool, nome: &str) -> AppResult<Semester> {
    let id = Uuid::new_v4().to_string();
    let result = sqlx::query("INSERT INTO semesters (id, nome) VALUES (?1, ?2)")
        .bind(&id)
        .bind(nome)
        .execute(db_pool)
        .await;

    match result {
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::Conflict("Já existe um semestre com este nome.".into()))
        }
        Err(e) => Err(e.into()),
        Ok(_) => {
            tracing::info!("📅 Semestre '{}' criado.", nome);
            find_semester(db_pool, &id).await?.ok_or(AppError::InternalServerError)
        }
    }
}
