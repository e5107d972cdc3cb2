// src/services/event_service.rs
use crate::{
    error::{AppError, AppResult},
    models::event::{Event, NewEvent},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

const EVENT_SELECT: &str = r#"
    SELECT e.id, e.titulo, e.descricao, e.data, e.semester_id, e.created_by,
           u.nome AS criador, e.created_at
    FROM events e
    LEFT JOIN users u ON u.id = e.created_by
"#;

/// Aceita RFC 3339, `AAAA-MM-DDTHH:MM[:SS]` (UTC) ou só a data (meia-noite UTC).
pub fn parse_event_date(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(date.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| AppError::BadRequest(format!("Data inválida: '{raw}'.")))
}

pub async fn list_events(db_pool: &SqlitePool, semester_id: &str) -> AppResult<Vec<Event>> {
    // rowid desempata eventos na mesma data pela ordem de criação
    let events = sqlx::query_as::<_, Event>(&format!(
        "{EVENT_SELECT} WHERE e.semester_id = ?1 ORDER BY e.data ASC, e.rowid ASC"
    ))
    .bind(semester_id)
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontrados {} eventos no semestre '{}'.", events.len(), semester_id);
    Ok(events)
}

/// Busca limitada ao semestre: evento de outro semestre é tratado como inexistente.
pub async fn find_event(db_pool: &SqlitePool, event_id: &str, semester_id: &str) -> AppResult<Option<Event>> {
    let event = sqlx::query_as::<_, Event>(&format!("{EVENT_SELECT} WHERE e.id = ?1 AND e.semester_id = ?2"))
        .bind(event_id)
        .bind(semester_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(event)
}

pub async fn create_event(db_pool: &SqlitePool, new_event: NewEvent) -> AppResult<Event> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO events (id, titulo, descricao, data, semester_id, created_by)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&id)
    .bind(&new_event.titulo)
    .bind(&new_event.descricao)
    .bind(new_event.data)
    .bind(&new_event.semester_id)
    .bind(&new_event.created_by)
    .execute(db_pool)
    .await?;

    tracing::info!("📅 Evento '{}' criado para {}.", new_event.titulo, new_event.data);
    find_event(db_pool, &id, &new_event.semester_id)
        .await?
        .ok_or(AppError::InternalServerError)
}

/// A permissão (criador ou admin) é verificada no handler.
pub async fn delete_event(db_pool: &SqlitePool, event_id: &str) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM events WHERE id = ?1")
        .bind(event_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound("Evento não encontrado.".into()));
    }
    tracing::info!("🗑️ Evento '{}' excluído.", event_id);
    Ok(())
}
