// src/web/subject_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::subject::{NewSubjectPayload, Subject},
    services::subject_service,
    state::AppState,
    web::{
        extract::{required_text, ApiJson},
        mw_semester::SemesterScope,
    },
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};

// GET /api/subjects
pub async fn list_subjects(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
) -> AppResult<Json<Vec<Subject>>> {
    Ok(Json(subject_service::list_subjects(&state.db_pool, &scope.semester_id).await?))
}

// POST /api/subjects (admin)
pub async fn create_subject(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
    ApiJson(payload): ApiJson<NewSubjectPayload>,
) -> AppResult<(StatusCode, Json<Subject>)> {
    let nome = required_text(payload.nome)
        .ok_or_else(|| AppError::BadRequest("O nome da matéria é obrigatório.".into()))?;
    let subject = subject_service::create_subject(&state.db_pool, &scope.semester_id, &nome).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

#[cfg(test)]
mod tests {
    use crate::{models::user::UserType, web::test_support::spawn_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn subjects_belong_to_the_selected_semester() {
        let app = spawn_app().await;
        let (_, admin) = app.user("Admin", UserType::Admin, Some("semestre-1")).await;
        let (_, outro) = app.user("Outro", UserType::Aluno, Some("semestre-2")).await;

        let res = app.post("/api/subjects", &admin, json!({ "nome": "Cálculo I" })).await;
        assert_eq!(res.status, StatusCode::CREATED);
        assert_eq!(res.json()["semesterId"], "semestre-1");
        assert_eq!(
            app.post("/api/subjects", &admin, json!({ "nome": "Cálculo I" })).await.status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            app.post("/api/subjects", &outro, json!({ "nome": "Física" })).await.status,
            StatusCode::FORBIDDEN
        );

        assert_eq!(app.get("/api/subjects", &admin).await.json().as_array().map(Vec::len), Some(1));
        assert_eq!(app.get("/api/subjects", &outro).await.json(), json!([]));
    }
}
