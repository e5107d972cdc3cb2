// src/web/semester_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::semester::{NewSemesterPayload, Semester},
    services::{semester_service, user_service},
    state::AppState,
    web::{
        extract::{required_text, ApiJson},
        mw_auth::UserId,
    },
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};

// GET /api/semesters
pub async fn list_semesters(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
) -> AppResult<Json<Vec<Semester>>> {
    // Token válido de uma conta já excluída
    if user_service::find_user_by_id(&state.db_pool, &user_id).await?.is_none() {
        return Err(AppError::NotFound("Usuário não encontrado.".into()));
    }
    Ok(Json(semester_service::list_semesters(&state.db_pool).await?))
}

// POST /api/semesters (admin)
pub async fn create_semester(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewSemesterPayload>,
) -> AppResult<(StatusCode, Json<Semester>)> {
    let nome = required_text(payload.nome)
        .ok_or_else(|| AppError::BadRequest("O nome do semestre é obrigatório.".into()))?;
    let semester = semester_service::create_semester(&state.db_pool, &nome).await?;
    Ok((StatusCode::CREATED, Json(semester)))
}

#[cfg(test)]
mod tests {
    use crate::{models::user::UserType, web::test_support::spawn_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn semesters_are_listed_and_created_by_admins() {
        let app = spawn_app().await;
        let (_, admin) = app.user("Admin", UserType::Admin, None).await;
        let (_, ana) = app.user("Ana", UserType::Aluno, None).await;

        let list = app.get("/api/semesters", &ana).await.json();
        assert_eq!(list.as_array().map(Vec::len), Some(8));
        assert_eq!(list[0]["nome"], "1º Semestre");

        let body = json!({ "nome": "9º Semestre" });
        assert_eq!(app.post("/api/semesters", &ana, body.clone()).await.status, StatusCode::FORBIDDEN);
        assert_eq!(app.post("/api/semesters", &admin, body.clone()).await.status, StatusCode::CREATED);
        assert_eq!(app.post("/api/semesters", &admin, body).await.status, StatusCode::CONFLICT);
        assert_eq!(
            app.post("/api/semesters", &admin, json!({ "nome": " " })).await.status,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn deleted_accounts_cannot_list_semesters() {
        let app = spawn_app().await;
        let (_, admin) = app.user("Admin", UserType::Admin, None).await;
        let (ana_id, ana) = app.user("Ana", UserType::Aluno, None).await;

        assert_eq!(app.delete(&format!("/api/users/{ana_id}"), &admin).await.status, StatusCode::OK);
        let res = app.get("/api/semesters", &ana).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert!(res.json()["error"].is_string());
    }
}
