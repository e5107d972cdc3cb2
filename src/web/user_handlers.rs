// src/web/user_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{ChangePasswordPayload, Contact, SelectSemesterPayload, UserProfile, UserType},
    services::{auth_service, semester_service, user_service},
    state::AppState,
    web::{
        extract::{required_text, ApiJson},
        mw_auth::UserId,
        mw_semester::SemesterScope,
    },
};
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
) -> AppResult<Json<UserProfile>> {
    tracing::debug!("GET /users/me: Acesso para {}", user_id);
    let user = user_service::find_user_by_id(&state.db_pool, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".into()))?;

    let selected_semester = match user.selected_semester_id.as_deref() {
        Some(semester_id) => semester_service::find_semester(&state.db_pool, semester_id).await?,
        None => None,
    };
    Ok(Json(UserProfile::new(user, selected_semester)))
}

// PATCH /api/users/me/semester
pub async fn select_semester(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    ApiJson(payload): ApiJson<SelectSemesterPayload>,
) -> AppResult<Json<Value>> {
    let semester_id = required_text(payload.semester_id)
        .ok_or_else(|| AppError::BadRequest("ID do semestre é obrigatório.".into()))?;

    let semester = semester_service::find_semester(&state.db_pool, &semester_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Semestre não encontrado.".into()))?;

    user_service::set_selected_semester(&state.db_pool, &user_id, &semester.id).await?;
    Ok(Json(json!({
        "message": "Semestre selecionado com sucesso!",
        "semester": semester,
    })))
}

// PUT /api/users/me/password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    ApiJson(payload): ApiJson<ChangePasswordPayload>,
) -> AppResult<Json<Value>> {
    let new_password = payload.new_password.unwrap_or_default();
    if !auth_service::password_is_acceptable(&new_password) {
        return Err(AppError::BadRequest("A nova senha deve ter pelo menos 6 caracteres.".into()));
    }

    user_service::update_user_password(&state.db_pool, &user_id, &new_password, state.config.bcrypt_cost).await?;
    Ok(Json(json!({ "message": "Senha alterada com sucesso!" })))
}

// GET /api/users/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(scope): Extension<SemesterScope>,
) -> AppResult<Json<Vec<Contact>>> {
    let contacts = user_service::list_contacts(&state.db_pool, &scope.semester_id, &scope.user_id).await?;
    Ok(Json(contacts))
}

// GET /api/users (admin)
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserProfile>>> {
    let users = user_service::find_all_users(&state.db_pool).await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

async fn change_user_type(state: &AppState, user_id: &str, tipo: UserType) -> AppResult<Json<Value>> {
    let user = user_service::set_user_type(&state.db_pool, user_id, tipo).await?;
    let message = match tipo {
        UserType::Admin => "Usuário promovido a administrador.",
        UserType::Aluno => "Usuário rebaixado a aluno.",
    };
    Ok(Json(json!({ "message": message, "user": UserProfile::from(user) })))
}

// PUT /api/users/{id}/promote (admin)
pub async fn promote_user(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    change_user_type(&state, &id, UserType::Admin).await
}

// PUT /api/users/{id}/demote (admin)
pub async fn demote_user(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    change_user_type(&state, &id, UserType::Aluno).await
}

// DELETE /api/users/{id} (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(UserId(caller_id)): Extension<UserId>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    if id == caller_id {
        return Err(AppError::BadRequest("Você não pode excluir a sua própria conta.".into()));
    }
    user_service::delete_user(&state.db_pool, &id).await?;
    Ok(Json(json!({ "message": "Usuário excluído com sucesso!" })))
}

#[cfg(test)]
mod tests {
    use crate::{models::user::UserType, web::test_support::spawn_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn protected_routes_need_a_valid_token() {
        let app = spawn_app().await;
        let res = app.request(Method::GET, "/api/users/me", None, None).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);

        let res = app.get("/api/users/me", "authToken=lixo").await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert!(res.json()["error"].is_string());

        // token válido de um utilizador que já não existe
        let cookie = app.cookie_for("fantasma");
        assert_eq!(app.get("/api/users/me", &cookie).await.status, StatusCode::NOT_FOUND);
        assert_eq!(app.get("/api/folders", &cookie).await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn selecting_a_semester_enables_scoped_routes() {
        let app = spawn_app().await;
        let (_, cookie) = app.user("Ana", UserType::Aluno, None).await;

        assert_eq!(app.get("/api/folders", &cookie).await.status, StatusCode::BAD_REQUEST);

        let res = app
            .request(Method::PATCH, "/api/users/me/semester", Some(&cookie), Some(json!({})))
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);

        let res = app
            .request(
                Method::PATCH,
                "/api/users/me/semester",
                Some(&cookie),
                Some(json!({ "semesterId": "nao-existe" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);

        let res = app
            .request(
                Method::PATCH,
                "/api/users/me/semester",
                Some(&cookie),
                Some(json!({ "semesterId": "semestre-3" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);

        let me = app.get("/api/users/me", &cookie).await.json();
        assert_eq!(me["selectedSemesterId"], "semestre-3");
        assert_eq!(me["selectedSemester"]["nome"], "3º Semestre");
        assert!(me["updatedAt"].is_string());
        assert_eq!(app.get("/api/folders", &cookie).await.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn password_change_uses_the_token_user() {
        let app = spawn_app().await;
        let (_, cookie) = app.user("Ana", UserType::Aluno, None).await;

        let res = app
            .request(
                Method::PUT,
                "/api/users/me/password",
                Some(&cookie),
                Some(json!({ "newPassword": " 123 " })),
            )
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);

        let res = app
            .request(
                Method::PUT,
                "/api/users/me/password",
                Some(&cookie),
                Some(json!({ "newPassword": "nova-senha" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);

        let res = app
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": "ana@uni.br", "password": "nova-senha" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn contacts_are_classmates_only() {
        let app = spawn_app().await;
        let (_, ana) = app.user("Ana", UserType::Aluno, Some("semestre-1")).await;
        let (bia_id, _) = app.user("Bia", UserType::Aluno, Some("semestre-1")).await;
        app.user("Caio", UserType::Aluno, Some("semestre-2")).await;

        let contacts = app.get("/api/users/contacts", &ana).await.json();
        assert_eq!(contacts, json!([{ "id": bia_id, "nome": "Bia" }]));
    }

    #[tokio::test]
    async fn user_administration_is_admin_only() {
        let app = spawn_app().await;
        let (admin_id, admin) = app.user("Admin", UserType::Admin, None).await;
        let (ana_id, ana) = app.user("Ana", UserType::Aluno, None).await;

        assert_eq!(app.get("/api/users", &ana).await.status, StatusCode::FORBIDDEN);
        let users = app.get("/api/users", &admin).await.json();
        assert_eq!(users.as_array().map(Vec::len), Some(2));

        let res = app
            .request(Method::PUT, &format!("/api/users/{ana_id}/promote"), Some(&admin), None)
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json()["user"]["tipo"], "ADMIN");

        let res = app
            .request(Method::PUT, &format!("/api/users/{ana_id}/demote"), Some(&admin), None)
            .await;
        assert_eq!(res.json()["user"]["tipo"], "ALUNO");

        let res = app.request(Method::PUT, "/api/users/ninguem/promote", Some(&admin), None).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);

        assert_eq!(
            app.delete(&format!("/api/users/{admin_id}"), &admin).await.status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(app.delete(&format!("/api/users/{ana_id}"), &admin).await.status, StatusCode::OK);
        assert_eq!(app.delete(&format!("/api/users/{ana_id}"), &admin).await.status, StatusCode::NOT_FOUND);
    }
}
