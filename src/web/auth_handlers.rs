// src/web/auth_handlers.rs
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::user::{LoginPayload, NewUser, RegisterPayload, UserProfile, UserType},
    services::{auth_service, token_service, user_service},
    state::AppState,
    web::extract::{required_text, ApiJson},
};
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tower_cookies::{cookie::SameSite, Cookie, Cookies};

fn auth_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build((token_service::AUTH_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::seconds(config.token_ttl_secs))
        .secure(config.cookie_secure)
        .build()
}

// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterPayload>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let (Some(nome), Some(email), Some(matricula), Some(senha)) = (
        required_text(payload.nome),
        required_text(payload.email),
        required_text(payload.matricula),
        payload.senha.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(AppError::BadRequest("Todos os campos são obrigatórios.".into()));
    };

    if !email.contains('@') {
        return Err(AppError::BadRequest("Email inválido.".into()));
    }
    if !auth_service::password_is_acceptable(&senha) {
        return Err(AppError::BadRequest("A senha deve ter pelo menos 6 caracteres.".into()));
    }

    let new_user = NewUser {
        nome,
        email,
        matricula,
        senha,
        tipo: UserType::Aluno,
    };
    let user = user_service::create_user(&state.db_pool, &new_user, state.config.bcrypt_cost).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Usuário cadastrado com sucesso!",
            "user": UserProfile::from(user),
        })),
    ))
}

// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> AppResult<Json<Value>> {
    let (Some(email), Some(password)) = (required_text(payload.email), payload.password.filter(|p| !p.is_empty()))
    else {
        return Err(AppError::BadRequest("Email e senha são obrigatórios.".into()));
    };

    tracing::info!("Tentativa de login para: {}", email);

    // Email desconhecido e senha errada dão a mesma resposta
    let Some(user) = user_service::find_user_by_email(&state.db_pool, &email).await? else {
        tracing::warn!("Utilizador não encontrado: {}", email);
        return Err(AppError::InvalidCredentials);
    };
    if !auth_service::verify_password(&password, &user.senha_hash).await? {
        tracing::warn!("Senha incorreta para: {}", email);
        return Err(AppError::InvalidCredentials);
    }

    let token = token_service::issue_token(&state.config.jwt_secret, &user.id, state.config.token_ttl_secs)?;
    cookies.add(auth_cookie(&state.config, token));

    tracing::info!("✅ Login bem-sucedido para: {}", user.id);
    Ok(Json(json!({
        "message": "Login realizado com sucesso!",
        "redirectTo": "/home",
    })))
}

// POST /api/auth/logout
pub async fn logout(cookies: Cookies) -> Json<Value> {
    cookies.remove(Cookie::build((token_service::AUTH_COOKIE, "")).path("/").build());
    tracing::info!("🚪 Sessão terminada.");
    Json(json!({ "message": "Logout realizado com sucesso!" }))
}

#[cfg(test)]
mod tests {
    use crate::web::test_support::spawn_app;
    use axum::http::{header, Method, StatusCode};
    use serde_json::json;

    fn registration(email: &str, matricula: &str) -> serde_json::Value {
        json!({ "nome": "Ana", "email": email, "senha": "segredo123", "matricula": matricula })
    }

    #[tokio::test]
    async fn register_login_and_read_profile() {
        let app = spawn_app().await;

        let res = app
            .request(Method::POST, "/api/auth/register", None, Some(registration("ana@uni.br", "001")))
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        assert_eq!(res.json()["user"]["tipo"], "ALUNO");
        assert!(res.json()["user"].get("senhaHash").is_none());

        let res = app
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": "ana@uni.br", "password": "segredo123" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json()["redirectTo"], "/home");

        let set_cookie = res.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap().to_string();
        assert!(set_cookie.starts_with("authToken="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Strict"));
        assert!(set_cookie.contains("Max-Age=3600"));

        let cookie = set_cookie.split(';').next().unwrap().to_string();
        let res = app.get("/api/users/me", &cookie).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json()["email"], "ana@uni.br");
    }

    #[tokio::test]
    async fn register_validates_fields() {
        let app = spawn_app().await;

        let res = app
            .request(Method::POST, "/api/auth/register", None, Some(json!({ "nome": "Ana" })))
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);

        let mut curta = registration("ana@uni.br", "001");
        curta["senha"] = json!("  12345  ");
        let res = app.request(Method::POST, "/api/auth/register", None, Some(curta)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);

        let res = app
            .request(Method::POST, "/api/auth/register", None, Some(registration("sem-arroba", "001")))
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);

        app.request(Method::POST, "/api/auth/register", None, Some(registration("ana@uni.br", "001")))
            .await;
        let res = app
            .request(Method::POST, "/api/auth/register", None, Some(registration("ANA@uni.br", "002")))
            .await;
        assert_eq!(res.status, StatusCode::CONFLICT);
        assert!(res.json()["error"].is_string());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let app = spawn_app().await;
        app.request(Method::POST, "/api/auth/register", None, Some(registration("ana@uni.br", "001")))
            .await;

        let wrong = app
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": "ana@uni.br", "password": "errada" })),
            )
            .await;
        let unknown = app
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": "ninguem@uni.br", "password": "errada" })),
            )
            .await;
        assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.body, unknown.body);

        let missing = app
            .request(Method::POST, "/api/auth/login", None, Some(json!({ "email": "ana@uni.br" })))
            .await;
        assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let app = spawn_app().await;
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from("{ nao é json"))
            .unwrap();
        let res = app.send(request).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.json()["error"].is_string());
    }

    #[tokio::test]
    async fn logout_expires_the_cookie() {
        let app = spawn_app().await;
        let res = app
            .request(Method::POST, "/api/auth/logout", Some("authToken=qualquer"), None)
            .await;
        assert_eq!(res.status, StatusCode::OK);
        let set_cookie = res.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("authToken="));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
