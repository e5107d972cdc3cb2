// src/web/test_support.rs
use crate::{
    config::Config,
    db::create_db_pool,
    models::user::{NewUser, UserType},
    services::{token_service, user_service},
    state::AppState,
    web::routes::build_app,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

pub const MULTIPART_BOUNDARY: &str = "portal-aluno-teste";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

/// App completa sobre uma base em memória.
pub async fn spawn_app() -> TestApp {
    let config = Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("segredo-de-testes-com-mais-de-32-bytes".into()),
        "BCRYPT_COST" => Some("4".into()),
        "MAX_UPLOAD_BYTES" => Some("1024".into()),
        _ => None,
    })
    .unwrap();
    let pool = create_db_pool("sqlite::memory:", 1).await.unwrap();
    let state = AppState::new(pool, config);
    TestApp {
        app: build_app(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
        TestResponse { status, headers, body }
    }

    pub async fn request(&self, method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, cookie: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(cookie), None).await
    }

    pub async fn post(&self, uri: &str, cookie: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(cookie), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, cookie: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(cookie), None).await
    }

    /// Cria um utilizador já com semestre e devolve `(id, cookie)`.
    pub async fn user(&self, nome: &str, tipo: UserType, semester_id: Option<&str>) -> (String, String) {
        let new_user = NewUser {
            nome: nome.into(),
            email: format!("{}@uni.br", nome.to_lowercase()),
            matricula: format!("mat-{}", nome.to_lowercase()),
            senha: "segredo123".into(),
            tipo,
        };
        let user = user_service::create_user(&self.state.db_pool, &new_user, 4).await.unwrap();
        if let Some(semester_id) = semester_id {
            user_service::set_selected_semester(&self.state.db_pool, &user.id, semester_id)
                .await
                .unwrap();
        }
        let cookie = self.cookie_for(&user.id);
        (user.id, cookie)
    }

    pub fn cookie_for(&self, user_id: &str) -> String {
        let token = token_service::issue_token(&self.state.config.jwt_secret, user_id, 3600).unwrap();
        format!("{}={}", token_service::AUTH_COOKIE, token)
    }
}

/// Corpo multipart com campos de texto e um ficheiro opcional `(nome, mime, bytes)`.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    if let Some((file_name, mime, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"arquivo\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}
