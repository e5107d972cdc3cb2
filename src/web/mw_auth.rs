// src/web/mw_auth.rs
use crate::{config::Config, error::AppError, services::token_service};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_cookies::Cookies;

/// ID do utilizador autenticado, guardado nas extensões da requisição.
#[derive(Clone, Debug)]
pub struct UserId(pub String);

// Middleware que exige um token válido no cookie `authToken`
pub async fn require_auth(
    State(config): State<Arc<Config>>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = cookies.get(token_service::AUTH_COOKIE).map(|c| c.value().to_string()) else {
        tracing::debug!("Autenticação MW: sem cookie de autenticação.");
        return Err(AppError::MissingToken);
    };

    let user_id = token_service::verify_token(&config.jwt_secret, &token)?;
    tracing::debug!("Autenticação MW: Utilizador '{}' autenticado. Prosseguindo...", user_id);

    request.extensions_mut().insert(UserId(user_id));
    Ok(next.run(request).await)
}
