// src/web/mw_admin.rs
use crate::{error::AppError, services::user_service, web::mw_auth::UserId};
use axum::{
    extract::{Extension, Request, State},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

/// Middleware que exige um utilizador ADMIN.
/// Deve ser executado *depois* do middleware `require_auth`.
pub async fn require_admin(
    State(db_pool): State<SqlitePool>,
    Extension(UserId(user_id)): Extension<UserId>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("Admin MW: Verificando perfil ADMIN para {}", user_id);

    let user = user_service::find_user_by_id(&db_pool, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".into()))?;

    if !user.is_admin() {
        tracing::warn!("Admin MW: Acesso negado para {} (não é ADMIN).", user_id);
        return Err(AppError::Forbidden("Acesso restrito a administradores.".into()));
    }

    tracing::debug!("Admin MW: Acesso admin concedido para {}", user_id);
    Ok(next.run(request).await)
}
