// src/web/mw_semester.rs
use crate::{
    error::AppError,
    models::user::UserType,
    services::user_service,
    web::mw_auth::UserId,
};
use axum::{
    extract::{Extension, Request, State},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

/// Utilizador autenticado e o semestre que tem selecionado.
#[derive(Clone, Debug)]
pub struct SemesterScope {
    pub user_id: String,
    pub semester_id: String,
    pub tipo: UserType,
}

impl SemesterScope {
    pub fn is_admin(&self) -> bool {
        self.tipo == UserType::Admin
    }

    /// Autor do recurso ou administrador.
    pub fn can_manage(&self, owner_id: Option<&str>) -> bool {
        self.is_admin() || owner_id == Some(self.user_id.as_str())
    }
}

// Middleware que resolve o semestre selecionado. Corre depois de `require_auth`.
pub async fn require_semester(
    State(db_pool): State<SqlitePool>,
    Extension(UserId(user_id)): Extension<UserId>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = user_service::find_user_by_id(&db_pool, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".into()))?;

    let Some(semester_id) = user.selected_semester_id else {
        tracing::debug!("Semestre MW: '{}' ainda não selecionou semestre.", user_id);
        return Err(AppError::BadRequest("Nenhum semestre selecionado.".into()));
    };

    request.extensions_mut().insert(SemesterScope {
        user_id: user.id,
        semester_id,
        tipo: user.tipo,
    });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(tipo: UserType) -> SemesterScope {
        SemesterScope {
            user_id: "u1".into(),
            semester_id: "semestre-1".into(),
            tipo,
        }
    }

    #[test]
    fn owners_and_admins_can_manage() {
        assert!(scope(UserType::Aluno).can_manage(Some("u1")));
        assert!(!scope(UserType::Aluno).can_manage(Some("u2")));
        assert!(!scope(UserType::Aluno).can_manage(None));
        assert!(scope(UserType::Admin).can_manage(None));
    }
}
