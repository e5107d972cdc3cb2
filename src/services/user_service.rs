// src/services/user_service.rs
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::user::{Contact, NewUser, User, UserType},
    services::auth_service,
};
use sqlx::SqlitePool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, nome, email, matricula, senha_hash, tipo, selected_semester_id, created_at, updated_at";

/// Busca um utilizador na base de dados pelo seu ID.
pub async fn find_user_by_id(db_pool: &SqlitePool, user_id: &str) -> AppResult<Option<User>> {
    tracing::debug!("Buscando utilizador por ID: {}", user_id);
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?;

    if user.is_none() {
        tracing::debug!("Utilizador '{}' não encontrado.", user_id);
    }
    Ok(user)
}

/// Busca um utilizador pelo email (comparação sem distinção de maiúsculas).
pub async fn find_user_by_email(db_pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
    tracing::debug!("Buscando utilizador por email: {}", email);
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"))
        .bind(email.trim())
        .fetch_optional(db_pool)
        .await?;
    Ok(user)
}

pub async fn find_all_users(db_pool: &SqlitePool) -> AppResult<Vec<User>> {
    tracing::debug!("Buscando todos os utilizadores...");
    let users = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY nome ASC"))
        .fetch_all(db_pool)
        .await?;
    tracing::debug!("Encontrados {} utilizadores.", users.len());
    Ok(users)
}

/// Cria um utilizador. Email ou matrícula repetidos resultam em `Conflict`.
pub async fn create_user(db_pool: &SqlitePool, new_user: &NewUser, bcrypt_cost: u32) -> AppResult<User> {
    tracing::info!("Tentando criar utilizador: {}", new_user.email);
    let senha_hash = auth_service::hash_password(&new_user.senha, bcrypt_cost).await?;
    let id = Uuid::new_v4().to_string();

    let insert_result = sqlx::query(
        r#"
        INSERT INTO users (id, nome, email, matricula, senha_hash, tipo)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&id)
    .bind(&new_user.nome)
    .bind(&new_user.email)
    .bind(&new_user.matricula)
    .bind(&senha_hash)
    .bind(new_user.tipo)
    .execute(db_pool)
    .await;

    if let Err(e) = &insert_result {
        if is_unique_violation(e) {
            tracing::warn!("Falha ao criar user: email ou matrícula de '{}' já existe.", new_user.email);
            return Err(AppError::Conflict("O email ou a matrícula já está em uso.".into()));
        }
    }
    insert_result?;

    tracing::info!("✅ Utilizador '{}' criado com sucesso.", id);
    find_user_by_id(db_pool, &id)
        .await?
        .ok_or(AppError::InternalServerError)
}

/// Colegas com o mesmo semestre selecionado, excluindo o próprio.
pub async fn list_contacts(db_pool: &SqlitePool, semester_id: &str, exclude_user_id: &str) -> AppResult<Vec<Contact>> {
    let contacts = sqlx::query_as::<_, Contact>(
        r#"
        SELECT id, nome FROM users
        WHERE selected_semester_id = ?1 AND id <> ?2
        ORDER BY nome ASC
        "#,
    )
    .bind(semester_id)
    .bind(exclude_user_id)
    .fetch_all(db_pool)
    .await?;
    Ok(contacts)
}

pub async fn set_selected_semester(db_pool: &SqlitePool, user_id: &str, semester_id: &str) -> AppResult<()> {
    tracing::info!("Selecionando semestre '{}' para user '{}'", semester_id, user_id);
    let rows_affected = sqlx::query("UPDATE users SET selected_semester_id = ?1 WHERE id = ?2")
        .bind(semester_id)
        .bind(user_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound("Usuário não encontrado.".into()));
    }
    Ok(())
}

pub async fn update_user_password(
    db_pool: &SqlitePool,
    user_id: &str,
    new_raw_password: &str,
    bcrypt_cost: u32,
) -> AppResult<()> {
    tracing::info!("Tentando alterar senha para user: {}", user_id);
    let new_password_hash = auth_service::hash_password(new_raw_password, bcrypt_cost).await?;

    let rows_affected = sqlx::query("UPDATE users SET senha_hash = ?1 WHERE id = ?2")
        .bind(new_password_hash)
        .bind(user_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao alterar senha: Utilizador '{}' não encontrado.", user_id);
        Err(AppError::NotFound("Usuário não encontrado.".into()))
    } else {
        tracing::info!("✅ Senha alterada com sucesso para user: {}", user_id);
        Ok(())
    }
}

/// Promove ou rebaixa um utilizador e devolve o registo atualizado.
pub async fn set_user_type(db_pool: &SqlitePool, user_id: &str, tipo: UserType) -> AppResult<User> {
    tracing::info!("Alterando tipo de '{}' para {:?}", user_id, tipo);
    let rows_affected = sqlx::query("UPDATE users SET tipo = ?1 WHERE id = ?2")
        .bind(tipo)
        .bind(user_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound("Usuário não encontrado.".into()));
    }
    find_user_by_id(db_pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".into()))
}

pub async fn delete_user(db_pool: &SqlitePool, user_id: &str) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(user_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound("Usuário não encontrado.".into()));
    }
    tracing::info!("🗑️ Utilizador '{}' excluído.", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_db_pool;

    fn aluno(email: &str, matricula: &str) -> NewUser {
        NewUser {
            nome: "Ana".into(),
            email: email.into(),
            matricula: matricula.into(),
            senha: "segredo123".into(),
            tipo: UserType::Aluno,
        }
    }

    #[tokio::test]
    async fn create_and_find_by_email_ignores_case() {
        let pool = create_db_pool("sqlite::memory:", 1).await.unwrap();
        let user = create_user(&pool, &aluno("ana@uni.br", "001"), 4).await.unwrap();
        assert_eq!(user.tipo, UserType::Aluno);
        assert!(user.selected_semester_id.is_none());

        let found = find_user_by_email(&pool, "ANA@uni.br").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let pool = create_db_pool("sqlite::memory:", 1).await.unwrap();
        create_user(&pool, &aluno("ana@uni.br", "001"), 4).await.unwrap();
        let err = create_user(&pool, &aluno("ana@uni.br", "002"), 4).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn contacts_share_the_semester() {
        let pool = create_db_pool("sqlite::memory:", 1).await.unwrap();
        let a = create_user(&pool, &aluno("a@uni.br", "1"), 4).await.unwrap();
        let b = create_user(&pool, &aluno("b@uni.br", "2"), 4).await.unwrap();
        let c = create_user(&pool, &aluno("c@uni.br", "3"), 4).await.unwrap();
        set_selected_semester(&pool, &a.id, "semestre-1").await.unwrap();
        set_selected_semester(&pool, &b.id, "semestre-1").await.unwrap();
        set_selected_semester(&pool, &c.id, "semestre-2").await.unwrap();

        let contacts = list_contacts(&pool, "semestre-1", &a.id).await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id, b.id);
    }

    #[tokio::test]
    async fn missing_user_updates_are_not_found() {
        let pool = create_db_pool("sqlite::memory:", 1).await.unwrap();
        assert!(matches!(
            set_user_type(&pool, "ninguem", UserType::Admin).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(delete_user(&pool, "ninguem").await, Err(AppError::NotFound(_))));
    }
}
