// src/models/user.rs
use crate::models::semester::Semester;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserType {
    Aluno,
    Admin,
}

// Representa um utilizador lido da tabela 'users'
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub matricula: String,
    pub senha_hash: String,
    pub tipo: UserType,
    pub selected_semester_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.tipo == UserType::Admin
    }
}

/// Vista pública de um utilizador (nunca inclui o hash da senha).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub matricula: String,
    pub tipo: UserType,
    pub selected_semester_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_semester: Option<Semester>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserProfile {
    pub fn new(user: User, selected_semester: Option<Semester>) -> Self {
        Self {
            id: user.id,
            nome: user.nome,
            email: user.email,
            matricula: user.matricula,
            tipo: user.tipo,
            selected_semester_id: user.selected_semester_id,
            selected_semester,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile::new(user, None)
    }
}

/// Colega do mesmo semestre.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Contact {
    pub id: String,
    pub nome: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub senha: Option<String>,
    #[serde(default)]
    pub matricula: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectSemesterPayload {
    #[serde(default)]
    pub semester_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[serde(default)]
    pub new_password: Option<String>,
}

/// Dados já validados para criar um utilizador.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nome: String,
    pub email: String,
    pub matricula: String,
    pub senha: String,
    pub tipo: UserType,
}
