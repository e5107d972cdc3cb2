// src/services/qanda_service.rs
use crate::{
    error::{AppError, AppResult},
    models::qanda::{AnswerRow, QuestionRow, QuestionWithAnswers},
};
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

const QUESTION_SELECT: &str = r#"
    SELECT q.id, q.pergunta, q.user_id, u.nome AS autor, q.subject_id, s.nome AS subject,
           q.semester_id, q.created_at
    FROM qanda q
    JOIN users u ON u.id = q.user_id
    LEFT JOIN subjects s ON s.id = q.subject_id
"#;

const ANSWER_SELECT: &str = r#"
    SELECT r.id, r.conteudo, r.pergunta_id, r.autor_id, u.nome AS autor, r.data_resposta
    FROM respostas r
    JOIN users u ON u.id = r.autor_id
"#;

/// Perguntas do semestre (mais recentes primeiro), cada uma com as respostas por ordem cronológica.
pub async fn list_questions(
    db_pool: &SqlitePool,
    semester_id: &str,
    user_id: Option<&str>,
) -> AppResult<Vec<QuestionWithAnswers>> {
    let questions = sqlx::query_as::<_, QuestionRow>(&format!(
        "{QUESTION_SELECT} WHERE q.semester_id = ?1 AND (?2 IS NULL OR q.user_id = ?2) \
         ORDER BY q.created_at DESC, q.rowid DESC"
    ))
    .bind(semester_id)
    .bind(user_id)
    .fetch_all(db_pool)
    .await?;

    // Uma consulta para todas as respostas do semestre, agrupadas abaixo por pergunta
    let answers = sqlx::query_as::<_, AnswerRow>(&format!(
        "{ANSWER_SELECT} JOIN qanda q ON q.id = r.pergunta_id WHERE q.semester_id = ?1 \
         ORDER BY r.data_resposta ASC, r.rowid ASC"
    ))
    .bind(semester_id)
    .fetch_all(db_pool)
    .await?;

    let mut by_question: HashMap<String, Vec<AnswerRow>> = HashMap::new();
    for answer in answers {
        by_question.entry(answer.pergunta_id.clone()).or_default().push(answer);
    }

    tracing::debug!("Encontradas {} perguntas no semestre '{}'.", questions.len(), semester_id);
    Ok(questions
        .into_iter()
        .map(|question| {
            let respostas = by_question.remove(&question.id).unwrap_or_default();
            QuestionWithAnswers { question, respostas }
        })
        .collect())
}

pub async fn get_question(
    db_pool: &SqlitePool,
    question_id: &str,
    semester_id: &str,
) -> AppResult<Option<QuestionWithAnswers>> {
    let question = sqlx::query_as::<_, QuestionRow>(&format!(
        "{QUESTION_SELECT} WHERE q.id = ?1 AND q.semester_id = ?2"
    ))
    .bind(question_id)
    .bind(semester_id)
    .fetch_optional(db_pool)
    .await?;

    let Some(question) = question else {
        return Ok(None);
    };

    let respostas = sqlx::query_as::<_, AnswerRow>(&format!(
        "{ANSWER_SELECT} WHERE r.pergunta_id = ?1 ORDER BY r.data_resposta ASC, r.rowid ASC"
    ))
    .bind(question_id)
    .fetch_all(db_pool)
    .await?;

    Ok(Some(QuestionWithAnswers { question, respostas }))
}

pub async fn create_question(
    db_pool: &SqlitePool,
    semester_id: &str,
    user_id: &str,
    pergunta: &str,
    subject_id: Option<&str>,
) -> AppResult<QuestionWithAnswers> {
    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO qanda (id, pergunta, user_id, subject_id, semester_id) VALUES (?1, ?2, ?3, ?4, ?5)")
        .bind(&id)
        .bind(pergunta)
        .bind(user_id)
        .bind(subject_id)
        .bind(semester_id)
        .execute(db_pool)
        .await?;

    tracing::info!("❓ Pergunta '{}' publicada por '{}'.", id, user_id);
    get_question(db_pool, &id, semester_id)
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn add_answer(
    db_pool: &SqlitePool,
    question_id: &str,
    semester_id: &str,
    autor_id: &str,
    conteudo: &str,
) -> AppResult<AnswerRow> {
    // A pergunta tem de pertencer ao semestre ativo
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM qanda WHERE id = ?1 AND semester_id = ?2)")
        .bind(question_id)
        .bind(semester_id)
        .fetch_one(db_pool)
        .await?;
    if !exists {
        return Err(AppError::NotFound("Pergunta não encontrada.".into()));
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO respostas (id, conteudo, pergunta_id, autor_id) VALUES (?1, ?2, ?3, ?4)")
        .bind(&id)
        .bind(conteudo)
        .bind(question_id)
        .bind(autor_id)
        .execute(db_pool)
        .await?;

    tracing::info!("💬 Resposta '{}' adicionada à pergunta '{}'.", id, question_id);
    find_answer(db_pool, &id, question_id, semester_id)
        .await?
        .ok_or(AppError::InternalServerError)
}

/// A resposta só é encontrada através da própria pergunta e do semestre dela.
pub async fn find_answer(
    db_pool: &SqlitePool,
    answer_id: &str,
    question_id: &str,
    semester_id: &str,
) -> AppResult<Option<AnswerRow>> {
    let answer = sqlx::query_as::<_, AnswerRow>(&format!(
        "{ANSWER_SELECT} JOIN qanda q ON q.id = r.pergunta_id \
         WHERE r.id = ?1 AND r.pergunta_id = ?2 AND q.semester_id = ?3"
    ))
    .bind(answer_id)
    .bind(question_id)
    .bind(semester_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(answer)
}

/// Exclui a pergunta e, em cascata, as respostas.
pub async fn delete_question(db_pool: &SqlitePool, question_id: &str) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM qanda WHERE id = ?1")
        .bind(question_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound("Pergunta não encontrada.".into()));
    }
    tracing::info!("🗑️ Pergunta '{}' excluída.", question_id);
    Ok(())
}

pub async fn delete_answer(db_pool: &SqlitePool, answer_id: &str) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM respostas WHERE id = ?1")
        .bind(answer_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound("Resposta não encontrada.".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::create_db_pool,
        models::user::{NewUser, UserType},
        services::user_service,
    };

    async fn setup() -> (SqlitePool, String, String) {
        let pool = create_db_pool("sqlite::memory:", 1).await.unwrap();
        let mut ids = Vec::new();
        for (email, matricula) in [("ana@uni.br", "1"), ("bia@uni.br", "2")] {
            let user = user_service::create_user(
                &pool,
                &NewUser {
                    nome: email.split('@').next().unwrap_or_default().into(),
                    email: email.into(),
                    matricula: matricula.into(),
                    senha: "segredo123".into(),
                    tipo: UserType::Aluno,
                },
                4,
            )
            .await
            .unwrap();
            ids.push(user.id);
        }
        let bia = ids.pop().unwrap();
        let ana = ids.pop().unwrap();
        (pool, ana, bia)
    }

    #[tokio::test]
    async fn questions_are_newest_first_and_answers_oldest_first() {
        let (pool, ana, bia) = setup().await;
        let primeira = create_question(&pool, "semestre-1", &ana, "Primeira?", None).await.unwrap();
        create_question(&pool, "semestre-1", &bia, "Segunda?", None).await.unwrap();
        create_question(&pool, "semestre-2", &ana, "Outro semestre?", None).await.unwrap();

        add_answer(&pool, &primeira.question.id, "semestre-1", &bia, "r1").await.unwrap();
        add_answer(&pool, &primeira.question.id, "semestre-1", &ana, "r2").await.unwrap();

        let list = list_questions(&pool, "semestre-1", None).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].question.pergunta, "Segunda?");
        let respostas: Vec<_> = list[1].respostas.iter().map(|r| r.conteudo.as_str()).collect();
        assert_eq!(respostas, ["r1", "r2"]);
        assert_eq!(list[1].respostas[0].autor, "bia");

        let mine = list_questions(&pool, "semestre-1", Some(&bia)).await.unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[tokio::test]
    async fn answers_need_a_question_in_the_semester() {
        let (pool, ana, _) = setup().await;
        let q = create_question(&pool, "semestre-1", &ana, "?", None).await.unwrap();
        let err = add_answer(&pool, &q.question.id, "semestre-2", &ana, "x").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_a_question_removes_its_answers() {
        let (pool, ana, bia) = setup().await;
        let q = create_question(&pool, "semestre-1", &ana, "?", None).await.unwrap();
        add_answer(&pool, &q.question.id, "semestre-1", &bia, "x").await.unwrap();

        delete_question(&pool, &q.question.id).await.unwrap();
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM respostas")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        assert!(matches!(
            delete_question(&pool, &q.question.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
