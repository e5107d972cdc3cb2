// src/services/quiz_service.rs
use crate::{
    error::{AppError, AppResult},
    models::quiz::{
        NewQuestion, NewQuestionPayload, NewQuiz, QuestionView, QuizQuestion, QuizResult, QuizRow,
        QuizView, SubmittedAnswer, ALTERNATIVAS_POR_PERGUNTA,
    },
};
use sqlx::{types::Json, SqlitePool};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

const QUIZ_SELECT: &str = r#"
    SELECT q.id, q.titulo, q.descricao, q.subject_id, q.semester_id, q.created_by, q.created_at,
           s.nome AS subject_nome, u.nome AS criador
    FROM quizzes q
    LEFT JOIN subjects s ON s.id = q.subject_id
    LEFT JOIN users u ON u.id = q.created_by
"#;

fn into_view(row: QuizRow, questions: Vec<QuizQuestion>, with_answers: bool) -> QuizView {
    QuizView {
        quiz: row.quiz,
        subject: row.subject_nome,
        criador: row.criador,
        questions: questions
            .into_iter()
            .map(|q| QuestionView::from_question(q, with_answers))
            .collect(),
    }
}

/// Simulados do semestre por ordem de título; as perguntas vêm sem a resposta correta.
pub async fn list_quizzes(
    db_pool: &SqlitePool,
    semester_id: &str,
    subject_id: Option<&str>,
) -> AppResult<Vec<QuizView>> {
    let rows = sqlx::query_as::<_, QuizRow>(&format!(
        "{QUIZ_SELECT} WHERE q.semester_id = ?1 AND (?2 IS NULL OR q.subject_id = ?2) ORDER BY q.titulo ASC"
    ))
    .bind(semester_id)
    .bind(subject_id)
    .fetch_all(db_pool)
    .await?;

    // Todas as perguntas do semestre de uma vez; distribuídas por simulado abaixo
    let questions = sqlx::query_as::<_, QuizQuestion>(
        r#"
        SELECT qq.id, qq.quiz_id, qq.posicao, qq.enunciado, qq.alternativas, qq.resposta_correta
        FROM quiz_questions qq
        JOIN quizzes q ON q.id = qq.quiz_id
        WHERE q.semester_id = ?1
        ORDER BY qq.quiz_id, qq.posicao
        "#,
    )
    .bind(semester_id)
    .fetch_all(db_pool)
    .await?;

    let mut by_quiz: HashMap<String, Vec<QuizQuestion>> = HashMap::new();
    for question in questions {
        by_quiz.entry(question.quiz_id.clone()).or_default().push(question);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let questions = by_quiz.remove(&row.quiz.id).unwrap_or_default();
            into_view(row, questions, false)
        })
        .collect())
}

pub async fn load_questions(db_pool: &SqlitePool, quiz_id: &str) -> AppResult<Vec<QuizQuestion>> {
    let questions = sqlx::query_as::<_, QuizQuestion>(
        r#"
        SELECT id, quiz_id, posicao, enunciado, alternativas, resposta_correta
        FROM quiz_questions WHERE quiz_id = ?1 ORDER BY posicao
        "#,
    )
    .bind(quiz_id)
    .fetch_all(db_pool)
    .await?;
    Ok(questions)
}

/// Detalhe de um simulado do semestre, com as respostas corretas.
pub async fn get_quiz(db_pool: &SqlitePool, quiz_id: &str, semester_id: &str) -> AppResult<Option<QuizView>> {
    let row = sqlx::query_as::<_, QuizRow>(&format!("{QUIZ_SELECT} WHERE q.id = ?1 AND q.semester_id = ?2"))
        .bind(quiz_id)
        .bind(semester_id)
        .fetch_optional(db_pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let questions = load_questions(db_pool, quiz_id).await?;
    Ok(Some(into_view(row, questions, true)))
}

/// Valida as perguntas recebidas; o erro indica a pergunta (a partir de 1).
pub fn validate_questions(perguntas: Vec<NewQuestionPayload>) -> AppResult<Vec<NewQuestion>> {
    if perguntas.is_empty() {
        return Err(AppError::BadRequest("Campos obrigatórios estão faltando.".into()));
    }

    perguntas
        .into_iter()
        .enumerate()
        .map(|(index, pergunta)| {
            let invalid = || AppError::BadRequest(format!("Dados inválidos para a pergunta {}", index + 1));

            let enunciado = pergunta
                .enunciado
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .ok_or_else(invalid)?;
            let alternativas: Vec<String> = pergunta
                .alternativas
                .unwrap_or_default()
                .into_iter()
                .map(|a| a.trim().to_string())
                .collect();
            if alternativas.len() != ALTERNATIVAS_POR_PERGUNTA || alternativas.iter().any(|a| a.is_empty()) {
                return Err(invalid());
            }
            let correta = pergunta
                .correta
                .map(|c| c.trim().to_string())
                .filter(|c| alternativas.contains(c))
                .ok_or_else(invalid)?;

            Ok(NewQuestion {
                enunciado,
                alternativas,
                correta,
            })
        })
        .collect()
}

pub async fn create_quiz(db_pool: &SqlitePool, new_quiz: NewQuiz) -> AppResult<QuizView> {
    let quiz_id = Uuid::new_v4().to_string();
    let mut tx = db_pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO quizzes (id, titulo, descricao, subject_id, semester_id, created_by)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&quiz_id)
    .bind(&new_quiz.titulo)
    .bind(&new_quiz.descricao)
    .bind(&new_quiz.subject_id)
    .bind(&new_quiz.semester_id)
    .bind(&new_quiz.created_by)
    .execute(&mut *tx)
    .await?;

    // posicao guarda a ordem recebida, a partir de 0
    for (posicao, pergunta) in new_quiz.perguntas.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO quiz_questions (id, quiz_id, posicao, enunciado, alternativas, resposta_correta)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&quiz_id)
        .bind(posicao as i64)
        .bind(&pergunta.enunciado)
        .bind(Json(&pergunta.alternativas))
        .bind(&pergunta.correta)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        "📝 Simulado '{}' criado com {} perguntas.",
        new_quiz.titulo,
        new_quiz.perguntas.len()
    );

    get_quiz(db_pool, &quiz_id, &new_quiz.semester_id)
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn rename_quiz(db_pool: &SqlitePool, quiz_id: &str, semester_id: &str, titulo: &str) -> AppResult<QuizView> {
    let rows_affected = sqlx::query("UPDATE quizzes SET titulo = ?1 WHERE id = ?2 AND semester_id = ?3")
        .bind(titulo)
        .bind(quiz_id)
        .bind(semester_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound("Simulado não encontrado.".into()));
    }
    get_quiz(db_pool, quiz_id, semester_id)
        .await?
        .ok_or(AppError::InternalServerError)
}

/// Exclui o simulado; perguntas e tentativas saem em cascata.
pub async fn delete_quiz(db_pool: &SqlitePool, quiz_id: &str, semester_id: &str) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM quizzes WHERE id = ?1 AND semester_id = ?2")
        .bind(quiz_id)
        .bind(semester_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound("Simulado não encontrado.".into()));
    }
    tracing::info!("🗑️ Simulado '{}' excluído.", quiz_id);
    Ok(())
}

/// Conta acertos. Perguntas sem resposta contam como erro.
pub fn score_attempt(questions: &[QuizQuestion], answers: &[SubmittedAnswer]) -> AppResult<(i64, i64)> {
    let ids: HashSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();

    let mut respondidas: HashMap<&str, &str> = HashMap::new();
    for answer in answers {
        if !ids.contains(answer.question_id.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Pergunta '{}' não pertence a este simulado.",
                answer.question_id
            )));
        }
        respondidas.insert(answer.question_id.as_str(), answer.resposta.trim());
    }

    let acertos = questions
        .iter()
        .filter(|q| respondidas.get(q.id.as_str()) == Some(&q.resposta_correta.as_str()))
        .count() as i64;
    Ok((acertos, questions.len() as i64))
}

/// Corrige e regista uma tentativa.
pub async fn submit_answers(
    db_pool: &SqlitePool,
    quiz_id: &str,
    semester_id: &str,
    user_id: &str,
    answers: &[SubmittedAnswer],
) -> AppResult<QuizResult> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM quizzes WHERE id = ?1 AND semester_id = ?2)")
        .bind(quiz_id)
        .bind(semester_id)
        .fetch_one(db_pool)
        .await?;
    if !exists {
        return Err(AppError::NotFound("Simulado não encontrado.".into()));
    }

    let questions = load_questions(db_pool, quiz_id).await?;
    let (acertos, total) = score_attempt(&questions, answers)?;

    sqlx::query("INSERT INTO quiz_answers (id, quiz_id, user_id, acertos, total) VALUES (?1, ?2, ?3, ?4, ?5)")
        .bind(Uuid::new_v4().to_string())
        .bind(quiz_id)
        .bind(user_id)
        .bind(acertos)
        .bind(total)
        .execute(db_pool)
        .await?;

    // Duas casas decimais; simulado sem perguntas vale 0
    let percentual = if total == 0 {
        0.0
    } else {
        ((acertos as f64 / total as f64) * 10000.0).round() / 100.0
    };
    tracing::info!("✅ Tentativa de '{}' no simulado {}: {}/{}", user_id, quiz_id, acertos, total);

    Ok(QuizResult {
        quiz_id: quiz_id.to_string(),
        acertos,
        erros: total - acertos,
        total,
        percentual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(enunciado: &str, alternativas: &[&str], correta: &str) -> NewQuestionPayload {
        NewQuestionPayload {
            enunciado: Some(enunciado.into()),
            alternativas: Some(alternativas.iter().map(|a| a.to_string()).collect()),
            correta: Some(correta.into()),
        }
    }

    fn question(id: &str, correta: &str) -> QuizQuestion {
        QuizQuestion {
            id: id.into(),
            quiz_id: "q".into(),
            posicao: 0,
            enunciado: "?".into(),
            alternativas: Json(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            resposta_correta: correta.into(),
        }
    }

    fn answer(question_id: &str, resposta: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id: question_id.into(),
            resposta: resposta.into(),
        }
    }

    #[test]
    fn valid_questions_pass() {
        let questions = validate_questions(vec![payload("2+2?", &["1", "2", "3", "4"], "4")]).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correta, "4");
    }

    #[test]
    fn question_errors_name_the_index() {
        let err = validate_questions(vec![
            payload("ok", &["1", "2", "3", "4"], "1"),
            payload("três alternativas", &["1", "2", "3"], "1"),
        ])
        .unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert!(msg.ends_with("pergunta 2")),
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn correct_answer_must_be_an_alternative() {
        assert!(validate_questions(vec![payload("x", &["1", "2", "3", "4"], "5")]).is_err());
        assert!(validate_questions(vec![]).is_err());
    }

    #[test]
    fn unanswered_questions_count_as_wrong() {
        let questions = vec![question("q1", "a"), question("q2", "b"), question("q3", "c")];
        let (acertos, total) = score_attempt(&questions, &[answer("q1", "a"), answer("q2", "c")]).unwrap();
        assert_eq!((acertos, total), (1, 3));
    }

    #[test]
    fn foreign_question_ids_are_rejected() {
        let questions = vec![question("q1", "a")];
        assert!(matches!(
            score_attempt(&questions, &[answer("outra", "a")]),
            Err(AppError::BadRequest(_))
        ));
    }
}
