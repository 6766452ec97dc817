use crate::error::{Error, Result};
use crate::models::answer_option::AnswerOption;
use crate::models::question::Question;
use crate::models::quiz::Quiz;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct QuestionWithOptions {
    pub question: Question,
    pub options: Vec<AnswerOption>,
}

#[derive(Debug, serde::Serialize)]
pub struct QuizWithQuestions {
    pub quiz: Quiz,
    pub questions: Vec<QuestionWithOptions>,
}

#[derive(Debug, serde::Serialize)]
pub struct DeletedOption {
    pub deleted_option_id: Uuid,
    pub options: Vec<AnswerOption>,
}

#[derive(Debug)]
pub struct QuizFilter {
    pub exam_id: Option<Uuid>,
    pub assignment_id: Option<Uuid>,
}

/// Single owner of the question-ordering contract. Every mutation that
/// touches `question_order` or the option floor runs inside one transaction,
/// so a failed step never leaves a quiz with a gapped or duplicated order.
#[derive(Clone)]
pub struct QuizService {
    pool: SqlitePool,
}

impl QuizService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_quiz(
        &self,
        payload: crate::dto::quiz_dto::CreateQuizPayload,
    ) -> Result<Quiz> {
        match (payload.exam_id, payload.assignment_id) {
            (Some(exam_id), None) => {
                let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM exams WHERE id = ?1")
                    .bind(exam_id)
                    .fetch_optional(&self.pool)
                    .await?;
                if exists.is_none() {
                    return Err(Error::NotFound(format!("Exam {} not found", exam_id)));
                }
            }
            (None, Some(assignment_id)) => {
                let exists: Option<Uuid> =
                    sqlx::query_scalar("SELECT id FROM assignments WHERE id = ?1")
                        .bind(assignment_id)
                        .fetch_optional(&self.pool)
                        .await?;
                if exists.is_none() {
                    return Err(Error::NotFound(format!(
                        "Assignment {} not found",
                        assignment_id
                    )));
                }
            }
            _ => {
                return Err(Error::BadRequest(
                    "Quiz must reference exactly one of exam or assignment".to_string(),
                ));
            }
        }

        let now = Utc::now();
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (id, exam_id, assignment_id, title, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, exam_id, assignment_id, title, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payload.exam_id)
        .bind(payload.assignment_id)
        .bind(payload.title)
        .bind(payload.description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(quiz_id = %quiz.id, "quiz created");
        Ok(quiz)
    }

    pub async fn get_quiz_by_id(&self, quiz_id: Uuid) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, exam_id, assignment_id, title, description, created_at, updated_at
            FROM quizzes
            WHERE id = ?1
            "#,
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", quiz_id)))?;

        Ok(quiz)
    }

    pub async fn get_quiz_with_questions(&self, quiz_id: Uuid) -> Result<QuizWithQuestions> {
        let quiz = self.get_quiz_by_id(quiz_id).await?;
        let questions = self.list_questions(quiz_id).await?;
        Ok(QuizWithQuestions { quiz, questions })
    }

    pub async fn list_quizzes(&self, filter: QuizFilter) -> Result<Vec<Quiz>> {
        let quizzes = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, exam_id, assignment_id, title, description, created_at, updated_at
            FROM quizzes
            WHERE (?1 IS NULL OR exam_id = ?1)
              AND (?2 IS NULL OR assignment_id = ?2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.exam_id)
        .bind(filter.assignment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    pub async fn update_quiz(
        &self,
        quiz_id: Uuid,
        payload: crate::dto::quiz_dto::UpdateQuizPayload,
    ) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            UPDATE quizzes
            SET
                title = COALESCE(?1, title),
                description = COALESCE(?2, description),
                updated_at = ?3
            WHERE id = ?4
            RETURNING id, exam_id, assignment_id, title, description, created_at, updated_at
            "#,
        )
        .bind(payload.title)
        .bind(payload.description)
        .bind(Utc::now())
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", quiz_id)))?;

        Ok(quiz)
    }

    /// Questions and their options go with the quiz via ON DELETE CASCADE.
    pub async fn delete_quiz(&self, quiz_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Quiz {} not found", quiz_id)));
        }
        tracing::info!(quiz_id = %quiz_id, "quiz deleted");
        Ok(())
    }

    /// Appends a question at order N+1 together with its options (at least
    /// two, enforced at the boundary and assumed here).
    pub async fn create_question(
        &self,
        quiz_id: Uuid,
        payload: crate::dto::quiz_dto::CreateQuestionPayload,
    ) -> Result<QuestionWithOptions> {
        let mut tx = self.pool.begin().await?;

        ensure_quiz_exists(&mut tx, quiz_id).await?;
        let next_order: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(question_order), 0) + 1 FROM questions WHERE quiz_id = ?1",
        )
        .bind(quiz_id)
        .fetch_one(&mut *tx)
        .await?;

        let question =
            insert_question(&mut tx, quiz_id, &payload.text, &payload.correct_answer, next_order)
                .await?;
        let options = insert_options(&mut tx, question.id, &payload.options).await?;

        tx.commit().await?;
        Ok(QuestionWithOptions { question, options })
    }

    /// Inserts a batch of questions in input order, continuing from the
    /// quiz's current max order.
    pub async fn bulk_create_questions(
        &self,
        quiz_id: Uuid,
        groups: Vec<crate::dto::quiz_dto::CreateQuestionPayload>,
    ) -> Result<Vec<QuestionWithOptions>> {
        let mut tx = self.pool.begin().await?;

        ensure_quiz_exists(&mut tx, quiz_id).await?;
        let next_order: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(question_order), 0) + 1 FROM questions WHERE quiz_id = ?1",
        )
        .bind(quiz_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut created = Vec::with_capacity(groups.len());
        for (idx, group) in groups.into_iter().enumerate() {
            let question = insert_question(
                &mut tx,
                quiz_id,
                &group.text,
                &group.correct_answer,
                next_order + idx as i64,
            )
            .await?;
            let options = insert_options(&mut tx, question.id, &group.options).await?;
            created.push(QuestionWithOptions { question, options });
        }

        tx.commit().await?;
        tracing::info!(quiz_id = %quiz_id, count = created.len(), "questions bulk created");
        Ok(created)
    }

    /// Deletes a question and compacts the orders behind it, so the quiz's
    /// remaining questions are numbered 1..=N-1 with their relative sequence
    /// preserved.
    pub async fn delete_question(&self, question_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let question = fetch_question(&mut tx, question_id).await?;

        sqlx::query("DELETE FROM questions WHERE id = ?1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            r#"
            UPDATE questions
            SET question_order = question_order - 1
            WHERE quiz_id = ?1 AND question_order > ?2
            "#,
        )
        .bind(question.quiz_id)
        .bind(question.question_order)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(question_id = %question_id, quiz_id = %question.quiz_id, "question deleted");
        Ok(())
    }

    /// Moves a question to `new_order` by shifting the block between the old
    /// and new positions by one, then dropping the question into the gap.
    pub async fn update_question_order(
        &self,
        question_id: Uuid,
        new_order: i64,
    ) -> Result<Question> {
        if new_order < 1 {
            return Err(Error::BadRequest("new order must be positive".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let question = fetch_question(&mut tx, question_id).await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE quiz_id = ?1")
            .bind(question.quiz_id)
            .fetch_one(&mut *tx)
            .await?;
        if new_order > total {
            return Err(Error::BadRequest(
                "new order cannot exceed total questions".to_string(),
            ));
        }

        let current = question.question_order;
        if new_order == current {
            return Ok(question);
        }

        if new_order < current {
            sqlx::query(
                r#"
                UPDATE questions
                SET question_order = question_order + 1
                WHERE quiz_id = ?1 AND question_order >= ?2 AND question_order < ?3
                "#,
            )
            .bind(question.quiz_id)
            .bind(new_order)
            .bind(current)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                r#"
                UPDATE questions
                SET question_order = question_order - 1
                WHERE quiz_id = ?1 AND question_order > ?2 AND question_order <= ?3
                "#,
            )
            .bind(question.quiz_id)
            .bind(current)
            .bind(new_order)
            .execute(&mut *tx)
            .await?;
        }

        let updated = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET question_order = ?1, updated_at = ?2
            WHERE id = ?3
            RETURNING id, quiz_id, text, correct_answer, question_order, created_at, updated_at
            "#,
        )
        .bind(new_order)
        .bind(Utc::now())
        .bind(question_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn list_questions(&self, quiz_id: Uuid) -> Result<Vec<QuestionWithOptions>> {
        self.get_quiz_by_id(quiz_id).await?;

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, text, correct_answer, question_order, created_at, updated_at
            FROM questions
            WHERE quiz_id = ?1
            ORDER BY question_order
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let options = sqlx::query_as::<_, AnswerOption>(
            r#"
            SELECT ao.id, ao.question_id, ao.label, ao.text, ao.created_at
            FROM answer_options ao
            JOIN questions q ON q.id = ao.question_id
            WHERE q.quiz_id = ?1
            ORDER BY ao.label
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_question: HashMap<Uuid, Vec<AnswerOption>> = HashMap::new();
        for option in options {
            by_question.entry(option.question_id).or_default().push(option);
        }

        Ok(questions
            .into_iter()
            .map(|question| {
                let options = by_question.remove(&question.id).unwrap_or_default();
                QuestionWithOptions { question, options }
            })
            .collect())
    }

    pub async fn add_option(
        &self,
        question_id: Uuid,
        payload: crate::dto::quiz_dto::OptionPayload,
    ) -> Result<(Question, Vec<AnswerOption>, AnswerOption)> {
        let mut tx = self.pool.begin().await?;

        let question = fetch_question(&mut tx, question_id).await?;
        let option = insert_option(&mut tx, question_id, &payload).await?;
        let options = fetch_options(&mut tx, question_id).await?;

        tx.commit().await?;
        Ok((question, options, option))
    }

    /// Rejects the delete when it would leave the question with fewer than
    /// two options. Count and delete share a transaction so two racing
    /// deletes cannot both pass the floor check.
    pub async fn delete_option(&self, option_id: Uuid) -> Result<DeletedOption> {
        let mut tx = self.pool.begin().await?;

        let option = sqlx::query_as::<_, AnswerOption>(
            r#"
            SELECT id, question_id, label, text, created_at
            FROM answer_options
            WHERE id = ?1
            "#,
        )
        .bind(option_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Option {} not found", option_id)))?;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM answer_options WHERE question_id = ?1")
                .bind(option.question_id)
                .fetch_one(&mut *tx)
                .await?;
        if count <= 2 {
            return Err(Error::BadRequest(
                "Question must have at least 2 options".to_string(),
            ));
        }

        sqlx::query("DELETE FROM answer_options WHERE id = ?1")
            .bind(option_id)
            .execute(&mut *tx)
            .await?;
        let options = fetch_options(&mut tx, option.question_id).await?;

        tx.commit().await?;
        Ok(DeletedOption {
            deleted_option_id: option_id,
            options,
        })
    }

    /// Swaps out the full option set. The ≥2 floor applies to the incoming
    /// set (boundary-validated); existing options are gone once this commits.
    pub async fn replace_options(
        &self,
        question_id: Uuid,
        options: Vec<crate::dto::quiz_dto::OptionPayload>,
    ) -> Result<(Question, Vec<AnswerOption>)> {
        let mut tx = self.pool.begin().await?;

        let question = fetch_question(&mut tx, question_id).await?;
        sqlx::query("DELETE FROM answer_options WHERE question_id = ?1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?;
        let created = insert_options(&mut tx, question_id, &options).await?;

        tx.commit().await?;
        Ok((question, created))
    }

    pub async fn set_correct_option(
        &self,
        question_id: Uuid,
        option_id: Uuid,
    ) -> Result<(Question, AnswerOption)> {
        let mut tx = self.pool.begin().await?;

        fetch_question(&mut tx, question_id).await?;
        let option = sqlx::query_as::<_, AnswerOption>(
            r#"
            SELECT id, question_id, label, text, created_at
            FROM answer_options
            WHERE id = ?1
            "#,
        )
        .bind(option_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Option {} not found", option_id)))?;

        if option.question_id != question_id {
            return Err(Error::BadRequest(
                "Option does not belong to the question".to_string(),
            ));
        }

        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET correct_answer = ?1, updated_at = ?2
            WHERE id = ?3
            RETURNING id, quiz_id, text, correct_answer, question_order, created_at, updated_at
            "#,
        )
        .bind(&option.label)
        .bind(Utc::now())
        .bind(question_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((question, option))
    }
}

async fn ensure_quiz_exists(tx: &mut Transaction<'_, Sqlite>, quiz_id: Uuid) -> Result<()> {
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM quizzes WHERE id = ?1")
        .bind(quiz_id)
        .fetch_optional(&mut **tx)
        .await?;
    if exists.is_none() {
        return Err(Error::NotFound(format!("Quiz {} not found", quiz_id)));
    }
    Ok(())
}

async fn fetch_question(tx: &mut Transaction<'_, Sqlite>, question_id: Uuid) -> Result<Question> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, quiz_id, text, correct_answer, question_order, created_at, updated_at
        FROM questions
        WHERE id = ?1
        "#,
    )
    .bind(question_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Question {} not found", question_id)))
}

async fn fetch_options(
    tx: &mut Transaction<'_, Sqlite>,
    question_id: Uuid,
) -> Result<Vec<AnswerOption>> {
    let options = sqlx::query_as::<_, AnswerOption>(
        r#"
        SELECT id, question_id, label, text, created_at
        FROM answer_options
        WHERE question_id = ?1
        ORDER BY label
        "#,
    )
    .bind(question_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(options)
}

async fn insert_question(
    tx: &mut Transaction<'_, Sqlite>,
    quiz_id: Uuid,
    text: &str,
    correct_answer: &str,
    order: i64,
) -> Result<Question> {
    let now = Utc::now();
    let question = sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions (id, quiz_id, text, correct_answer, question_order, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING id, quiz_id, text, correct_answer, question_order, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(quiz_id)
    .bind(text)
    .bind(correct_answer)
    .bind(order)
    .bind(now)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(question)
}

async fn insert_option(
    tx: &mut Transaction<'_, Sqlite>,
    question_id: Uuid,
    payload: &crate::dto::quiz_dto::OptionPayload,
) -> Result<AnswerOption> {
    let option = sqlx::query_as::<_, AnswerOption>(
        r#"
        INSERT INTO answer_options (id, question_id, label, text, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id, question_id, label, text, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(question_id)
    .bind(&payload.label)
    .bind(&payload.text)
    .bind(Utc::now())
    .fetch_one(&mut **tx)
    .await?;
    Ok(option)
}

async fn insert_options(
    tx: &mut Transaction<'_, Sqlite>,
    question_id: Uuid,
    payloads: &[crate::dto::quiz_dto::OptionPayload],
) -> Result<Vec<AnswerOption>> {
    let mut options = Vec::with_capacity(payloads.len());
    for payload in payloads {
        options.push(insert_option(tx, question_id, payload).await?);
    }
    Ok(options)
}
