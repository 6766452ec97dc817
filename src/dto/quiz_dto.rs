use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::answer_option::AnswerOption;
use crate::models::question::Question;
use crate::models::quiz::Quiz;
use crate::services::quiz_service::{DeletedOption, QuestionWithOptions, QuizWithQuestions};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuizPayload {
    pub exam_id: Option<Uuid>,
    pub assignment_id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuizPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OptionPayload {
    #[validate(length(min = 1))]
    pub label: String,
    #[validate(length(min = 1))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(length(min = 1))]
    pub correct_answer: String,
    #[validate(length(min = 2), nested)]
    pub options: Vec<OptionPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkCreateQuestionsPayload {
    #[validate(length(min = 1), nested)]
    pub questions: Vec<CreateQuestionPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuestionOrderPayload {
    #[validate(range(min = 1))]
    pub new_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplaceOptionsPayload {
    #[validate(length(min = 2), nested)]
    pub options: Vec<OptionPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCorrectOptionPayload {
    pub option_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuizListQuery {
    pub exam_id: Option<Uuid>,
    pub assignment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub text: String,
    pub correct_answer: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionWithOptionsResponse {
    #[serde(flatten)]
    pub question: QuestionResponse,
    pub options: Vec<AnswerOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizWithQuestionsResponse {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<QuestionWithOptionsResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOptionResponse {
    pub question: QuestionResponse,
    pub options: Vec<AnswerOption>,
    pub option_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOptionResponse {
    pub deleted_option_id: Uuid,
    pub options: Vec<AnswerOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceOptionsResponse {
    pub question: QuestionResponse,
    pub options: Vec<AnswerOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCorrectOptionResponse {
    pub question: QuestionResponse,
    pub option: AnswerOption,
}

impl From<Question> for QuestionResponse {
    fn from(value: Question) -> Self {
        Self {
            id: value.id,
            quiz_id: value.quiz_id,
            text: value.text,
            correct_answer: value.correct_answer,
            order: value.question_order,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<QuestionWithOptions> for QuestionWithOptionsResponse {
    fn from(value: QuestionWithOptions) -> Self {
        Self {
            question: value.question.into(),
            options: value.options,
        }
    }
}

impl From<QuizWithQuestions> for QuizWithQuestionsResponse {
    fn from(value: QuizWithQuestions) -> Self {
        Self {
            quiz: value.quiz,
            questions: value.questions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<DeletedOption> for DeleteOptionResponse {
    fn from(value: DeletedOption) -> Self {
        Self {
            deleted_option_id: value.deleted_option_id,
            options: value.options,
        }
    }
}
