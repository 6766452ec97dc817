use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::quiz_dto::{
        AddOptionResponse, BulkCreateQuestionsPayload, CreateQuestionPayload, CreateQuizPayload,
        DeleteOptionResponse, OptionPayload, QuestionWithOptionsResponse, QuizListQuery,
        QuizWithQuestionsResponse, ReplaceOptionsPayload, ReplaceOptionsResponse,
        SetCorrectOptionPayload, SetCorrectOptionResponse, UpdateQuestionOrderPayload,
        UpdateQuizPayload,
    },
    error::Result,
    services::quiz_service::QuizFilter,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/quizzes",
    request_body = CreateQuizPayload,
    responses(
        (status = 201, description = "Quiz created successfully"),
        (status = 400, description = "Quiz must reference exactly one of exam or assignment"),
        (status = 404, description = "Referenced exam or assignment not found")
    )
)]
#[axum::debug_handler]
pub async fn create_quiz(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state.quiz_service.create_quiz(payload).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

#[utoipa::path(
    get,
    path = "/api/quizzes",
    params(
        ("exam_id" = Option<Uuid>, Query, description = "Filter by exam"),
        ("assignment_id" = Option<Uuid>, Query, description = "Filter by assignment")
    ),
    responses(
        (status = 200, description = "List of quizzes")
    )
)]
#[axum::debug_handler]
pub async fn list_quizzes(
    State(state): State<AppState>,
    Query(query): Query<QuizListQuery>,
) -> Result<impl IntoResponse> {
    let quizzes = state
        .quiz_service
        .list_quizzes(QuizFilter {
            exam_id: query.exam_id,
            assignment_id: query.assignment_id,
        })
        .await?;
    Ok(Json(quizzes))
}

#[utoipa::path(
    get,
    path = "/api/quizzes/{id}",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "Quiz with its questions and options"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let quiz = state.quiz_service.get_quiz_with_questions(id).await?;
    Ok(Json(QuizWithQuestionsResponse::from(quiz)))
}

#[utoipa::path(
    patch,
    path = "/api/quizzes/{id}",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    request_body = UpdateQuizPayload,
    responses(
        (status = 200, description = "Quiz updated successfully"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn update_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state.quiz_service.update_quiz(id, payload).await?;
    Ok(Json(quiz))
}

#[utoipa::path(
    delete,
    path = "/api/quizzes/{id}",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    responses(
        (status = 204, description = "Quiz deleted successfully"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete_quiz(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/quizzes/{id}/questions",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "Questions in quiz order, each with its options"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let questions = state.quiz_service.list_questions(id).await?;
    let body: Vec<QuestionWithOptionsResponse> =
        questions.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/quizzes/{id}/questions",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    request_body = CreateQuestionPayload,
    responses(
        (status = 201, description = "Question appended at the end of the quiz"),
        (status = 400, description = "Fewer than 2 options supplied"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let created = state.quiz_service.create_question(id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(QuestionWithOptionsResponse::from(created)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/quizzes/{id}/questions/bulk",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    request_body = BulkCreateQuestionsPayload,
    responses(
        (status = 201, description = "Questions created in input order"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn bulk_create_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BulkCreateQuestionsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let created = state
        .quiz_service
        .bulk_create_questions(id, payload.questions)
        .await?;
    let body: Vec<QuestionWithOptionsResponse> = created.into_iter().map(Into::into).collect();
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    delete,
    path = "/api/questions/{id}",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    responses(
        (status = 204, description = "Question deleted, following orders compacted"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete_question(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/questions/{id}/order",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    request_body = UpdateQuestionOrderPayload,
    responses(
        (status = 200, description = "Question moved to the requested order"),
        (status = 400, description = "New order exceeds total questions"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn update_question_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionOrderPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state
        .quiz_service
        .update_question_order(id, payload.new_order)
        .await?;
    Ok(Json(crate::dto::quiz_dto::QuestionResponse::from(question)))
}

#[utoipa::path(
    post,
    path = "/api/questions/{id}/options",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    request_body = OptionPayload,
    responses(
        (status = 201, description = "Option added"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn add_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OptionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (question, options, option) = state.quiz_service.add_option(id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddOptionResponse {
            question: question.into(),
            options,
            option_id: option.id,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/questions/{id}/options",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    request_body = ReplaceOptionsPayload,
    responses(
        (status = 200, description = "Option set replaced"),
        (status = 400, description = "Fewer than 2 options supplied"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn replace_options(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceOptionsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (question, options) = state
        .quiz_service
        .replace_options(id, payload.options)
        .await?;
    Ok(Json(ReplaceOptionsResponse {
        question: question.into(),
        options,
    }))
}

#[utoipa::path(
    post,
    path = "/api/questions/{id}/correct-option",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    request_body = SetCorrectOptionPayload,
    responses(
        (status = 200, description = "Correct answer set from the option's label"),
        (status = 400, description = "Option does not belong to the question"),
        (status = 404, description = "Question or option not found")
    )
)]
#[axum::debug_handler]
pub async fn set_correct_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetCorrectOptionPayload>,
) -> Result<impl IntoResponse> {
    let (question, option) = state
        .quiz_service
        .set_correct_option(id, payload.option_id)
        .await?;
    Ok(Json(SetCorrectOptionResponse {
        question: question.into(),
        option,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/options/{id}",
    params(
        ("id" = Uuid, Path, description = "Option ID")
    ),
    responses(
        (status = 200, description = "Option deleted, remaining options returned"),
        (status = 400, description = "Question must keep at least 2 options"),
        (status = 404, description = "Option not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let deleted = state.quiz_service.delete_option(id).await?;
    Ok(Json(DeleteOptionResponse::from(deleted)))
}
