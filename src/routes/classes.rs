use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::class_dto::{
        ClassListQuery, ClassListResponse, CreateAssignmentPayload, CreateClassPayload,
        CreateExamPayload, UpdateClassPayload,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassPayload,
    responses(
        (status = 201, description = "Class created successfully"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_class(
    State(state): State<AppState>,
    Json(payload): Json<CreateClassPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let class = state.class_service.create_class(payload).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    get,
    path = "/api/classes",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Search query")
    ),
    responses(
        (status = 200, description = "List of classes")
    )
)]
#[axum::debug_handler]
pub async fn list_classes(
    State(state): State<AppState>,
    Query(query): Query<ClassListQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let result = state
        .class_service
        .list_classes(page, per_page, query.search)
        .await?;
    Ok(Json(ClassListResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Class found"),
        (status = 404, description = "Class not found")
    )
)]
#[axum::debug_handler]
pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let class = state.class_service.get_class_by_id(id).await?;
    Ok(Json(class))
}

#[utoipa::path(
    patch,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    request_body = UpdateClassPayload,
    responses(
        (status = 200, description = "Class updated successfully"),
        (status = 404, description = "Class not found")
    )
)]
#[axum::debug_handler]
pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClassPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let class = state.class_service.update_class(id, payload).await?;
    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 204, description = "Class deleted successfully"),
        (status = 404, description = "Class not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.class_service.delete_class(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/exams",
    request_body = CreateExamPayload,
    responses(
        (status = 201, description = "Exam created successfully"),
        (status = 404, description = "Class not found")
    )
)]
#[axum::debug_handler]
pub async fn create_exam(
    State(state): State<AppState>,
    Json(payload): Json<CreateExamPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let exam = state.class_service.create_exam(payload).await?;
    Ok((StatusCode::CREATED, Json(exam)))
}

#[utoipa::path(
    get,
    path = "/api/exams/{id}",
    params(
        ("id" = Uuid, Path, description = "Exam ID")
    ),
    responses(
        (status = 200, description = "Exam found"),
        (status = 404, description = "Exam not found")
    )
)]
#[axum::debug_handler]
pub async fn get_exam(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let exam = state.class_service.get_exam_by_id(id).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    delete,
    path = "/api/exams/{id}",
    params(
        ("id" = Uuid, Path, description = "Exam ID")
    ),
    responses(
        (status = 204, description = "Exam deleted successfully"),
        (status = 404, description = "Exam not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_exam(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.class_service.delete_exam(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/exams",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Exams for the class"),
        (status = 404, description = "Class not found")
    )
)]
#[axum::debug_handler]
pub async fn list_exams_for_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let exams = state.class_service.list_exams_for_class(id).await?;
    Ok(Json(exams))
}

#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body = CreateAssignmentPayload,
    responses(
        (status = 201, description = "Assignment created successfully"),
        (status = 404, description = "Class not found")
    )
)]
#[axum::debug_handler]
pub async fn create_assignment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssignmentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let assignment = state.class_service.create_assignment(payload).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment found"),
        (status = 404, description = "Assignment not found")
    )
)]
#[axum::debug_handler]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let assignment = state.class_service.get_assignment_by_id(id).await?;
    Ok(Json(assignment))
}

#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 204, description = "Assignment deleted successfully"),
        (status = 404, description = "Assignment not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.class_service.delete_assignment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/assignments",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Assignments for the class"),
        (status = 404, description = "Class not found")
    )
)]
#[axum::debug_handler]
pub async fn list_assignments_for_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let assignments = state.class_service.list_assignments_for_class(id).await?;
    Ok(Json(assignments))
}
