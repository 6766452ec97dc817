use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    routing::{delete, get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use lingua_backend::{routes, AppState};

async fn setup_app() -> Router {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let state = AppState::new(pool);
    Router::new()
        .route("/api/classes", post(routes::classes::create_class))
        .route("/api/assignments", post(routes::classes::create_assignment))
        .route("/api/exams", post(routes::classes::create_exam))
        .route("/api/quizzes", post(routes::quiz::create_quiz))
        .route(
            "/api/quizzes/:id",
            get(routes::quiz::get_quiz).delete(routes::quiz::delete_quiz),
        )
        .route(
            "/api/quizzes/:id/questions",
            get(routes::quiz::list_questions).post(routes::quiz::create_question),
        )
        .route(
            "/api/quizzes/:id/questions/bulk",
            post(routes::quiz::bulk_create_questions),
        )
        .route("/api/questions/:id", delete(routes::quiz::delete_question))
        .route(
            "/api/questions/:id/order",
            patch(routes::quiz::update_question_order),
        )
        .route(
            "/api/questions/:id/options",
            post(routes::quiz::add_option).put(routes::quiz::replace_options),
        )
        .route(
            "/api/questions/:id/correct-option",
            post(routes::quiz::set_correct_option),
        )
        .route("/api/options/:id", delete(routes::quiz::delete_option))
        .with_state(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(json.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn seed_quiz(app: &Router) -> String {
    let (status, class) = send(
        app,
        Method::POST,
        "/api/classes",
        Some(json!({ "name": "Beginner Spanish", "language": "es", "level": "A1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, assignment) = send(
        app,
        Method::POST,
        "/api/assignments",
        Some(json!({ "class_id": class["id"], "title": "Week 1 vocabulary" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, quiz) = send(
        app,
        Method::POST,
        "/api/quizzes",
        Some(json!({
            "assignment_id": assignment["id"],
            "title": "Vocabulary quiz",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    quiz["id"].as_str().unwrap().to_string()
}

fn question_body(text: &str) -> Value {
    json!({
        "text": text,
        "correct_answer": "A",
        "options": [
            { "label": "A", "text": "el gato" },
            { "label": "B", "text": "el perro" },
        ],
    })
}

#[tokio::test]
async fn quiz_lifecycle_over_http() {
    let app = setup_app().await;
    let quiz_id = seed_quiz(&app).await;

    let (status, first) = send(
        &app,
        Method::POST,
        &format!("/api/quizzes/{}/questions", quiz_id),
        Some(question_body("¿Cómo se dice cat?")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["order"], 1);
    assert_eq!(first["options"].as_array().unwrap().len(), 2);

    let (status, second) = send(
        &app,
        Method::POST,
        &format!("/api/quizzes/{}/questions", quiz_id),
        Some(question_body("¿Cómo se dice dog?")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["order"], 2);

    let (status, listed) = send(
        &app,
        Method::GET,
        &format!("/api/quizzes/{}", quiz_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["questions"].as_array().unwrap().len(), 2);

    let (status, moved) = send(
        &app,
        Method::PATCH,
        &format!("/api/questions/{}/order", second["id"].as_str().unwrap()),
        Some(json!({ "new_order": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["order"], 1);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/questions/{}", second["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, remaining) = send(
        &app,
        Method::GET,
        &format!("/api/quizzes/{}/questions", quiz_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let remaining = remaining.as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["order"], 1);
    assert_eq!(remaining[0]["id"], first["id"]);
}

#[tokio::test]
async fn bulk_create_assigns_input_order() {
    let app = setup_app().await;
    let quiz_id = seed_quiz(&app).await;

    let (status, created) = send(
        &app,
        Method::POST,
        &format!("/api/quizzes/{}/questions/bulk", quiz_id),
        Some(json!({
            "questions": [
                question_body("uno"),
                question_body("dos"),
                question_body("tres"),
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let created = created.as_array().unwrap();
    let assigned: Vec<i64> = created.iter().map(|q| q["order"].as_i64().unwrap()).collect();
    assert_eq!(assigned, vec![1, 2, 3]);
    assert_eq!(created[0]["text"], "uno");
    assert_eq!(created[2]["text"], "tres");
}

#[tokio::test]
async fn quiz_requires_exclusive_association() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/quizzes",
        Some(json!({ "title": "orphan quiz" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("exactly one"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/quizzes",
        Some(json!({
            "title": "greedy quiz",
            "exam_id": Uuid::new_v4(),
            "assignment_id": Uuid::new_v4(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn question_with_single_option_is_rejected() {
    let app = setup_app().await;
    let quiz_id = seed_quiz(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/quizzes/{}/questions", quiz_id),
        Some(json!({
            "text": "lonely",
            "correct_answer": "A",
            "options": [{ "label": "A", "text": "el gato" }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn option_floor_enforced_over_http() {
    let app = setup_app().await;
    let quiz_id = seed_quiz(&app).await;

    let (_, question) = send(
        &app,
        Method::POST,
        &format!("/api/quizzes/{}/questions", quiz_id),
        Some(question_body("q1")),
    )
    .await;
    let question_id = question["id"].as_str().unwrap().to_string();
    let first_option_id = question["options"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/options/{}", first_option_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at least 2"));

    let (status, added) = send(
        &app,
        Method::POST,
        &format!("/api/questions/{}/options", question_id),
        Some(json!({ "label": "C", "text": "el pájaro" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["options"].as_array().unwrap().len(), 3);

    let (status, deleted) = send(
        &app,
        Method::DELETE,
        &format!("/api/options/{}", first_option_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deleted_option_id"], question["options"][0]["id"]);
    assert_eq!(deleted["options"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn set_correct_option_over_http() {
    let app = setup_app().await;
    let quiz_id = seed_quiz(&app).await;

    let (_, question) = send(
        &app,
        Method::POST,
        &format!("/api/quizzes/{}/questions", quiz_id),
        Some(question_body("q1")),
    )
    .await;
    let question_id = question["id"].as_str().unwrap().to_string();
    let option_b = question["options"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["label"] == "B")
        .unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/questions/{}/correct-option", question_id),
        Some(json!({ "option_id": option_b["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["correct_answer"], "B");
    assert_eq!(body["option"]["id"], option_b["id"]);
}

#[tokio::test]
async fn replace_options_over_http() {
    let app = setup_app().await;
    let quiz_id = seed_quiz(&app).await;

    let (_, question) = send(
        &app,
        Method::POST,
        &format!("/api/quizzes/{}/questions", quiz_id),
        Some(question_body("q1")),
    )
    .await;
    let question_id = question["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/questions/{}/options", question_id),
        Some(json!({
            "options": [
                { "label": "X", "text": "la casa" },
                { "label": "Y", "text": "el coche" },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["options"].as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/questions/{}/options", question_id),
        Some(json!({
            "options": [{ "label": "X", "text": "la casa" }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_resources_return_not_found() {
    let app = setup_app().await;
    let quiz_id = seed_quiz(&app).await;

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/quizzes/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/questions/{}/order", Uuid::new_v4()),
        Some(json!({ "new_order": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, question) = send(
        &app,
        Method::POST,
        &format!("/api/quizzes/{}/questions", quiz_id),
        Some(question_body("q1")),
    )
    .await;
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/questions/{}/order", question["id"].as_str().unwrap()),
        Some(json!({ "new_order": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("cannot exceed total questions"));
}

#[tokio::test]
async fn deleting_quiz_cascades_over_http() {
    let app = setup_app().await;
    let quiz_id = seed_quiz(&app).await;

    send(
        &app,
        Method::POST,
        &format!("/api/quizzes/{}/questions", quiz_id),
        Some(question_body("q1")),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/quizzes/{}", quiz_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/quizzes/{}/questions", quiz_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
