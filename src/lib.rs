pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::{class_service::ClassService, quiz_service::QuizService};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub quiz_service: QuizService,
    pub class_service: ClassService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        let quiz_service = QuizService::new(pool.clone());
        let class_service = ClassService::new(pool.clone());

        Self {
            pool,
            quiz_service,
            class_service,
        }
    }
}
