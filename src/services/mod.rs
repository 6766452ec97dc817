pub mod class_service;
pub mod quiz_service;
