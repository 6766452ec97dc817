pub mod class_dto;
pub mod quiz_dto;
