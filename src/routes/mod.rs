pub mod classes;
pub mod health;
pub mod quiz;
