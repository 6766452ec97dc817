pub mod answer_option;
pub mod assignment;
pub mod class;
pub mod exam;
pub mod question;
pub mod quiz;
