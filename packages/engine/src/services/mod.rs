pub mod analytics;
pub mod badge;
pub mod practice;
pub mod records;
