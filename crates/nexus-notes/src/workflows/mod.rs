pub mod admissions;
pub mod assistant;
pub mod catalog;
