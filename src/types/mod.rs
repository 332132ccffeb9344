pub mod paper;
pub mod query;
pub mod steps;
