pub mod fetch;
pub mod grading;
pub mod input;
pub mod output;
