//! Use cases (application services)

pub mod call_model;
pub mod response_board;
pub mod run_deliberation;
