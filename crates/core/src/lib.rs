#![forbid(unsafe_code)]

pub mod model;
pub mod rating;

pub use rating::{QUESTIONS_PER_RUN, Rating, compute_immediate_score};
