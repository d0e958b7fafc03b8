#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod rating_service;

pub use app_services::AppServices;
pub use error::{AggregationError, AppServicesError, PresentationError};
pub use rating_service::{
    RatingCalculator, RatingReport, RatingService, StandardCalculator, compute_average_rating,
    present_ratings,
};
