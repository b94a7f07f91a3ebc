pub mod accommodation_service;
pub mod booking_service;
pub mod catalog_service;
pub mod listing;
pub mod pricing;
pub mod submission;
pub mod tour_service;
pub mod user_service;
