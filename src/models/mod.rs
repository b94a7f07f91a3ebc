pub mod accommodation;
pub mod booking;
pub mod catalog;
pub mod tour;
pub mod user;
