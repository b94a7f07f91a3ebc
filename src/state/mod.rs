//! Client-facing state containers.
//!
//! Each container is a plain value owned by whoever handles the request.
//! Nothing here is global; persistence goes through [`persist`] explicitly.

pub mod auth;
pub mod filters;
pub mod persist;
pub mod ui;

pub use auth::AuthSession;
pub use filters::TourFilterState;
pub use ui::{CartItem, Theme, UiState};
