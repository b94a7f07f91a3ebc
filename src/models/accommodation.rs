use crate::models::catalog::Destination;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Accommodation row joined with its category and destination slugs.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, JsonSchema)]
pub struct Accommodation {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub price_per_night: Decimal,
    pub rating: f64,
    pub review_count: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_verified: bool,
    pub category_id: Option<Uuid>,
    pub category_slug: Option<String>,
    pub destination_id: Option<Uuid>,
    pub destination_slug: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, JsonSchema)]
pub struct Room {
    pub id: Uuid,
    pub accommodation_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub max_occupancy: i32,
    pub price_per_night: Decimal,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub available_quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, JsonSchema)]
pub struct Review {
    pub id: Uuid,
    pub accommodation_id: Uuid,
    pub author_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AccommodationDetail {
    #[serde(flatten)]
    pub accommodation: Accommodation,
    pub rooms: Vec<Room>,
    pub reviews: Vec<Review>,
    pub destination: Option<Destination>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AccommodationListResponse {
    pub total: usize,
    pub accommodations: Vec<Accommodation>,
}

/// Parameters forwarded to the `search_accommodations` procedure.
#[derive(Debug, Default, Clone)]
pub struct AccommodationSearch {
    pub query: Option<String>,
    pub destination: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub guests: Option<i32>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AvailabilityResponse {
    pub accommodation_id: Uuid,
    pub room_id: Option<Uuid>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub available: bool,
}

/// Lifecycle flags editable from the admin surface.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AccommodationFlags {
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_verified: Option<bool>,
}

impl AccommodationFlags {
    pub fn is_empty(&self) -> bool {
        self.is_active.is_none() && self.is_featured.is_none() && self.is_verified.is_none()
    }
}
