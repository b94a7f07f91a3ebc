use crate::models::catalog::{Destination, TourCategory};
use crate::utils::error::AppError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ItineraryDay {
    #[validate(range(min = 1))]
    pub day: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub meals: Vec<String>,
}

/// Tour as stored: the itinerary is still raw JSON.
#[derive(Debug, sqlx::FromRow)]
pub struct TourRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub discount_percent: Option<i32>,
    pub duration_days: i32,
    pub max_group_size: Option<i32>,
    pub rating: f64,
    pub review_count: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub itinerary: serde_json::Value,
    pub category_id: Option<Uuid>,
    pub category_slug: Option<String>,
    pub destination_id: Option<Uuid>,
    pub destination_slug: Option<String>,
    pub destination_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Tour {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub discount_percent: Option<i32>,
    pub duration_days: i32,
    pub max_group_size: Option<i32>,
    pub rating: f64,
    pub review_count: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub itinerary: Vec<ItineraryDay>,
    pub category_id: Option<Uuid>,
    pub category_slug: Option<String>,
    pub destination_id: Option<Uuid>,
    pub destination_slug: Option<String>,
    pub destination_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TourRow> for Tour {
    type Error = AppError;

    fn try_from(row: TourRow) -> Result<Self, Self::Error> {
        let itinerary: Vec<ItineraryDay> = serde_json::from_value(row.itinerary).map_err(|e| {
            AppError::RowShape(format!("tour {} has a malformed itinerary: {}", row.slug, e))
        })?;

        Ok(Tour {
            id: row.id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            images: row.images,
            price: row.price,
            original_price: row.original_price,
            discount_percent: row.discount_percent,
            duration_days: row.duration_days,
            max_group_size: row.max_group_size,
            rating: row.rating,
            review_count: row.review_count,
            is_active: row.is_active,
            is_featured: row.is_featured,
            itinerary,
            category_id: row.category_id,
            category_slug: row.category_slug,
            destination_id: row.destination_id,
            destination_slug: row.destination_slug,
            destination_name: row.destination_name,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct TourDetail {
    #[serde(flatten)]
    pub tour: Tour,
    pub category: Option<TourCategory>,
    pub destination: Option<Destination>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct TourListResponse {
    pub total: usize,
    pub tours: Vec<Tour>,
}

pub(crate) fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("use lowercase letters, digits and dashes".into()))
    }
}

pub(crate) fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(ValidationError::new("amount").with_message("must be positive".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CreateTourRequest {
    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(custom(function = "validate_amount"))]
    pub price: Decimal,
    #[validate(custom(function = "validate_amount"))]
    pub original_price: Option<Decimal>,
    #[validate(range(min = 0, max = 100))]
    pub discount_percent: Option<i32>,
    #[validate(range(min = 1, max = 60))]
    pub duration_days: i32,
    #[validate(range(min = 1))]
    pub max_group_size: Option<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub itinerary: Vec<ItineraryDay>,
    pub category_id: Option<Uuid>,
    pub destination_id: Option<Uuid>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

fn default_true() -> bool {
    true
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, JsonSchema, Validate)]
pub struct UpdateTourRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    #[validate(custom(function = "validate_amount"))]
    pub price: Option<Decimal>,
    #[validate(custom(function = "validate_amount"))]
    pub original_price: Option<Decimal>,
    #[validate(range(min = 0, max = 100))]
    pub discount_percent: Option<i32>,
    #[validate(range(min = 1, max = 60))]
    pub duration_days: Option<i32>,
    #[validate(range(min = 1))]
    pub max_group_size: Option<i32>,
    #[validate(nested)]
    pub itinerary: Option<Vec<ItineraryDay>>,
    pub category_id: Option<Uuid>,
    pub destination_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn row(itinerary: serde_json::Value) -> TourRow {
        TourRow {
            id: Uuid::new_v4(),
            slug: "serengeti-migration".into(),
            title: "Great Migration".into(),
            description: None,
            images: vec![],
            price: dec!(1450),
            original_price: None,
            discount_percent: None,
            duration_days: 5,
            max_group_size: Some(8),
            rating: 4.8,
            review_count: 12,
            is_active: true,
            is_featured: false,
            itinerary,
            category_id: None,
            category_slug: None,
            destination_id: None,
            destination_slug: None,
            destination_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn itinerary_is_decoded() {
        let tour = Tour::try_from(row(json!([
            {"day": 1, "title": "Arrival", "description": "Transfer to camp", "meals": ["dinner"]},
            {"day": 2, "title": "Game drive", "description": "Full day"}
        ])))
        .unwrap();

        assert_eq!(tour.itinerary.len(), 2);
        assert_eq!(tour.itinerary[0].meals, vec!["dinner".to_string()]);
        assert!(tour.itinerary[1].meals.is_empty());
    }

    #[test]
    fn malformed_itinerary_fails_fast() {
        let err = Tour::try_from(row(json!({"day": "one"}))).unwrap_err();
        assert!(matches!(err, AppError::RowShape(ref msg) if msg.contains("serengeti-migration")));
    }

    #[test]
    fn slug_rules() {
        assert!(validate_slug("okavango-delta-3").is_ok());
        assert!(validate_slug("Okavango").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("has space").is_err());
    }

    #[test]
    fn create_request_validation() {
        let request: CreateTourRequest = serde_json::from_value(json!({
            "slug": "bad slug",
            "title": "",
            "price": "0",
            "duration_days": 0,
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["slug", "title", "price", "duration_days"] {
            assert!(fields.contains_key(field), "{field} should be rejected");
        }
    }
}
