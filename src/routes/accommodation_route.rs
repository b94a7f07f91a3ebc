use crate::models::accommodation::{
    AccommodationDetail, AccommodationListResponse, AccommodationSearch, AvailabilityResponse,
};
use crate::routes::{check_min_rating, parse_choice, parse_date};
use crate::services::accommodation_service::AccommodationService;
use crate::services::listing::AccommodationFilter;
use crate::utils::error::AppError;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

/// List active accommodations, filtered and sorted
#[openapi(tag = "Accommodations")]
#[get("/accommodations?<q>&<category>&<destination>&<price>&<amenities>&<min_rating>&<sort>")]
#[allow(clippy::too_many_arguments)]
pub async fn list_accommodations(
    q: Option<String>,
    category: Option<String>,
    destination: Option<String>,
    price: Option<String>,
    amenities: Vec<String>,
    min_rating: Option<f64>,
    sort: Option<String>,
    accommodation_service: &State<AccommodationService>,
) -> Result<Json<AccommodationListResponse>, AppError> {
    let filter = AccommodationFilter {
        query: q,
        category,
        destination,
        price: parse_choice(price, "price range")?,
        amenities: amenities.into_iter().filter(|a| !a.trim().is_empty()).collect(),
        min_rating: check_min_rating(min_rating)?,
        sort: parse_choice(sort, "sort")?,
    };

    let accommodations = accommodation_service.list(&filter).await?;
    Ok(Json(AccommodationListResponse {
        total: accommodations.len(),
        accommodations,
    }))
}

fn parse_amount(value: Option<String>, field: &str) -> Result<Option<Decimal>, AppError> {
    value
        .map(|raw| {
            Decimal::from_str(raw.trim())
                .map_err(|_| AppError::BadRequest(format!("Invalid {}", field)))
        })
        .transpose()
}

/// Server-side search through the search_accommodations procedure
#[openapi(tag = "Accommodations")]
#[get("/accommodations/search?<q>&<destination>&<min_price>&<max_price>&<guests>")]
pub async fn search_accommodations(
    q: Option<String>,
    destination: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
    guests: Option<i32>,
    accommodation_service: &State<AccommodationService>,
) -> Result<Json<AccommodationListResponse>, AppError> {
    let params = AccommodationSearch {
        query: q,
        destination,
        min_price: parse_amount(min_price, "min_price")?,
        max_price: parse_amount(max_price, "max_price")?,
        guests,
    };

    let accommodations = accommodation_service.search(&params).await?;
    Ok(Json(AccommodationListResponse {
        total: accommodations.len(),
        accommodations,
    }))
}

/// Accommodation detail with rooms, reviews and destination
#[openapi(tag = "Accommodations")]
#[get("/accommodations/<slug>")]
pub async fn get_accommodation(
    slug: String,
    accommodation_service: &State<AccommodationService>,
) -> Result<Json<AccommodationDetail>, AppError> {
    accommodation_service
        .get_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Accommodation '{}' not found", slug)))
}

/// Check availability for a date range
#[openapi(tag = "Accommodations")]
#[get("/accommodations/<id>/availability?<check_in>&<check_out>&<room_id>")]
pub async fn check_availability(
    id: Uuid,
    check_in: String,
    check_out: String,
    room_id: Option<Uuid>,
    accommodation_service: &State<AccommodationService>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let check_in = parse_date(&check_in, "check_in")?;
    let check_out = parse_date(&check_out, "check_out")?;

    let available = accommodation_service
        .check_availability(id, room_id, check_in, check_out)
        .await?;

    Ok(Json(AvailabilityResponse {
        accommodation_id: id,
        room_id,
        check_in,
        check_out,
        available,
    }))
}
