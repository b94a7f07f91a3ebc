use crate::models::tour::{TourDetail, TourListResponse};
use crate::routes::{check_min_rating, parse_choice};
use crate::services::listing::TourFilter;
use crate::services::tour_service::TourService;
use crate::utils::error::AppError;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// List active tours, filtered and sorted
#[openapi(tag = "Tours")]
#[get("/tours?<q>&<category>&<destination>&<price>&<min_rating>&<sort>")]
pub async fn list_tours(
    q: Option<String>,
    category: Option<String>,
    destination: Option<String>,
    price: Option<String>,
    min_rating: Option<f64>,
    sort: Option<String>,
    tour_service: &State<TourService>,
) -> Result<Json<TourListResponse>, AppError> {
    let filter = TourFilter {
        query: q,
        category,
        destination,
        price: parse_choice(price, "price range")?,
        min_rating: check_min_rating(min_rating)?,
        sort: parse_choice(sort, "sort")?,
    };

    let tours = tour_service.list(&filter).await?;
    Ok(Json(TourListResponse {
        total: tours.len(),
        tours,
    }))
}

/// Tour detail by slug
#[openapi(tag = "Tours")]
#[get("/tours/<slug>")]
pub async fn get_tour(
    slug: String,
    tour_service: &State<TourService>,
) -> Result<Json<TourDetail>, AppError> {
    tour_service
        .get_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Tour '{}' not found", slug)))
}
