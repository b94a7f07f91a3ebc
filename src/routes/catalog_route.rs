use crate::models::catalog::{AccommodationCategory, Destination, EnumValuesResponse, TourCategory};
use crate::services::catalog_service::CatalogService;
use crate::utils::error::AppError;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

#[openapi(tag = "Catalog")]
#[get("/destinations")]
pub async fn list_destinations(
    catalog_service: &State<CatalogService>,
) -> Result<Json<Vec<Destination>>, AppError> {
    Ok(Json(catalog_service.destinations().await?))
}

#[openapi(tag = "Catalog")]
#[get("/categories/tours")]
pub async fn list_tour_categories(
    catalog_service: &State<CatalogService>,
) -> Result<Json<Vec<TourCategory>>, AppError> {
    Ok(Json(catalog_service.tour_categories().await?))
}

#[openapi(tag = "Catalog")]
#[get("/categories/accommodations")]
pub async fn list_accommodation_categories(
    catalog_service: &State<CatalogService>,
) -> Result<Json<Vec<AccommodationCategory>>, AppError> {
    Ok(Json(catalog_service.accommodation_categories().await?))
}

/// Allowed values of a database enum, e.g. `booking_status`
#[openapi(tag = "Catalog")]
#[get("/enums/<name>")]
pub async fn enum_values(
    name: String,
    catalog_service: &State<CatalogService>,
) -> Result<Json<EnumValuesResponse>, AppError> {
    Ok(Json(catalog_service.enum_values(&name).await?))
}
