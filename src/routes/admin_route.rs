use crate::models::accommodation::{Accommodation, AccommodationFlags};
use crate::models::booking::{Booking, StatusUpdateRequest};
use crate::models::tour::{CreateTourRequest, Tour, UpdateTourRequest};
use crate::policy::{self, Action, Collection};
use crate::services::accommodation_service::AccommodationService;
use crate::services::booking_service::BookingService;
use crate::services::tour_service::TourService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::serde::json::{json, Json, Value};
use rocket::State;
use rocket_okapi::openapi;
use uuid::Uuid;

/// Create a tour
#[openapi(tag = "Admin")]
#[post("/admin/tours", format = "json", data = "<request>")]
pub async fn create_tour(
    request: Json<CreateTourRequest>,
    auth: AuthenticatedUser,
    tour_service: &State<TourService>,
) -> Result<Json<Tour>, AppError> {
    policy::require(Some(&auth.principal()), Collection::Tours, Action::Create)?;
    let tour = tour_service.create(request.into_inner()).await?;
    Ok(Json(tour))
}

/// Update a tour; omitted fields keep their value
#[openapi(tag = "Admin")]
#[put("/admin/tours/<id>", format = "json", data = "<request>")]
pub async fn update_tour(
    id: Uuid,
    request: Json<UpdateTourRequest>,
    auth: AuthenticatedUser,
    tour_service: &State<TourService>,
) -> Result<Json<Tour>, AppError> {
    policy::require(Some(&auth.principal()), Collection::Tours, Action::Update)?;
    let tour = tour_service.update(id, request.into_inner()).await?;
    Ok(Json(tour))
}

/// Delete a tour without bookings
#[openapi(tag = "Admin")]
#[delete("/admin/tours/<id>")]
pub async fn delete_tour(
    id: Uuid,
    auth: AuthenticatedUser,
    tour_service: &State<TourService>,
) -> Result<Json<Value>, AppError> {
    policy::require(Some(&auth.principal()), Collection::Tours, Action::Delete)?;
    tour_service.delete(id).await?;
    Ok(Json(json!({ "id": id, "deleted": true })))
}

/// Toggle accommodation lifecycle flags
#[openapi(tag = "Admin")]
#[patch("/admin/accommodations/<id>", format = "json", data = "<flags>")]
pub async fn update_accommodation_flags(
    id: Uuid,
    flags: Json<AccommodationFlags>,
    auth: AuthenticatedUser,
    accommodation_service: &State<AccommodationService>,
) -> Result<Json<Accommodation>, AppError> {
    policy::require(
        Some(&auth.principal()),
        Collection::Accommodations,
        Action::Update,
    )?;
    accommodation_service
        .update_flags(id, &flags)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Accommodation not found".into()))
}

/// Move a booking through its lifecycle
#[openapi(tag = "Admin")]
#[patch("/admin/bookings/<id>/status", format = "json", data = "<request>")]
pub async fn update_booking_status(
    id: Uuid,
    request: Json<StatusUpdateRequest>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<Booking>, AppError> {
    let booking = booking_service
        .update_status(id, request.status, &auth.principal())
        .await?;
    Ok(Json(booking))
}
