use crate::models::booking::{Booking, BookingListResponse, BookingRequest};
use crate::services::booking_service::BookingService;
use crate::services::pricing::BookingQuote;
use crate::utils::error::AppError;
use crate::utils::jwt::{AuthenticatedUser, OptionalUser};
use chrono::Utc;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use uuid::Uuid;

/// Price a booking without creating it
#[openapi(tag = "Bookings")]
#[post("/bookings/quote", format = "json", data = "<request>")]
pub async fn quote_booking(
    request: Json<BookingRequest>,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingQuote>, AppError> {
    let quote = booking_service.quote(&request.into_inner()).await?;
    Ok(Json(quote))
}

/// Create a booking; guests may book without logging in
#[openapi(tag = "Bookings")]
#[post("/bookings", format = "json", data = "<request>")]
pub async fn create_booking(
    request: Json<BookingRequest>,
    user: OptionalUser,
    booking_service: &State<BookingService>,
) -> Result<Json<Booking>, AppError> {
    let principal = user.0.map(|u| u.principal());
    let booking = booking_service
        .create(principal.as_ref(), request.into_inner())
        .await?;
    Ok(Json(booking))
}

/// Bookings of the logged-in user
#[openapi(tag = "Bookings")]
#[get("/bookings")]
pub async fn list_my_bookings(
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingListResponse>, AppError> {
    let bookings = booking_service.list_for_user(auth.user_id).await?;
    Ok(Json(BookingListResponse { bookings }))
}

/// A single booking owned by the caller
#[openapi(tag = "Bookings")]
#[get("/bookings/<id>")]
pub async fn get_booking(
    id: Uuid,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<Booking>, AppError> {
    let booking = booking_service.get(id, &auth.principal()).await?;
    Ok(Json(booking))
}

/// Cancel a booking before its check-in date
#[openapi(tag = "Bookings")]
#[post("/bookings/<id>/cancel")]
pub async fn cancel_booking(
    id: Uuid,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<Booking>, AppError> {
    let today = Utc::now().date_naive();
    let booking = booking_service
        .cancel(id, &auth.principal(), today)
        .await?;
    Ok(Json(booking))
}
