#[macro_use]
extern crate rocket;
extern crate rocket_okapi;

pub mod config;
pub mod db;
pub mod models;
pub mod policy;
pub mod routes;
pub mod services;
pub mod state;
pub mod swagger;
pub mod utils;

use crate::config::Settings;
use crate::services::accommodation_service::AccommodationService;
use crate::services::booking_service::BookingService;
use crate::services::catalog_service::CatalogService;
use crate::services::tour_service::TourService;
use crate::services::user_service::UserService;
use crate::swagger::{rapidoc, swagger_ui};
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::rapidoc::make_rapidoc;
use rocket_okapi::swagger_ui::make_swagger_ui;
use sqlx::PgPool;

/// Assemble the application around an existing pool.
pub fn build_rocket(settings: Settings, pool: PgPool) -> Rocket<Build> {
    let user_service = UserService::new(pool.clone(), settings.auth.clone());
    let tour_service = TourService::new(pool.clone());
    let accommodation_service = AccommodationService::new(pool.clone());
    let catalog_service = CatalogService::new(pool.clone());
    let booking_service = BookingService::new(pool, settings.pricing.fee);

    rocket::build()
        .manage(settings.auth)
        .manage(user_service)
        .manage(tour_service)
        .manage(accommodation_service)
        .manage(catalog_service)
        .manage(booking_service)
        .mount(
            "/api",
            openapi_get_routes![
                routes::user_route::register,
                routes::user_route::login,
                routes::tour_route::list_tours,
                routes::tour_route::get_tour,
                routes::accommodation_route::list_accommodations,
                routes::accommodation_route::search_accommodations,
                routes::accommodation_route::get_accommodation,
                routes::accommodation_route::check_availability,
                routes::catalog_route::list_destinations,
                routes::catalog_route::list_tour_categories,
                routes::catalog_route::list_accommodation_categories,
                routes::catalog_route::enum_values,
                routes::booking_route::quote_booking,
                routes::booking_route::create_booking,
                routes::booking_route::list_my_bookings,
                routes::booking_route::get_booking,
                routes::booking_route::cancel_booking,
                routes::admin_route::create_tour,
                routes::admin_route::update_tour,
                routes::admin_route::delete_tour,
                routes::admin_route::update_accommodation_flags,
                routes::admin_route::update_booking_status,
            ],
        )
        .mount("/api", routes::preference_route::routes())
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .mount("/rapidoc", make_rapidoc(&rapidoc()))
        .register("/", routes::catchers())
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
