//! Cookie-backed visitor preferences. These handlers take a `CookieJar`, so
//! they are mounted with plain `routes!` rather than through the OpenAPI
//! generator.

use crate::models::tour::TourListResponse;
use crate::services::tour_service::TourService;
use crate::state::persist::{self, TOUR_FILTERS_COOKIE, UI_STATE_COOKIE};
use crate::state::{CartItem, TourFilterState, UiState};
use crate::utils::error::{AppError, AppResult};
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::serde::json::Json;
use rocket::{Route, State};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

// A missing or unreadable cookie means a fresh visitor
fn load<T: DeserializeOwned + Default>(cookies: &CookieJar<'_>, name: &'static str) -> T {
    match cookies.get(name) {
        Some(cookie) => persist::decode(cookie.value()).unwrap_or_else(|e| {
            tracing::warn!(cookie = name, error = %e, "discarding persisted state");
            T::default()
        }),
        None => T::default(),
    }
}

fn store<T: Serialize>(cookies: &CookieJar<'_>, name: &'static str, state: &T) -> AppResult<()> {
    let value = persist::encode(state)?;
    cookies.add(
        Cookie::build((name, value))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true),
    );
    Ok(())
}

fn update_ui<F>(cookies: &CookieJar<'_>, change: F) -> Result<Json<UiState>, AppError>
where
    F: FnOnce(&mut UiState),
{
    let mut state: UiState = load(cookies, UI_STATE_COOKIE);
    change(&mut state);
    store(cookies, UI_STATE_COOKIE, &state)?;
    Ok(Json(state))
}

#[get("/preferences")]
fn get_preferences(cookies: &CookieJar<'_>) -> Json<UiState> {
    Json(load(cookies, UI_STATE_COOKIE))
}

#[put("/preferences", format = "json", data = "<state>")]
fn put_preferences(cookies: &CookieJar<'_>, state: Json<UiState>) -> Result<Json<UiState>, AppError> {
    let state = state.into_inner();
    store(cookies, UI_STATE_COOKIE, &state)?;
    Ok(Json(state))
}

#[post("/preferences/theme/toggle")]
fn toggle_theme(cookies: &CookieJar<'_>) -> Result<Json<UiState>, AppError> {
    update_ui(cookies, |state| {
        state.toggle_theme();
    })
}

#[post("/preferences/mobile-menu?<open>")]
fn set_mobile_menu(cookies: &CookieJar<'_>, open: bool) -> Result<Json<UiState>, AppError> {
    update_ui(cookies, |state| state.set_mobile_menu(open))
}

#[post("/preferences/favorites/<id>")]
fn toggle_favorite(cookies: &CookieJar<'_>, id: Uuid) -> Result<Json<UiState>, AppError> {
    update_ui(cookies, |state| {
        state.toggle_favorite(id);
    })
}

#[post("/preferences/cart", format = "json", data = "<item>")]
fn add_to_cart(cookies: &CookieJar<'_>, item: Json<CartItem>) -> Result<Json<UiState>, AppError> {
    if item.guests < 1 {
        return Err(AppError::field("guests", "at least one guest is required"));
    }
    update_ui(cookies, |state| state.add_to_cart(item.into_inner()))
}

#[delete("/preferences/cart/<id>")]
fn remove_from_cart(cookies: &CookieJar<'_>, id: Uuid) -> Result<Json<UiState>, AppError> {
    let mut state: UiState = load(cookies, UI_STATE_COOKIE);
    if !state.remove_from_cart(id) {
        return Err(AppError::NotFound("Item is not in the cart".into()));
    }
    store(cookies, UI_STATE_COOKIE, &state)?;
    Ok(Json(state))
}

#[delete("/preferences/cart")]
fn clear_cart(cookies: &CookieJar<'_>) -> Result<Json<UiState>, AppError> {
    update_ui(cookies, UiState::clear_cart)
}

#[get("/preferences/tour-filters")]
fn get_tour_filters(cookies: &CookieJar<'_>) -> Json<TourFilterState> {
    Json(load(cookies, TOUR_FILTERS_COOKIE))
}

#[put("/preferences/tour-filters", format = "json", data = "<state>")]
fn put_tour_filters(
    cookies: &CookieJar<'_>,
    state: Json<TourFilterState>,
) -> Result<Json<TourFilterState>, AppError> {
    let state = state.into_inner();
    store(cookies, TOUR_FILTERS_COOKIE, &state)?;
    Ok(Json(state))
}

#[delete("/preferences/tour-filters")]
fn reset_tour_filters(cookies: &CookieJar<'_>) -> Json<TourFilterState> {
    let mut state: TourFilterState = load(cookies, TOUR_FILTERS_COOKIE);
    state.reset();
    cookies.remove(Cookie::from(TOUR_FILTERS_COOKIE));
    Json(state)
}

/// Tours matching the visitor's saved filter
#[get("/tours/saved")]
async fn saved_tours(
    cookies: &CookieJar<'_>,
    tour_service: &State<TourService>,
) -> Result<Json<TourListResponse>, AppError> {
    let state: TourFilterState = load(cookies, TOUR_FILTERS_COOKIE);
    let tours = tour_service.list(&state.filter).await?;
    Ok(Json(TourListResponse {
        total: tours.len(),
        tours,
    }))
}

pub fn routes() -> Vec<Route> {
    routes![
        get_preferences,
        put_preferences,
        toggle_theme,
        set_mobile_menu,
        toggle_favorite,
        add_to_cart,
        remove_from_cart,
        clear_cart,
        get_tour_filters,
        put_tour_filters,
        reset_tour_filters,
        saved_tours,
    ]
}
