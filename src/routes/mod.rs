pub mod accommodation_route;
pub mod admin_route;
pub mod booking_route;
pub mod catalog_route;
pub mod preference_route;
pub mod tour_route;
pub mod user_route;

use crate::utils::error::{AppError, AppResult};
use chrono::NaiveDate;
use rocket::http::Status;
use rocket::serde::json::{json, Json, Value};
use rocket::{Catcher, Request};
use std::str::FromStr;

pub(crate) fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid {} format, expected YYYY-MM-DD", field)))
}

/// Ratings run from 0 to 5; anything else is a bad request.
pub(crate) fn check_min_rating(value: Option<f64>) -> AppResult<Option<f64>> {
    match value {
        Some(min) if !min.is_finite() || !(0.0..=5.0).contains(&min) => Err(AppError::BadRequest(
            "min_rating must be a number between 0 and 5".into(),
        )),
        other => Ok(other),
    }
}

/// Parse an optional enum-like query parameter, falling back to its default.
pub(crate) fn parse_choice<T>(value: Option<String>, field: &str) -> AppResult<T>
where
    T: FromStr + Default,
{
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(raw) => T::from_str(raw)
            .map_err(|_| AppError::BadRequest(format!("Unknown {} '{}'", field, raw))),
    }
}

#[catch(default)]
fn default_catcher(status: Status, _request: &Request) -> (Status, Json<Value>) {
    let message = match status.code {
        401 => "Authentication error: missing or invalid token",
        403 => "Forbidden",
        404 => "Not found",
        422 => "Unprocessable request body",
        _ => status.reason().unwrap_or("Unknown error"),
    };
    (status, Json(json!({ "error": message })))
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::listing::{PriceRange, TourSort};

    #[test]
    fn choices_default_when_absent_or_blank() {
        assert_eq!(parse_choice::<TourSort>(None, "sort").unwrap(), TourSort::Recommended);
        assert_eq!(parse_choice::<PriceRange>(Some(" ".into()), "price").unwrap(), PriceRange::Any);
        assert_eq!(
            parse_choice::<PriceRange>(Some("under-100".into()), "price").unwrap(),
            PriceRange::Under100
        );
        assert!(matches!(
            parse_choice::<TourSort>(Some("cheapest".into()), "sort"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn min_rating_must_be_a_real_rating() {
        assert_eq!(check_min_rating(None).unwrap(), None);
        assert_eq!(check_min_rating(Some(4.5)).unwrap(), Some(4.5));
        for bad in [f64::NAN, f64::INFINITY, -1.0, 5.5] {
            assert!(matches!(check_min_rating(Some(bad)), Err(AppError::BadRequest(_))));
        }
    }

    #[test]
    fn dates() {
        assert_eq!(
            parse_date("2024-06-01", "check_in").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(parse_date("01/06/2024", "check_in").is_err());
    }
}
