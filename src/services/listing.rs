//! In-memory filtering and sorting of tour and accommodation lists.
//!
//! Filters are applied one predicate after another and the survivors are
//! sorted with a stable sort, so equal keys keep their incoming order.

use crate::models::accommodation::Accommodation;
use crate::models::tour::Tour;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum_macros::{Display, EnumString};

/// Named price range; the upper bound is exclusive.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
pub enum PriceRange {
    #[default]
    #[serde(rename = "any")]
    #[strum(serialize = "any")]
    Any,
    #[serde(rename = "under-100")]
    #[strum(serialize = "under-100")]
    Under100,
    #[serde(rename = "100-200")]
    #[strum(serialize = "100-200")]
    From100To200,
    #[serde(rename = "200-500")]
    #[strum(serialize = "200-500")]
    From200To500,
    #[serde(rename = "500-plus")]
    #[strum(serialize = "500-plus")]
    Over500,
}

impl PriceRange {
    pub fn bounds(self) -> (Option<Decimal>, Option<Decimal>) {
        match self {
            PriceRange::Any => (None, None),
            PriceRange::Under100 => (None, Some(dec!(100))),
            PriceRange::From100To200 => (Some(dec!(100)), Some(dec!(200))),
            PriceRange::From200To500 => (Some(dec!(200)), Some(dec!(500))),
            PriceRange::Over500 => (Some(dec!(500)), None),
        }
    }

    pub fn contains(self, price: Decimal) -> bool {
        let (min, max) = self.bounds();
        min.map_or(true, |min| price >= min) && max.map_or(true, |max| price < max)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccommodationSort {
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
    Rating,
    Name,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TourSort {
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
    Rating,
    Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AccommodationFilter {
    pub query: Option<String>,
    pub category: Option<String>,
    pub destination: Option<String>,
    pub price: PriceRange,
    pub amenities: Vec<String>,
    pub min_rating: Option<f64>,
    pub sort: AccommodationSort,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TourFilter {
    pub query: Option<String>,
    pub category: Option<String>,
    pub destination: Option<String>,
    pub price: PriceRange,
    pub min_rating: Option<f64>,
    pub sort: TourSort,
}

/// Blank strings count as "no filter".
fn active(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn contains_text(haystack: Option<&str>, needle: &str) -> bool {
    haystack.map_or(false, |h| h.to_lowercase().contains(needle))
}

fn slug_matches(slug: Option<&str>, wanted: &str) -> bool {
    slug.map_or(false, |s| s.eq_ignore_ascii_case(wanted))
}

// A NaN threshold matches nothing
fn rating_at_least(rating: f64, min: f64) -> bool {
    !min.is_nan() && rating >= min
}

fn by_rating_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

impl AccommodationFilter {
    pub fn matches(&self, item: &Accommodation) -> bool {
        if let Some(q) = active(&self.query) {
            let hit = contains_text(Some(&item.name), &q)
                || contains_text(Some(&item.location), &q)
                || contains_text(item.description.as_deref(), &q);
            if !hit {
                return false;
            }
        }
        if let Some(category) = active(&self.category) {
            if !slug_matches(item.category_slug.as_deref(), &category) {
                return false;
            }
        }
        if let Some(destination) = active(&self.destination) {
            if !slug_matches(item.destination_slug.as_deref(), &destination) {
                return false;
            }
        }
        if !self.price.contains(item.price_per_night) {
            return false;
        }
        let has_all_amenities = self.amenities.iter().all(|wanted| {
            item.amenities
                .iter()
                .any(|a| a.trim().eq_ignore_ascii_case(wanted.trim()))
        });
        if !has_all_amenities {
            return false;
        }
        if let Some(min) = self.min_rating {
            if !rating_at_least(item.rating, min) {
                return false;
            }
        }
        true
    }
}

impl TourFilter {
    pub fn matches(&self, tour: &Tour) -> bool {
        if let Some(q) = active(&self.query) {
            let hit = contains_text(Some(&tour.title), &q)
                || contains_text(tour.destination_name.as_deref(), &q)
                || contains_text(tour.description.as_deref(), &q);
            if !hit {
                return false;
            }
        }
        if let Some(category) = active(&self.category) {
            if !slug_matches(tour.category_slug.as_deref(), &category) {
                return false;
            }
        }
        if let Some(destination) = active(&self.destination) {
            if !slug_matches(tour.destination_slug.as_deref(), &destination) {
                return false;
            }
        }
        if !self.price.contains(tour.price) {
            return false;
        }
        if let Some(min) = self.min_rating {
            if !rating_at_least(tour.rating, min) {
                return false;
            }
        }
        true
    }
}

pub fn filter_accommodations(items: &[Accommodation], filter: &AccommodationFilter) -> Vec<Accommodation> {
    let mut result: Vec<Accommodation> = items.iter().filter(|a| filter.matches(a)).cloned().collect();

    match filter.sort {
        // featured first, otherwise keep the incoming order
        AccommodationSort::Recommended => result.sort_by_key(|a| !a.is_featured),
        AccommodationSort::PriceAsc => result.sort_by(|a, b| a.price_per_night.cmp(&b.price_per_night)),
        AccommodationSort::PriceDesc => result.sort_by(|a, b| b.price_per_night.cmp(&a.price_per_night)),
        AccommodationSort::Rating => result.sort_by(|a, b| by_rating_desc(a.rating, b.rating)),
        AccommodationSort::Name => result.sort_by_key(|a| a.name.to_lowercase()),
    }
    result
}

pub fn filter_tours(tours: &[Tour], filter: &TourFilter) -> Vec<Tour> {
    let mut result: Vec<Tour> = tours.iter().filter(|t| filter.matches(t)).cloned().collect();

    match filter.sort {
        TourSort::Recommended => result.sort_by_key(|t| !t.is_featured),
        TourSort::PriceAsc => result.sort_by(|a, b| a.price.cmp(&b.price)),
        TourSort::PriceDesc => result.sort_by(|a, b| b.price.cmp(&a.price)),
        TourSort::Rating => result.sort_by(|a, b| by_rating_desc(a.rating, b.rating)),
        TourSort::Duration => result.sort_by_key(|t| t.duration_days),
    }
    result
}
