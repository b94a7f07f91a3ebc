use crate::services::listing::TourFilter;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The tour filter a visitor last applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TourFilterState {
    pub filter: TourFilter,
}

impl TourFilterState {
    pub fn new(filter: TourFilter) -> Self {
        Self { filter }
    }

    pub fn reset(&mut self) {
        self.filter = TourFilter::default();
    }

    pub fn is_default(&self) -> bool {
        self.filter == TourFilter::default()
    }
}
