use crate::models::catalog::{AccommodationCategory, Destination, EnumValuesResponse, TourCategory};
use crate::utils::error::{AppError, AppResult};
use sqlx::PgPool;

#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        CatalogService { pool }
    }

    pub async fn destinations(&self) -> AppResult<Vec<Destination>> {
        let rows = sqlx::query_as::<_, Destination>(
            "SELECT id, slug, name, country, description FROM destinations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn tour_categories(&self) -> AppResult<Vec<TourCategory>> {
        let rows = sqlx::query_as::<_, TourCategory>(
            "SELECT id, slug, name, description FROM tour_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn accommodation_categories(&self) -> AppResult<Vec<AccommodationCategory>> {
        let rows = sqlx::query_as::<_, AccommodationCategory>(
            "SELECT id, slug, name, description FROM accommodation_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Labels of a database enum type, via the get_enum_values procedure
    pub async fn enum_values(&self, name: &str) -> AppResult<EnumValuesResponse> {
        let values: Vec<String> = sqlx::query_scalar("SELECT * FROM get_enum_values($1)")
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(enum_name = name, error = %e, "enum lookup failed"))?;

        if values.is_empty() {
            return Err(AppError::NotFound(format!("Unknown enum '{}'", name)));
        }

        Ok(EnumValuesResponse {
            name: name.to_string(),
            values,
        })
    }
}
