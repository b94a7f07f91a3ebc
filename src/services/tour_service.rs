use crate::models::catalog::{Destination, TourCategory};
use crate::models::tour::{CreateTourRequest, Tour, TourDetail, TourRow, UpdateTourRequest};
use crate::services::listing::{filter_tours, TourFilter};
use crate::utils::error::{
    sql_state, AppError, AppResult, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION,
};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct TourService {
    pool: PgPool,
}

impl TourService {
    pub fn new(pool: PgPool) -> Self {
        TourService { pool }
    }

    pub async fn list(&self, filter: &TourFilter) -> AppResult<Vec<Tour>> {
        let rows = sqlx::query_as::<_, TourRow>(
            "SELECT * FROM tour_listing WHERE is_active ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to load tours"))?;

        let tours = rows
            .into_iter()
            .map(Tour::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(filter_tours(&tours, filter))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Tour>> {
        sqlx::query_as::<_, TourRow>("SELECT * FROM tour_listing WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Tour::try_from)
            .transpose()
    }

    /// Tour with its category and destination, or `None` for unknown or
    /// inactive slugs.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Option<TourDetail>> {
        let row = sqlx::query_as::<_, TourRow>(
            "SELECT * FROM tour_listing WHERE slug = $1 AND is_active",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(slug, error = %e, "failed to load tour"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let tour = Tour::try_from(row)?;

        let category = async {
            match tour.category_id {
                Some(id) => {
                    sqlx::query_as::<_, TourCategory>(
                        "SELECT id, slug, name, description FROM tour_categories WHERE id = $1",
                    )
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                }
                None => Ok(None),
            }
        };
        let destination = async {
            match tour.destination_id {
                Some(id) => {
                    sqlx::query_as::<_, Destination>(
                        "SELECT id, slug, name, country, description FROM destinations WHERE id = $1",
                    )
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                }
                None => Ok(None),
            }
        };

        let (category, destination) = tokio::try_join!(category, destination)?;

        Ok(Some(TourDetail {
            tour,
            category,
            destination,
        }))
    }

    pub async fn create(&self, request: CreateTourRequest) -> AppResult<Tour> {
        request.validate()?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO tours (
                slug, title, description, images, price, original_price,
                discount_percent, duration_days, max_group_size, itinerary,
                category_id, destination_id, is_active, is_featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id
            "#,
        )
        .bind(&request.slug)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.images)
        .bind(request.price)
        .bind(request.original_price)
        .bind(request.discount_percent)
        .bind(request.duration_days)
        .bind(request.max_group_size)
        .bind(Json(&request.itinerary))
        .bind(request.category_id)
        .bind(request.destination_id)
        .bind(request.is_active)
        .bind(request.is_featured)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match sql_state(&e).as_deref() {
            Some(UNIQUE_VIOLATION) => {
                AppError::Conflict(format!("a tour with slug '{}' already exists", request.slug))
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                AppError::BadRequest("unknown category or destination".into())
            }
            _ => AppError::from(e),
        })?;

        tracing::info!(tour_id = %id, slug = %request.slug, "tour created");
        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tour not found".into()))
    }

    pub async fn update(&self, id: Uuid, request: UpdateTourRequest) -> AppResult<Tour> {
        request.validate()?;

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE tours
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                images = COALESCE($4, images),
                price = COALESCE($5, price),
                original_price = COALESCE($6, original_price),
                discount_percent = COALESCE($7, discount_percent),
                duration_days = COALESCE($8, duration_days),
                max_group_size = COALESCE($9, max_group_size),
                itinerary = COALESCE($10, itinerary),
                category_id = COALESCE($11, category_id),
                destination_id = COALESCE($12, destination_id),
                is_active = COALESCE($13, is_active),
                is_featured = COALESCE($14, is_featured)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.images)
        .bind(request.price)
        .bind(request.original_price)
        .bind(request.discount_percent)
        .bind(request.duration_days)
        .bind(request.max_group_size)
        .bind(request.itinerary.as_ref().map(Json))
        .bind(request.category_id)
        .bind(request.destination_id)
        .bind(request.is_active)
        .bind(request.is_featured)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match sql_state(&e).as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => {
                AppError::BadRequest("unknown category or destination".into())
            }
            _ => AppError::from(e),
        })?
        .ok_or_else(|| AppError::NotFound("Tour not found".into()))?;

        tracing::info!(tour_id = %updated, "tour updated");
        self.get_by_id(updated)
            .await?
            .ok_or_else(|| AppError::NotFound("Tour not found".into()))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match sql_state(&e).as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => AppError::Conflict(
                    "Tour has bookings; deactivate it instead".into(),
                ),
                _ => AppError::from(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tour not found".into()));
        }
        tracing::info!(tour_id = %id, "tour deleted");
        Ok(())
    }
}
