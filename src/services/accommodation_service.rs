use crate::models::accommodation::{
    Accommodation, AccommodationDetail, AccommodationFlags, AccommodationSearch, Review, Room,
};
use crate::models::catalog::Destination;
use crate::services::listing::{filter_accommodations, AccommodationFilter};
use crate::services::pricing::nights_between;
use crate::utils::error::{AppError, AppResult};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct AccommodationService {
    pool: PgPool,
}

impl AccommodationService {
    pub fn new(pool: PgPool) -> Self {
        AccommodationService { pool }
    }

    // Active accommodations, narrowed and ordered in memory
    pub async fn list(&self, filter: &AccommodationFilter) -> AppResult<Vec<Accommodation>> {
        let all = sqlx::query_as::<_, Accommodation>(
            "SELECT * FROM accommodation_listing WHERE is_active ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to load accommodations"))?;

        let filtered = filter_accommodations(&all, filter);
        tracing::debug!(total = all.len(), matched = filtered.len(), "filtered accommodations");
        Ok(filtered)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Accommodation>> {
        let accommodation =
            sqlx::query_as::<_, Accommodation>("SELECT * FROM accommodation_listing WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(accommodation)
    }

    /// Accommodation plus rooms, reviews and destination. `None` for unknown
    /// or inactive slugs.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Option<AccommodationDetail>> {
        let accommodation = sqlx::query_as::<_, Accommodation>(
            "SELECT * FROM accommodation_listing WHERE slug = $1 AND is_active",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(slug, error = %e, "failed to load accommodation"))?;

        let Some(accommodation) = accommodation else {
            return Ok(None);
        };

        let rooms = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, accommodation_id, name, description, max_occupancy,
                   price_per_night, amenities, images, available_quantity
            FROM rooms
            WHERE accommodation_id = $1
            ORDER BY price_per_night
            "#,
        )
        .bind(accommodation.id)
        .fetch_all(&self.pool);

        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, accommodation_id, author_name, rating, comment, created_at
            FROM reviews
            WHERE accommodation_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(accommodation.id)
        .fetch_all(&self.pool);

        let destination = async {
            match accommodation.destination_id {
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

        let (rooms, reviews, destination) = tokio::try_join!(rooms, reviews, destination)
            .inspect_err(|e| tracing::error!(slug, error = %e, "failed to load accommodation details"))?;

        Ok(Some(AccommodationDetail {
            accommodation,
            rooms,
            reviews,
            destination,
        }))
    }

    pub async fn room(&self, accommodation_id: Uuid, room_id: Uuid) -> AppResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, accommodation_id, name, description, max_occupancy,
                   price_per_night, amenities, images, available_quantity
            FROM rooms
            WHERE id = $1 AND accommodation_id = $2
            "#,
        )
        .bind(room_id)
        .bind(accommodation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(room)
    }

    // Delegates to the check_accommodation_availability procedure
    pub async fn check_availability(
        &self,
        accommodation_id: Uuid,
        room_id: Option<Uuid>,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> AppResult<bool> {
        nights_between(check_in, check_out)?;

        let available: bool = sqlx::query_scalar(
            "SELECT check_accommodation_availability($1, $2, $3, $4)",
        )
        .bind(accommodation_id)
        .bind(room_id)
        .bind(check_in)
        .bind(check_out)
        .fetch_one(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(%accommodation_id, error = %e, "availability check failed")
        })?;

        Ok(available)
    }

    // Delegates to the search_accommodations procedure
    pub async fn search(&self, params: &AccommodationSearch) -> AppResult<Vec<Accommodation>> {
        if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
            if min > max {
                return Err(AppError::BadRequest(
                    "min_price cannot exceed max_price".into(),
                ));
            }
        }

        let results = sqlx::query_as::<_, Accommodation>(
            "SELECT * FROM search_accommodations($1, $2, $3, $4, $5)",
        )
        .bind(params.query.as_deref().filter(|q| !q.trim().is_empty()))
        .bind(params.destination.as_deref())
        .bind(params.min_price)
        .bind(params.max_price)
        .bind(params.guests)
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "accommodation search failed"))?;

        Ok(results)
    }

    pub async fn update_flags(
        &self,
        id: Uuid,
        flags: &AccommodationFlags,
    ) -> AppResult<Option<Accommodation>> {
        if flags.is_empty() {
            return Err(AppError::BadRequest("no flags to update".into()));
        }

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE accommodations
            SET is_active = COALESCE($2, is_active),
                is_featured = COALESCE($3, is_featured),
                is_verified = COALESCE($4, is_verified)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(flags.is_active)
        .bind(flags.is_featured)
        .bind(flags.is_verified)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => {
                tracing::info!(accommodation_id = %id, ?flags, "accommodation flags updated");
                self.get_by_id(id).await
            }
            None => Ok(None),
        }
    }
}
