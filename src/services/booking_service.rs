use crate::models::booking::{Booking, BookingRequest, BookingStatus, BookingTarget};
use crate::models::user::Role;
use crate::policy::{self, Action, Collection, Principal};
use crate::services::pricing::{self, BookingQuote, FeePolicy, PricingBasis};
use crate::services::submission::SubmissionGuard;
use crate::utils::error::{sql_state, AppError, AppResult, RAISED_EXCEPTION};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const BOOKING_COLUMNS: &str = r#"
    id, user_id, accommodation_id, room_id, tour_id, check_in, check_out,
    adults, children, contact_name, contact_email, contact_phone,
    special_requests, subtotal, service_fee, total_price, status, created_at
"#;

pub struct BookingService {
    pool: PgPool,
    fee_policy: FeePolicy,
    submissions: SubmissionGuard,
}

/// Can `principal` cancel `booking` today?
pub fn check_cancellable(booking: &Booking, principal: &Principal, today: NaiveDate) -> AppResult<()> {
    if !booking.status.can_transition_to(BookingStatus::Cancelled) {
        return Err(AppError::Conflict(format!(
            "A {} booking cannot be cancelled",
            booking.status
        )));
    }
    if principal.role != Role::Admin && booking.check_in <= today {
        return Err(AppError::BadRequest(
            "Cannot cancel booking after or on check-in date".into(),
        ));
    }
    Ok(())
}

fn can_view(booking: &Booking, principal: &Principal) -> bool {
    principal.role == Role::Admin || booking.user_id == Some(principal.user_id)
}

impl BookingService {
    pub fn new(pool: PgPool, fee_policy: FeePolicy) -> Self {
        BookingService {
            pool,
            fee_policy,
            submissions: SubmissionGuard::new(),
        }
    }

    pub fn submissions(&self) -> &SubmissionGuard {
        &self.submissions
    }

    // Unit price of the target, checking the party fits
    async fn pricing_basis(&self, target: BookingTarget, guests: i32) -> AppResult<PricingBasis> {
        match target {
            BookingTarget::Accommodation {
                accommodation_id,
                room_id: None,
            } => {
                let (rate, has_rooms): (Decimal, bool) = sqlx::query_as(
                    r#"
                    SELECT a.price_per_night,
                           EXISTS (SELECT 1 FROM rooms r WHERE r.accommodation_id = a.id)
                    FROM accommodations a
                    WHERE a.id = $1 AND a.is_active
                    "#,
                )
                .bind(accommodation_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Accommodation not found".into()))?;

                // rooms carry the inventory, so a property with rooms is booked per room
                if has_rooms {
                    return Err(AppError::field("room_id", "choose a room for this property"));
                }
                Ok(PricingBasis::PerNight(rate))
            }
            BookingTarget::Accommodation {
                accommodation_id,
                room_id: Some(room_id),
            } => {
                let (rate, max_occupancy): (Decimal, i32) = sqlx::query_as(
                    r#"
                    SELECT r.price_per_night, r.max_occupancy
                    FROM rooms r
                    JOIN accommodations a ON a.id = r.accommodation_id
                    WHERE r.id = $1 AND r.accommodation_id = $2 AND a.is_active
                    "#,
                )
                .bind(room_id)
                .bind(accommodation_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Room not found".into()))?;

                if guests > max_occupancy {
                    return Err(AppError::field(
                        "room_id",
                        format!("this room sleeps at most {} guests", max_occupancy),
                    ));
                }
                Ok(PricingBasis::PerNight(rate))
            }
            BookingTarget::Tour { tour_id } => {
                let (price, max_group_size): (Decimal, Option<i32>) = sqlx::query_as(
                    "SELECT price, max_group_size FROM tours WHERE id = $1 AND is_active",
                )
                .bind(tour_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Tour not found".into()))?;

                if let Some(max) = max_group_size {
                    if guests > max {
                        return Err(AppError::field(
                            "adults",
                            format!("this tour takes at most {} guests", max),
                        ));
                    }
                }
                Ok(PricingBasis::PerPerson(price))
            }
        }
    }

    async fn quote_validated(&self, request: &BookingRequest) -> AppResult<BookingQuote> {
        let target = request
            .target()
            .ok_or_else(|| AppError::field("target", "nothing to book"))?;
        let basis = self
            .pricing_basis(target, request.adults + request.children)
            .await?;
        pricing::quote(
            request.check_in,
            request.check_out,
            basis,
            request.adults,
            request.children,
            self.fee_policy,
        )
    }

    pub async fn quote(&self, request: &BookingRequest) -> AppResult<BookingQuote> {
        request.validate()?;
        self.quote_validated(request).await
    }

    /// Validate, price and insert a booking through the `create_booking`
    /// procedure. Guests book with `principal == None`.
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        request: BookingRequest,
    ) -> AppResult<Booking> {
        // nothing reaches the database until the form is valid
        request.validate()?;
        policy::require(principal, Collection::Bookings, Action::Create)?;

        let _ticket = self.submissions.begin(request.submission_fingerprint())?;

        let quote = self.quote_validated(&request).await?;
        let target = request.target();

        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM create_booking($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
            BOOKING_COLUMNS
        ))
        .bind(principal.map(|p| p.user_id))
        .bind(request.accommodation_id)
        .bind(request.room_id)
        .bind(request.tour_id)
        .bind(request.check_in)
        .bind(request.check_out)
        .bind(request.adults)
        .bind(request.children)
        .bind(&request.contact_name)
        .bind(&request.contact_email)
        .bind(&request.contact_phone)
        .bind(&request.special_requests)
        .bind(quote.subtotal)
        .bind(quote.service_fee)
        .bind(quote.total)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if sql_state(&e).as_deref() == Some(RAISED_EXCEPTION) {
                let message = e
                    .as_database_error()
                    .map(|d| d.message().to_string())
                    .unwrap_or_else(|| "Not available".to_string());
                tracing::info!(?target, reason = %message, "booking refused");
                AppError::Conflict(message)
            } else {
                tracing::error!(?target, error = %e, "create_booking failed");
                AppError::from(e)
            }
        })?;

        tracing::info!(
            booking_id = %booking.id,
            total = %booking.total_price,
            guest = principal.is_none(),
            "booking created"
        );
        Ok(booking)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    // Other users' bookings look exactly like missing ones
    pub async fn get(&self, id: Uuid, principal: &Principal) -> AppResult<Booking> {
        match self.find(id).await? {
            Some(booking) if can_view(&booking, principal) => Ok(booking),
            _ => Err(AppError::NotFound("Booking not found".into())),
        }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE user_id = $1 ORDER BY check_in DESC",
            BOOKING_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    pub async fn cancel(&self, id: Uuid, principal: &Principal, today: NaiveDate) -> AppResult<Booking> {
        let booking = self.get(id, principal).await?;
        check_cancellable(&booking, principal, today)?;
        self.transition(booking, BookingStatus::Cancelled).await
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        next: BookingStatus,
        principal: &Principal,
    ) -> AppResult<Booking> {
        policy::require(Some(principal), Collection::Bookings, Action::Update)?;

        let booking = self
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if !booking.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Cannot move a {} booking to {}",
                booking.status, next
            )));
        }
        self.transition(booking, next).await
    }

    // Only applies if nobody changed the status in between
    async fn transition(&self, booking: Booking, next: BookingStatus) -> AppResult<Booking> {
        let updated = sqlx::query_as::<_, Booking>(&format!(
            "UPDATE bookings SET status = $3 WHERE id = $1 AND status = $2 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(booking.id)
        .bind(booking.status)
        .bind(next)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Conflict("Booking was modified concurrently".into()))?;

        tracing::info!(
            booking_id = %updated.id,
            from = %booking.status,
            to = %updated.status,
            "booking status changed"
        );
        Ok(updated)
    }
}
