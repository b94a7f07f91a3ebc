use async_trait::async_trait;
use chrono::NaiveDate;
use ctor::dtor;
use rust_decimal_macros::dec;
use safari_booking::{
    config::Settings,
    models::booking::{BookingRequest, BookingStatus},
    models::user::{Role, UserRegistrationRequest},
    policy::Principal,
    services::booking_service::BookingService,
    services::pricing::FeePolicy,
    services::user_service::UserService,
    utils::error::AppError,
};
use sqlx::postgres::PgPool as Pool;
use test_context::{test_context, AsyncTestContext};
use uuid::Uuid;

mod common {
    pub mod test_utils;
}
use common::test_utils::{self, TestDb};

struct BookingServiceContext {
    pool: Pool,
    booking_service: BookingService,
    user_service: UserService,
}

#[dtor]
fn cleanup() {
    if let Err(e) = TestDb::cleanup_database_sync() {
        eprintln!("Failed to cleanup test database: {}", e);
    }
}

#[async_trait]
impl AsyncTestContext for BookingServiceContext {
    async fn setup() -> Self {
        let pool = TestDb::get_instance()
            .await
            .expect("Failed to get test database instance");

        let booking_service = BookingService::new(pool.clone(), FeePolicy::Percent(dec!(10)));
        let user_service = UserService::new(pool.clone(), Settings::default().auth);

        BookingServiceContext {
            pool,
            booking_service,
            user_service,
        }
    }

    async fn teardown(self) {
        self.pool.close().await;
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn request(check_in: NaiveDate, check_out: NaiveDate, adults: i32) -> BookingRequest {
    BookingRequest {
        accommodation_id: None,
        room_id: None,
        tour_id: None,
        check_in,
        check_out,
        adults,
        children: 0,
        contact_name: "Neema Traveller".to_string(),
        contact_email: format!("{}@example.com", Uuid::new_v4().simple()),
        contact_phone: None,
        special_requests: None,
        submission_key: None,
    }
}

impl BookingServiceContext {
    async fn customer(&self) -> Principal {
        let user_id = self
            .user_service
            .register_user(UserRegistrationRequest {
                email: format!("{}@example.com", Uuid::new_v4().simple()),
                password: "kilimanjaro".to_string(),
                full_name: "Booking Customer".to_string(),
            })
            .await
            .expect("Failed to register customer");
        Principal {
            user_id,
            role: Role::Customer,
        }
    }
}

#[test_context(BookingServiceContext)]
#[tokio::test]
#[ignore = "needs a Postgres instance at TEST_DATABASE_URL"]
async fn test_guest_room_booking_is_priced_and_stored(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let (lodge, _) = test_utils::insert_accommodation(&ctx.pool, "Acacia Camp", dec!(180), None).await?;
    let room = test_utils::insert_room(&ctx.pool, lodge, dec!(150), 2, 3).await?;

    let mut req = request(date(2031, 7, 1), date(2031, 7, 3), 2);
    req.accommodation_id = Some(lodge);
    req.room_id = Some(room);

    let booking = ctx.booking_service.create(None, req).await?;

    // 150 x 2 nights x 2 guests, plus 10%
    assert_eq!(booking.subtotal, dec!(600));
    assert_eq!(booking.service_fee, dec!(60));
    assert_eq!(booking.total_price, dec!(660));
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.user_id, None);
    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
#[ignore = "needs a Postgres instance at TEST_DATABASE_URL"]
async fn test_last_room_cannot_be_booked_twice(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let (lodge, _) = test_utils::insert_accommodation(&ctx.pool, "Baobab Lodge", dec!(90), None).await?;
    let room = test_utils::insert_room(&ctx.pool, lodge, dec!(90), 2, 1).await?;

    let mut first = request(date(2031, 8, 10), date(2031, 8, 14), 1);
    first.accommodation_id = Some(lodge);
    first.room_id = Some(room);
    ctx.booking_service.create(None, first).await?;

    // overlaps the last two nights
    let mut second = request(date(2031, 8, 12), date(2031, 8, 15), 1);
    second.accommodation_id = Some(lodge);
    second.room_id = Some(room);
    let result = ctx.booking_service.create(None, second).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    // back-to-back stays do not overlap
    let mut third = request(date(2031, 8, 14), date(2031, 8, 16), 1);
    third.accommodation_id = Some(lodge);
    third.room_id = Some(room);
    assert!(ctx.booking_service.create(None, third).await.is_ok());
    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
#[ignore = "needs a Postgres instance at TEST_DATABASE_URL"]
async fn test_room_occupancy_is_enforced(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let (lodge, _) = test_utils::insert_accommodation(&ctx.pool, "Kopje Tents", dec!(120), None).await?;
    let room = test_utils::insert_room(&ctx.pool, lodge, dec!(120), 2, 1).await?;

    let mut req = request(date(2031, 9, 1), date(2031, 9, 2), 3);
    req.accommodation_id = Some(lodge);
    req.room_id = Some(room);

    match ctx.booking_service.create(None, req).await {
        Err(AppError::InvalidFields(fields)) => assert!(fields.contains_key("room_id")),
        other => panic!("expected occupancy error, got {:?}", other),
    }
    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
#[ignore = "needs a Postgres instance at TEST_DATABASE_URL"]
async fn test_tour_booking_is_priced_per_person(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let (tour, _) = test_utils::insert_tour(&ctx.pool, "Great Migration", dec!(1200), Some(6)).await?;
    let customer = ctx.customer().await;

    let mut req = request(date(2031, 10, 5), date(2031, 10, 8), 2);
    req.tour_id = Some(tour);
    req.children = 1;

    let quote = ctx.booking_service.quote(&req).await?;
    assert_eq!(quote.subtotal, dec!(3600));
    assert_eq!(quote.total, dec!(3960));

    let booking = ctx.booking_service.create(Some(&customer), req).await?;
    assert_eq!(booking.total_price, dec!(3960));
    assert_eq!(booking.user_id, Some(customer.user_id));

    let mine = ctx.booking_service.list_for_user(customer.user_id).await?;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, booking.id);
    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
#[ignore = "needs a Postgres instance at TEST_DATABASE_URL"]
async fn test_duplicate_submission_is_rejected(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let (tour, _) = test_utils::insert_tour(&ctx.pool, "Crater Descent", dec!(300), None).await?;

    let mut req = request(date(2031, 11, 1), date(2031, 11, 2), 1);
    req.tour_id = Some(tour);
    req.submission_key = Some(Uuid::new_v4());

    // simulate a first click still being processed
    let ticket = ctx
        .booking_service
        .submissions()
        .begin(req.submission_fingerprint())?;
    let result = ctx.booking_service.create(None, req.clone()).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    drop(ticket);
    assert!(ctx.booking_service.create(None, req).await.is_ok());
    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
#[ignore = "needs a Postgres instance at TEST_DATABASE_URL"]
async fn test_owner_cancels_and_others_cannot_see(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let (tour, _) = test_utils::insert_tour(&ctx.pool, "Walking Safari", dec!(80), None).await?;
    let owner = ctx.customer().await;
    let stranger = ctx.customer().await;

    let mut req = request(date(2031, 12, 1), date(2031, 12, 2), 1);
    req.tour_id = Some(tour);
    let booking = ctx.booking_service.create(Some(&owner), req).await?;

    let hidden = ctx.booking_service.get(booking.id, &stranger).await;
    assert!(matches!(hidden, Err(AppError::NotFound(_))));

    let today = date(2031, 11, 1);
    let cancelled = ctx.booking_service.cancel(booking.id, &owner, today).await?;
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let again = ctx.booking_service.cancel(booking.id, &owner, today).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
#[ignore = "needs a Postgres instance at TEST_DATABASE_URL"]
async fn test_admin_status_transitions(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let (tour, _) = test_utils::insert_tour(&ctx.pool, "Balloon Flight", dec!(550), None).await?;
    let admin = Principal {
        user_id: Uuid::new_v4(),
        role: Role::Admin,
    };

    let mut req = request(date(2032, 1, 10), date(2032, 1, 11), 2);
    req.tour_id = Some(tour);
    let booking = ctx.booking_service.create(None, req).await?;

    let confirmed = ctx
        .booking_service
        .update_status(booking.id, BookingStatus::Confirmed, &admin)
        .await?;
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let backwards = ctx
        .booking_service
        .update_status(booking.id, BookingStatus::Pending, &admin)
        .await;
    assert!(matches!(backwards, Err(AppError::Conflict(_))));

    let completed = ctx
        .booking_service
        .update_status(booking.id, BookingStatus::Completed, &admin)
        .await?;
    assert_eq!(completed.status, BookingStatus::Completed);

    let missing = ctx
        .booking_service
        .update_status(Uuid::new_v4(), BookingStatus::Confirmed, &admin)
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
#[ignore = "needs a Postgres instance at TEST_DATABASE_URL"]
async fn test_property_with_rooms_cannot_be_booked_without_a_room(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let (lodge, _) = test_utils::insert_accommodation(&ctx.pool, "Single Banda", dec!(140), None).await?;
    let room = test_utils::insert_room(&ctx.pool, lodge, dec!(140), 2, 1).await?;

    for _ in 0..3 {
        let mut req = request(date(2032, 3, 1), date(2032, 3, 4), 1);
        req.accommodation_id = Some(lodge);
        match ctx.booking_service.create(None, req).await {
            Err(AppError::InvalidFields(fields)) => assert!(fields.contains_key("room_id")),
            other => panic!("expected a room_id error, got {:?}", other),
        }
    }

    let stored: i64 = sqlx::query_scalar("SELECT count(*) FROM bookings WHERE accommodation_id = $1")
        .bind(lodge)
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(stored, 0);

    // the single unit is still there to be booked by room
    let mut by_room = request(date(2032, 3, 1), date(2032, 3, 4), 1);
    by_room.accommodation_id = Some(lodge);
    by_room.room_id = Some(room);
    ctx.booking_service.create(None, by_room).await?;

    let mut overlapping = request(date(2032, 3, 2), date(2032, 3, 3), 1);
    overlapping.accommodation_id = Some(lodge);
    overlapping.room_id = Some(room);
    let result = ctx.booking_service.create(None, overlapping).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
#[ignore = "needs a Postgres instance at TEST_DATABASE_URL"]
async fn test_property_without_rooms_books_at_its_nightly_rate(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let (lodge, _) = test_utils::insert_accommodation(&ctx.pool, "Fly Camp", dec!(100), None).await?;

    let mut req = request(date(2032, 4, 1), date(2032, 4, 3), 1);
    req.accommodation_id = Some(lodge);
    let booking = ctx.booking_service.create(None, req).await?;

    assert_eq!(booking.room_id, None);
    assert_eq!(booking.subtotal, dec!(200));
    assert_eq!(booking.total_price, dec!(220));
    Ok(())
}
