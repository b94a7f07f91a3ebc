use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, JsonSchema)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub accommodation_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub tour_id: Option<Uuid>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// What is being booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingTarget {
    Accommodation {
        accommodation_id: Uuid,
        room_id: Option<Uuid>,
    },
    Tour {
        tour_id: Uuid,
    },
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[validate(schema(function = "validate_booking_request"))]
pub struct BookingRequest {
    pub accommodation_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub tour_id: Option<Uuid>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, max = 20, message = "between 1 and 20 adults"))]
    pub adults: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 20, message = "between 0 and 20 children"))]
    pub children: i32,
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub contact_name: String,
    #[validate(email(message = "must be a valid email"))]
    pub contact_email: String,
    #[validate(length(min = 5, max = 32))]
    pub contact_phone: Option<String>,
    #[validate(length(max = 1000))]
    pub special_requests: Option<String>,
    /// Client-generated key identifying one form submission.
    pub submission_key: Option<Uuid>,
}

fn validate_booking_request(request: &BookingRequest) -> Result<(), ValidationError> {
    if request.check_out <= request.check_in {
        return Err(ValidationError::new("dates")
            .with_message("check-out must be after check-in".into()));
    }
    if request.target().is_none() {
        return Err(ValidationError::new("target").with_message(
            "book exactly one accommodation (optionally a room) or one tour".into(),
        ));
    }
    Ok(())
}

impl BookingRequest {
    pub fn target(&self) -> Option<BookingTarget> {
        match (self.accommodation_id, self.room_id, self.tour_id) {
            (Some(accommodation_id), room_id, None) => Some(BookingTarget::Accommodation {
                accommodation_id,
                room_id,
            }),
            (None, None, Some(tour_id)) => Some(BookingTarget::Tour { tour_id }),
            _ => None,
        }
    }

    /// Key identifying "the same submission" for duplicate detection.
    pub fn submission_fingerprint(&self) -> String {
        if let Some(key) = self.submission_key {
            return key.to_string();
        }
        let target = match self.target() {
            Some(BookingTarget::Accommodation {
                accommodation_id,
                room_id,
            }) => format!(
                "a:{}:{}",
                accommodation_id,
                room_id.map(|r| r.to_string()).unwrap_or_default()
            ),
            Some(BookingTarget::Tour { tour_id }) => format!("t:{}", tour_id),
            None => "none".to_string(),
        };
        format!(
            "{}|{}|{}|{}|{}+{}",
            self.contact_email.to_lowercase(),
            target,
            self.check_in,
            self.check_out,
            self.adults,
            self.children
        )
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StatusUpdateRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn request() -> BookingRequest {
        BookingRequest {
            accommodation_id: Some(Uuid::new_v4()),
            room_id: None,
            tour_id: None,
            check_in: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            adults: 2,
            children: 0,
            contact_name: "Amani Otieno".into(),
            contact_email: "amani@example.com".into(),
            contact_phone: None,
            special_requests: None,
            submission_key: None,
        }
    }

    #[test]
    fn transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Cancelled));
        for status in [Pending, Confirmed, Cancelled, Completed] {
            assert!(!status.can_transition_to(status));
            if status.is_terminal() {
                assert!([Pending, Confirmed, Cancelled, Completed]
                    .iter()
                    .all(|next| !status.can_transition_to(*next)));
            }
        }
    }

    #[test]
    fn status_strings() {
        assert_eq!(BookingStatus::Confirmed.to_string(), "confirmed");
        assert_eq!(BookingStatus::from_str("cancelled").unwrap(), BookingStatus::Cancelled);
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn checkout_must_follow_checkin() {
        let mut r = request();
        r.check_out = r.check_in;
        let errors = r.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("__all__"));
    }

    #[test]
    fn exactly_one_target() {
        let mut r = request();
        r.tour_id = Some(Uuid::new_v4());
        assert!(r.target().is_none());
        assert!(r.validate().is_err());

        let mut r = request();
        r.accommodation_id = None;
        r.room_id = Some(Uuid::new_v4());
        assert!(r.target().is_none());

        let mut r = request();
        r.accommodation_id = None;
        r.tour_id = Some(Uuid::new_v4());
        assert!(matches!(r.target(), Some(BookingTarget::Tour { .. })));
    }

    #[test]
    fn field_rules() {
        let mut r = request();
        r.adults = 0;
        r.contact_email = "nope".into();
        let errors = r.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("adults"));
        assert!(fields.contains_key("contact_email"));
    }

    #[test]
    fn fingerprint_prefers_submission_key() {
        let mut a = request();
        let mut b = a.clone();
        b.contact_email = "AMANI@example.com".into();
        assert_eq!(a.submission_fingerprint(), b.submission_fingerprint());

        let key = Uuid::new_v4();
        a.submission_key = Some(key);
        assert_eq!(a.submission_fingerprint(), key.to_string());
    }

    #[test]
    fn fingerprint_includes_party_size() {
        let a = request();
        let mut more_adults = a.clone();
        more_adults.adults = 3;
        let mut with_child = a.clone();
        with_child.children = 1;

        assert_ne!(a.submission_fingerprint(), more_adults.submission_fingerprint());
        assert_ne!(a.submission_fingerprint(), with_child.submission_fingerprint());
        assert_ne!(more_adults.submission_fingerprint(), with_child.submission_fingerprint());
    }
}
