use crate::utils::error::{AppError, AppResult};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Service fee charged on top of the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FeePolicy {
    Flat(Decimal),
    Percent(Decimal),
}

impl FeePolicy {
    pub fn fee_for(&self, subtotal: Decimal) -> Decimal {
        let fee = match *self {
            FeePolicy::Flat(amount) => amount,
            FeePolicy::Percent(percent) => subtotal * percent / Decimal::ONE_HUNDRED,
        };
        round_cents(fee)
    }
}

/// What the unit price is charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingBasis {
    /// Accommodations: rate × nights × guests.
    PerNight(Decimal),
    /// Tours: price × guests, regardless of the number of nights.
    PerPerson(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct BookingQuote {
    pub nights: i64,
    pub guests: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub total: Decimal,
}

fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Whole nights between the two dates. Check-out must fall after check-in.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> AppResult<i64> {
    let nights = (check_out - check_in).num_days();
    if nights < 1 {
        return Err(AppError::field(
            "check_out",
            "check-out must be after check-in",
        ));
    }
    Ok(nights)
}

pub fn quote(
    check_in: NaiveDate,
    check_out: NaiveDate,
    basis: PricingBasis,
    adults: i32,
    children: i32,
    fee_policy: FeePolicy,
) -> AppResult<BookingQuote> {
    let nights = nights_between(check_in, check_out)?;

    if adults < 1 {
        return Err(AppError::field("adults", "at least one adult is required"));
    }
    if children < 0 {
        return Err(AppError::field("children", "cannot be negative"));
    }
    let guests = adults + children;

    let (unit_price, subtotal) = match basis {
        PricingBasis::PerNight(rate) => {
            (rate, rate * Decimal::from(nights) * Decimal::from(guests))
        }
        PricingBasis::PerPerson(price) => (price, price * Decimal::from(guests)),
    };
    let subtotal = round_cents(subtotal);
    let service_fee = fee_policy.fee_for(subtotal);

    Ok(BookingQuote {
        nights,
        guests,
        unit_price,
        subtotal,
        service_fee,
        total: subtotal + service_fee,
    })
}
