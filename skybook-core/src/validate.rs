//! Field-level validation, run before every persist. Relational checks
//! (uniqueness, foreign keys) live in the storage engine, which owns the
//! data needed to answer them.

use crate::model::{Flight, Payment, Seat, Ticket, User};
use crate::{DomainError, DomainResult};

fn require(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(())
}

/// Structural email check: non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> DomainResult<()> {
    require("email", email)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::InvalidField {
            field: "email",
            reason: format!("not a valid email address: {email}"),
        });
    }
    Ok(())
}

pub fn validate_user(user: &User) -> DomainResult<()> {
    validate_email(&user.email)?;
    require("first_name", &user.first_name)?;
    require("address", &user.address)?;
    if user.password_hash.is_empty() {
        return Err(DomainError::MissingField("password"));
    }
    if user.mobile_number <= 0 {
        return Err(DomainError::InvalidField {
            field: "mobile_number",
            reason: "must be a positive number".into(),
        });
    }
    Ok(())
}

pub fn validate_flight(flight: &Flight) -> DomainResult<()> {
    require("flight_id", &flight.flight_id)?;
    require("airline_name", &flight.airline_name)?;
    require("destination", &flight.destination)?;
    if flight.no_of_seats < 0 {
        return Err(DomainError::InvalidField {
            field: "no_of_seats",
            reason: "must be non-negative".into(),
        });
    }
    if flight.available_seats < 0 {
        return Err(DomainError::InvalidField {
            field: "available_seats",
            reason: "must be non-negative".into(),
        });
    }
    if flight.available_seats > flight.no_of_seats {
        return Err(DomainError::InvalidField {
            field: "available_seats",
            reason: format!(
                "{} exceeds total seat count {}",
                flight.available_seats, flight.no_of_seats
            ),
        });
    }
    Ok(())
}

pub fn validate_seat(seat: &Seat) -> DomainResult<()> {
    require("seat_id", &seat.seat_id)?;
    require("flight_id", &seat.flight_id)?;
    require("cabin_class", &seat.cabin_class)?;
    match (seat.is_special, &seat.special_seat_type) {
        (true, None) => Err(DomainError::MissingField("special_seat_type")),
        (false, Some(_)) => Err(DomainError::InvalidField {
            field: "special_seat_type",
            reason: "only allowed when is_special is true".into(),
        }),
        _ => Ok(()),
    }
}

pub fn validate_ticket(ticket: &Ticket) -> DomainResult<()> {
    require("pnr", &ticket.pnr)?;
    require("passport_number", &ticket.passport_number)?;
    require("government_id_number", &ticket.government_id_number)?;
    if ticket.fare < 0.0 {
        return Err(DomainError::InvalidField {
            field: "fare",
            reason: format!("must be non-negative, got {}", ticket.fare),
        });
    }
    Ok(())
}

pub fn validate_payment(payment: &Payment) -> DomainResult<()> {
    require("transaction_id", &payment.transaction_id)?;
    Ok(())
}
