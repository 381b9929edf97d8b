use crate::model::{
    Flight, FlightPatch, NewPayment, NewTicket, NewUser, Payment, PaymentPatch, Seat, SeatPatch,
    Ticket, TicketPatch, User, UserPatch,
};
use crate::DomainResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for user records, keyed by mobile number.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new: NewUser) -> DomainResult<User>;
    async fn list(&self) -> DomainResult<Vec<User>>;
    async fn get(&self, mobile_number: i64) -> DomainResult<User>;
    async fn update(&self, mobile_number: i64, patch: UserPatch) -> DomainResult<User>;
    /// Cascades: tickets for the user, then payments for those tickets and
    /// payments made by the user.
    async fn delete(&self, mobile_number: i64) -> DomainResult<()>;
}

/// Repository trait for flight records.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn create(&self, flight: Flight) -> DomainResult<Flight>;
    async fn list(&self) -> DomainResult<Vec<Flight>>;
    async fn get(&self, flight_id: &str) -> DomainResult<Flight>;
    async fn update(&self, flight_id: &str, patch: FlightPatch) -> DomainResult<Flight>;
    /// Cascades: seats on the flight, tickets for the flight or those seats,
    /// then payments for those tickets.
    async fn delete(&self, flight_id: &str) -> DomainResult<()>;
}

/// Repository trait for seat records.
#[async_trait]
pub trait SeatRepository: Send + Sync {
    async fn create(&self, seat: Seat) -> DomainResult<Seat>;
    async fn list(&self) -> DomainResult<Vec<Seat>>;
    async fn get(&self, seat_id: &str) -> DomainResult<Seat>;
    async fn update(&self, seat_id: &str, patch: SeatPatch) -> DomainResult<Seat>;
    /// Cascades: tickets for the seat, then their payments.
    async fn delete(&self, seat_id: &str) -> DomainResult<()>;
}

/// Repository trait for ticket records.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn create(&self, new: NewTicket) -> DomainResult<Ticket>;
    async fn list(&self) -> DomainResult<Vec<Ticket>>;
    async fn get(&self, ticket_id: Uuid) -> DomainResult<Ticket>;
    async fn update(&self, ticket_id: Uuid, patch: TicketPatch) -> DomainResult<Ticket>;
    /// Cascades: payments for the ticket.
    async fn delete(&self, ticket_id: Uuid) -> DomainResult<()>;
}

/// Repository trait for payment records.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, new: NewPayment) -> DomainResult<Payment>;
    async fn list(&self) -> DomainResult<Vec<Payment>>;
    async fn get(&self, payment_id: Uuid) -> DomainResult<Payment>;
    async fn update(&self, payment_id: Uuid, patch: PaymentPatch) -> DomainResult<Payment>;
    async fn delete(&self, payment_id: Uuid) -> DomainResult<()>;
}
