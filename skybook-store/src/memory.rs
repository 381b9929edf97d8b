//! In-process storage engine. One table per entity behind a single lock, so
//! every CRUD call (including its cascade) is an atomic unit of work and
//! concurrent writes serialize.

use async_trait::async_trait;
use skybook_core::model::{
    Flight, FlightPatch, NewPayment, NewTicket, NewUser, Payment, PaymentPatch, Seat, SeatPatch,
    Ticket, TicketPatch, User, UserPatch,
};
use skybook_core::repository::{
    FlightRepository, PaymentRepository, SeatRepository, TicketRepository, UserRepository,
};
use skybook_core::validate;
use skybook_core::{DomainError, DomainResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<i64, User>,
    flights: HashMap<String, Flight>,
    seats: HashMap<String, Seat>,
    tickets: HashMap<Uuid, Ticket>,
    payments: HashMap<Uuid, Payment>,
}

pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Tables {
    fn check_email_unique(&self, email: &str, exclude: Option<i64>) -> DomainResult<()> {
        let taken = self.users.values().any(|u| {
            u.email.eq_ignore_ascii_case(email) && Some(u.mobile_number) != exclude
        });
        if taken {
            return Err(DomainError::Conflict(format!(
                "a user with email {email} already exists"
            )));
        }
        Ok(())
    }

    fn check_ticket_refs(&self, ticket: &Ticket) -> DomainResult<()> {
        if !self.users.contains_key(&ticket.user_id) {
            return Err(DomainError::Reference(format!(
                "user {} does not exist",
                ticket.user_id
            )));
        }
        if !self.flights.contains_key(&ticket.flight_id) {
            return Err(DomainError::Reference(format!(
                "flight {} does not exist",
                ticket.flight_id
            )));
        }
        let seat = self.seats.get(&ticket.seat_id).ok_or_else(|| {
            DomainError::Reference(format!("seat {} does not exist", ticket.seat_id))
        })?;
        if seat.flight_id != ticket.flight_id {
            return Err(DomainError::Reference(format!(
                "seat {} belongs to flight {}, not flight {}",
                ticket.seat_id, seat.flight_id, ticket.flight_id
            )));
        }
        Ok(())
    }

    /// Remove payments referencing the ticket. Returns the number removed.
    fn cascade_ticket(&mut self, ticket_id: Uuid) -> usize {
        let before = self.payments.len();
        self.payments.retain(|_, p| p.ticket_id != ticket_id);
        before - self.payments.len()
    }

    /// Remove tickets referencing the seat, and their payments.
    fn cascade_seat(&mut self, seat_id: &str) -> (usize, usize) {
        let doomed: Vec<Uuid> = self
            .tickets
            .values()
            .filter(|t| t.seat_id == seat_id)
            .map(|t| t.ticket_id)
            .collect();
        let mut payments = 0;
        for ticket_id in &doomed {
            self.tickets.remove(ticket_id);
            payments += self.cascade_ticket(*ticket_id);
        }
        (doomed.len(), payments)
    }

    /// Remove seats on the flight, tickets referencing the flight or those
    /// seats, and payments for the removed tickets.
    fn cascade_flight(&mut self, flight_id: &str) -> (usize, usize, usize) {
        let seat_ids: Vec<String> = self
            .seats
            .values()
            .filter(|s| s.flight_id == flight_id)
            .map(|s| s.seat_id.clone())
            .collect();
        let mut tickets = 0;
        let mut payments = 0;
        for seat_id in &seat_ids {
            self.seats.remove(seat_id);
            let (t, p) = self.cascade_seat(seat_id);
            tickets += t;
            payments += p;
        }
        // Tickets may reference the flight through a seat that no longer exists
        let doomed: Vec<Uuid> = self
            .tickets
            .values()
            .filter(|t| t.flight_id == flight_id)
            .map(|t| t.ticket_id)
            .collect();
        for ticket_id in &doomed {
            self.tickets.remove(ticket_id);
            payments += self.cascade_ticket(*ticket_id);
            tickets += 1;
        }
        (seat_ids.len(), tickets, payments)
    }

    /// Remove tickets held by the user, their payments, and payments the
    /// user made against other tickets.
    fn cascade_user(&mut self, mobile_number: i64) -> (usize, usize) {
        let doomed: Vec<Uuid> = self
            .tickets
            .values()
            .filter(|t| t.user_id == mobile_number)
            .map(|t| t.ticket_id)
            .collect();
        let mut payments = 0;
        for ticket_id in &doomed {
            self.tickets.remove(ticket_id);
            payments += self.cascade_ticket(*ticket_id);
        }
        let before = self.payments.len();
        self.payments.retain(|_, p| p.user_id != mobile_number);
        payments += before - self.payments.len();
        (doomed.len(), payments)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new: NewUser) -> DomainResult<User> {
        if new.password.trim().is_empty() {
            return Err(DomainError::MissingField("password"));
        }
        let user = User::from_new(new);
        validate::validate_user(&user)?;

        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.mobile_number) {
            return Err(DomainError::Conflict(format!(
                "a user with mobile number {} already exists",
                user.mobile_number
            )));
        }
        tables.check_email_unique(&user.email, None)?;
        tables.users.insert(user.mobile_number, user.clone());
        info!(mobile_number = user.mobile_number, "created user");
        Ok(user)
    }

    async fn list(&self) -> DomainResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| u.mobile_number);
        Ok(users)
    }

    async fn get(&self, mobile_number: i64) -> DomainResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&mobile_number)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("user {mobile_number}")))
    }

    async fn update(&self, mobile_number: i64, patch: UserPatch) -> DomainResult<User> {
        let mut tables = self.tables.write().await;
        let mut user = tables
            .users
            .get(&mobile_number)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("user {mobile_number}")))?;
        user.apply(patch);
        validate::validate_user(&user)?;
        tables.check_email_unique(&user.email, Some(mobile_number))?;
        tables.users.insert(mobile_number, user.clone());
        Ok(user)
    }

    async fn delete(&self, mobile_number: i64) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&mobile_number).is_none() {
            return Err(DomainError::NotFound(format!("user {mobile_number}")));
        }
        let (tickets, payments) = tables.cascade_user(mobile_number);
        info!(mobile_number, tickets, payments, "deleted user with cascade");
        Ok(())
    }
}

#[async_trait]
impl FlightRepository for MemoryStore {
    async fn create(&self, flight: Flight) -> DomainResult<Flight> {
        validate::validate_flight(&flight)?;
        let mut tables = self.tables.write().await;
        if tables.flights.contains_key(&flight.flight_id) {
            return Err(DomainError::Conflict(format!(
                "flight {} already exists",
                flight.flight_id
            )));
        }
        tables
            .flights
            .insert(flight.flight_id.clone(), flight.clone());
        info!(flight_id = %flight.flight_id, "created flight");
        Ok(flight)
    }

    async fn list(&self) -> DomainResult<Vec<Flight>> {
        let tables = self.tables.read().await;
        let mut flights: Vec<Flight> = tables.flights.values().cloned().collect();
        flights.sort_by(|a, b| a.flight_id.cmp(&b.flight_id));
        Ok(flights)
    }

    async fn get(&self, flight_id: &str) -> DomainResult<Flight> {
        let tables = self.tables.read().await;
        tables
            .flights
            .get(flight_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("flight {flight_id}")))
    }

    async fn update(&self, flight_id: &str, patch: FlightPatch) -> DomainResult<Flight> {
        let mut tables = self.tables.write().await;
        let mut flight = tables
            .flights
            .get(flight_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("flight {flight_id}")))?;
        flight.apply(patch);
        validate::validate_flight(&flight)?;
        tables.flights.insert(flight_id.to_owned(), flight.clone());
        Ok(flight)
    }

    async fn delete(&self, flight_id: &str) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if tables.flights.remove(flight_id).is_none() {
            return Err(DomainError::NotFound(format!("flight {flight_id}")));
        }
        let (seats, tickets, payments) = tables.cascade_flight(flight_id);
        info!(flight_id, seats, tickets, payments, "deleted flight with cascade");
        Ok(())
    }
}

#[async_trait]
impl SeatRepository for MemoryStore {
    async fn create(&self, seat: Seat) -> DomainResult<Seat> {
        validate::validate_seat(&seat)?;
        let mut tables = self.tables.write().await;
        if tables.seats.contains_key(&seat.seat_id) {
            return Err(DomainError::Conflict(format!(
                "seat {} already exists",
                seat.seat_id
            )));
        }
        if !tables.flights.contains_key(&seat.flight_id) {
            return Err(DomainError::Reference(format!(
                "flight {} does not exist",
                seat.flight_id
            )));
        }
        tables.seats.insert(seat.seat_id.clone(), seat.clone());
        info!(seat_id = %seat.seat_id, flight_id = %seat.flight_id, "created seat");
        Ok(seat)
    }

    async fn list(&self) -> DomainResult<Vec<Seat>> {
        let tables = self.tables.read().await;
        let mut seats: Vec<Seat> = tables.seats.values().cloned().collect();
        seats.sort_by(|a, b| a.seat_id.cmp(&b.seat_id));
        Ok(seats)
    }

    async fn get(&self, seat_id: &str) -> DomainResult<Seat> {
        let tables = self.tables.read().await;
        tables
            .seats
            .get(seat_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("seat {seat_id}")))
    }

    async fn update(&self, seat_id: &str, patch: SeatPatch) -> DomainResult<Seat> {
        let mut tables = self.tables.write().await;
        let mut seat = tables
            .seats
            .get(seat_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("seat {seat_id}")))?;
        seat.apply(patch);
        validate::validate_seat(&seat)?;
        if !tables.flights.contains_key(&seat.flight_id) {
            return Err(DomainError::Reference(format!(
                "flight {} does not exist",
                seat.flight_id
            )));
        }
        // Moving the seat to another flight would orphan existing tickets
        if let Some(ticket) = tables
            .tickets
            .values()
            .find(|t| t.seat_id == seat_id && t.flight_id != seat.flight_id)
        {
            return Err(DomainError::Reference(format!(
                "ticket {} books seat {} on flight {}",
                ticket.ticket_id, seat_id, ticket.flight_id
            )));
        }
        tables.seats.insert(seat_id.to_owned(), seat.clone());
        Ok(seat)
    }

    async fn delete(&self, seat_id: &str) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if tables.seats.remove(seat_id).is_none() {
            return Err(DomainError::NotFound(format!("seat {seat_id}")));
        }
        let (tickets, payments) = tables.cascade_seat(seat_id);
        info!(seat_id, tickets, payments, "deleted seat with cascade");
        Ok(())
    }
}

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn create(&self, new: NewTicket) -> DomainResult<Ticket> {
        let ticket = Ticket::from_new(new);
        validate::validate_ticket(&ticket)?;
        let mut tables = self.tables.write().await;
        tables.check_ticket_refs(&ticket)?;
        tables.tickets.insert(ticket.ticket_id, ticket.clone());
        info!(ticket_id = %ticket.ticket_id, pnr = %ticket.pnr, "created ticket");
        Ok(ticket)
    }

    async fn list(&self) -> DomainResult<Vec<Ticket>> {
        let tables = self.tables.read().await;
        let mut tickets: Vec<Ticket> = tables.tickets.values().cloned().collect();
        tickets.sort_by_key(|t| t.ticket_id);
        Ok(tickets)
    }

    async fn get(&self, ticket_id: Uuid) -> DomainResult<Ticket> {
        let tables = self.tables.read().await;
        tables
            .tickets
            .get(&ticket_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("ticket {ticket_id}")))
    }

    async fn update(&self, ticket_id: Uuid, patch: TicketPatch) -> DomainResult<Ticket> {
        let mut tables = self.tables.write().await;
        let mut ticket = tables
            .tickets
            .get(&ticket_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("ticket {ticket_id}")))?;
        ticket.apply(patch);
        validate::validate_ticket(&ticket)?;
        tables.check_ticket_refs(&ticket)?;
        tables.tickets.insert(ticket_id, ticket.clone());
        Ok(ticket)
    }

    async fn delete(&self, ticket_id: Uuid) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if tables.tickets.remove(&ticket_id).is_none() {
            return Err(DomainError::NotFound(format!("ticket {ticket_id}")));
        }
        let payments = tables.cascade_ticket(ticket_id);
        info!(%ticket_id, payments, "deleted ticket with cascade");
        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn create(&self, new: NewPayment) -> DomainResult<Payment> {
        let payment = Payment::from_new(new);
        validate::validate_payment(&payment)?;
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&payment.user_id) {
            return Err(DomainError::Reference(format!(
                "user {} does not exist",
                payment.user_id
            )));
        }
        if !tables.tickets.contains_key(&payment.ticket_id) {
            return Err(DomainError::Reference(format!(
                "ticket {} does not exist",
                payment.ticket_id
            )));
        }
        tables.payments.insert(payment.payment_id, payment.clone());
        info!(payment_id = %payment.payment_id, "created payment");
        Ok(payment)
    }

    async fn list(&self) -> DomainResult<Vec<Payment>> {
        let tables = self.tables.read().await;
        let mut payments: Vec<Payment> = tables.payments.values().cloned().collect();
        payments.sort_by_key(|p| p.payment_id);
        Ok(payments)
    }

    async fn get(&self, payment_id: Uuid) -> DomainResult<Payment> {
        let tables = self.tables.read().await;
        tables
            .payments
            .get(&payment_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("payment {payment_id}")))
    }

    async fn update(&self, payment_id: Uuid, patch: PaymentPatch) -> DomainResult<Payment> {
        let mut tables = self.tables.write().await;
        let mut payment = tables
            .payments
            .get(&payment_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("payment {payment_id}")))?;
        payment.apply(patch);
        validate::validate_payment(&payment)?;
        if !tables.users.contains_key(&payment.user_id) {
            return Err(DomainError::Reference(format!(
                "user {} does not exist",
                payment.user_id
            )));
        }
        if !tables.tickets.contains_key(&payment.ticket_id) {
            return Err(DomainError::Reference(format!(
                "ticket {} does not exist",
                payment.ticket_id
            )));
        }
        tables.payments.insert(payment_id, payment.clone());
        Ok(payment)
    }

    async fn delete(&self, payment_id: Uuid) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if tables.payments.remove(&payment_id).is_none() {
            return Err(DomainError::NotFound(format!("payment {payment_id}")));
        }
        Ok(())
    }
}
