use skybook_core::repository::{
    FlightRepository, PaymentRepository, SeatRepository, TicketRepository, UserRepository,
};
use skybook_store::MemoryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub flights: Arc<dyn FlightRepository>,
    pub seats: Arc<dyn SeatRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub payments: Arc<dyn PaymentRepository>,
}

impl AppState {
    /// Wire every resource to the shared store so cascades see one dataset.
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            flights: store.clone(),
            seats: store.clone(),
            tickets: store.clone(),
            payments: store,
        }
    }
}
