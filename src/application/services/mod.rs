//! Background services

mod pending_sweeper;
mod reservation_expiry;

pub use pending_sweeper::start_pending_call_sweeper;
pub use reservation_expiry::start_reservation_expiry_task;
