//! Station session bridge: connected stations, pending outbound calls and
//! frame handling.

pub mod connection;
pub mod emitter;
pub mod pending;
pub mod registry;
pub mod station;

pub use connection::Connection;
pub use emitter::SessionEmitter;
pub use pending::{PendingCall, PendingCalls, SharedPendingCalls};
pub use registry::{SessionRegistry, SharedSessionRegistry};
pub use station::StationSession;
