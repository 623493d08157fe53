pub mod calls;
pub mod handlers;
pub mod host;
pub mod routing;
pub mod services;
pub mod session;

// Re-export key types for convenience
pub use calls::{CallMaker, EmitError, Emitter, OutboundCall, SharedCallMaker};
pub use handlers::default_router;
pub use host::CsmsCore;
pub use routing::{
    CallHandler, CallResultHandler, CallResultRoute, CallRoute, DataTransferRoutes,
    HandlerError, Router, RouterError, SchemaValidator, VendorRoutes,
};
pub use services::{start_pending_call_sweeper, start_reservation_expiry_task};
pub use session::{
    PendingCalls, SessionEmitter, SessionRegistry, SharedPendingCalls, SharedSessionRegistry,
    StationSession,
};
