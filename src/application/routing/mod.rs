//! Protocol dispatch: handler contract, routes, the action router and the
//! DataTransfer sub-router.

pub mod data_transfer;
pub mod handler;
pub mod route;
pub mod router;
pub mod schema;

pub use data_transfer::{
    DataTransferCallHandler, DataTransferResultHandler, DataTransferRoutes, VendorRoutes,
};
pub use handler::{CallHandler, CallResultHandler, HandlerError};
pub use route::{CallResultRoute, CallRoute};
pub use router::{Router, RouterBuilder, RouterError};
pub use schema::{PermissiveValidator, SchemaError, SchemaValidator, WellFormedJsonValidator};
