//! # OCPP CSMS core
//!
//! OCPP 1.6 central-system core: action routing of station calls and call
//! results, a vendor sub-router for DataTransfer, outbound calls, and the
//! in-memory domain store behind them.
//!
//! ## Architecture
//!
//! - **domain**: Entities, store traits and the composite schedule algorithm
//! - **application**: Routing, handlers, outbound calls, station sessions and
//!   background services
//! - **infrastructure**: The in-memory store
//! - **ocpp**: OCPP 1.6 wire messages
//! - **support**: Frames, errors, shutdown and tracing setup

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ocpp;
pub mod support;

pub use application::{
    default_router, CallMaker, CsmsCore, DataTransferRoutes, Router, RouterError,
    SessionEmitter, SessionRegistry, StationSession,
};
pub use config::{config_path, default_config_path, AppConfig};
pub use domain::RepositoryProvider;
pub use infrastructure::InMemoryStore;
