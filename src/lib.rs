//! Real-time group chat backend.
//!
//! REST + WebSocket gateway over a relational message store, with an
//! in-memory presence roster. Layered in the DDD style: `domain` holds the
//! entities and ports, `usecase` the business logic, `infrastructure` the
//! stores and wire DTOs, `ui` the axum handlers.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
