//! HTTP surface of the query service.
//!
//! Routes:
//! - `GET /` - frontend (when `server.static_dir` exists) or status JSON
//! - `GET /status` - status JSON
//! - `GET /health` - liveness probe
//! - `POST /process_query`, `POST /api/query` - answer a prompt

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;

pub use auth::API_KEY_HEADER;
pub use error::{ApiError, ErrorBody};
pub use extract::JsonOrForm;
pub use server::{build_router, serve, shutdown_signal};
