//! Application services
//!
//! Orchestrate the domain ports and infrastructure into the two use cases:
//! offline ingestion and online query answering.

pub mod app_context;
pub mod generation_service;
pub mod ingestion_service;
pub mod persona;
pub mod query_service;
pub mod retriever;

pub use app_context::AppContext;
pub use generation_service::GenerationService;
pub use ingestion_service::{IngestError, IngestOptions, IngestReport, IngestionService};
pub use persona::{load_persona, DEFAULT_PERSONA};
pub use query_service::{QueryError, QueryService};
pub use retriever::{RetrievalError, Retriever};
