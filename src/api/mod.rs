//! REST surface over the RAG service

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use handlers::AppState;
pub use server::build_router;
pub use server::serve_api;
