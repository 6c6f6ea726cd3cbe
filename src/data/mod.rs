//! Review ingestion and artefact export.

pub mod export;
pub mod reviews;
