//! Customer review insights: load a review export, cluster and tag it, and
//! summarise what customers talk about.

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod insights;
pub mod logging;
pub mod nlp;
#[cfg(feature = "askama")]
pub mod ui;
