//! Shared DTOs for JSON responses.

use serde::{Deserialize, Serialize};

use crate::nlp::topics::Topic;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDto {
    pub topic: Topic,
    pub seeds: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
