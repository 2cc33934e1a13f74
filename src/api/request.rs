//! Request types for the leave engine API.
//!
//! This module defines the JSON request structures for the `/process`
//! endpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calculation::ProcessOptions;
use crate::models::RawRecord;

/// Request body for the `/process` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// The leave record to process.
    pub record: RawRecord,
    /// Processing timestamp; defaults to the current local time.
    #[serde(default)]
    pub processed_at: Option<NaiveDateTime>,
}

/// Request body for the `/process/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// The leave records to process, in order.
    pub records: Vec<RawRecord>,
    /// Processing timestamp shared by every record in the batch.
    #[serde(default)]
    pub processed_at: Option<NaiveDateTime>,
}

pub(crate) fn options(processed_at: Option<NaiveDateTime>) -> ProcessOptions {
    processed_at.map_or_else(ProcessOptions::now, ProcessOptions::at)
}
