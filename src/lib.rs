//! Leave pay scenario engine
//!
//! This crate derives wage and leave-balance variables from a raw leave
//! record, evaluates a library of leave conditions, selects the first
//! configured scenario whose conditions match and calculates the field
//! updates that scenario prescribes. Every result carries the condition
//! trace used to reach it.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
