//! HTTP request handlers.

pub mod catalog;
pub mod notes;
pub mod ops;
