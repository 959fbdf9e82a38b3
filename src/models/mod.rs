//! Response models for the cache shell
//!
//! This module defines the DTOs serialized as one JSON line per command.

pub mod responses;

// Re-export commonly used types
pub use responses::{
    DeleteResponse, EntryView, ErrorResponse, GetResponse, HelpResponse, KeyStatusResponse,
    ListResponse, SetResponse, SizeResponse, StatsResponse,
};
