//! # epoch-core
//!
//! Core types, timeline merge, and derived lookups for Epoch.
//!
//! This crate provides the foundational types shared across all Epoch crates:
//! - Entity structs for companies, snapshots, milestones and their attachments
//! - Category enums for milestones, sources and timeline entries
//! - ID prefix constants
//! - Query parameter and request body types with date parsing
//! - Pagination math
//! - The chronological timeline merge and the "milestone as of" lookup
//! - Defensive parsing of JSON list columns
//! - HTTP response types and cross-cutting errors

pub mod dates;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod format;
pub mod ids;
pub mod json_list;
pub mod pagination;
pub mod query;
pub mod requests;
pub mod responses;
pub mod timeline;
