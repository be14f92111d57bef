//! # Ports Layer
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (API exposed to ingestion and audit paths)
//! - `outbound.rs` - Driven ports (bucket engine and chain collaborators)

pub mod inbound;
pub mod outbound;
