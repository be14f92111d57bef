//! # Domain Layer
//!
//! Pure domain logic for the block signature store. No I/O happens here.
//!
//! ## Modules
//!
//! - `entities` - Block header hash, reference blocks, signed blocks
//! - `signature` - Fixed-width master signature codec and secp256k1 primitive
//! - `errors` - Domain error types

pub mod entities;
pub mod errors;
pub mod signature;
