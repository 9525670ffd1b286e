//! Object identity for the history engine.
//!
//! This crate provides the `ObjectId` type naming every commit, tree and
//! blob, the hex codec for its 40-character textual form, and a streaming
//! SHA-1 `Hasher` used to verify object content.

mod error;
pub mod hasher;
pub mod hex;
mod oid;

pub use error::HashError;
pub use oid::ObjectId;

/// Length of a raw object id in bytes.
pub const RAW_LEN: usize = 20;

/// Length of the textual (hex) form of an object id.
pub const HEX_LEN: usize = RAW_LEN * 2;
