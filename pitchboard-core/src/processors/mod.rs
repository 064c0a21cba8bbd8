//! Background processors.
//!
//! - `ExpirySweeper`: periodically reclaims expired records from the store

pub mod expiry_sweeper;

pub use expiry_sweeper::ExpirySweeper;
