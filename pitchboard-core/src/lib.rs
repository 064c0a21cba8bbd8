#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod entities;
pub mod error;
pub mod keyspace;
pub mod processors;
pub mod ranking;
pub mod scoring;
pub mod store;

pub use error::{Error, Result};
pub use keyspace::{Keyspace, TtlPolicy};
