//! CLI command implementations.

pub mod init;
pub mod lookup;
pub mod prefetch;
pub mod serve;
pub mod stats;
