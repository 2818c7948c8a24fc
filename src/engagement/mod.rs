pub mod client;
pub mod snapshot;

pub use client::*;
pub use snapshot::*;
