pub mod client;

pub use client::{MatchPolicy, TmdbClient};
