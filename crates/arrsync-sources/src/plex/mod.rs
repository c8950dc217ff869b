pub mod client;
pub mod parser;

pub use client::PlexWatchlistClient;
pub use parser::parse_watchlist;
