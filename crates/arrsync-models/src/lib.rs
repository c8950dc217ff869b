pub mod media;
pub mod outcome;
pub mod profile;
pub mod request;
pub mod strategy;
pub mod watchlist;

pub use media::MediaType;
pub use outcome::{AddOutcome, EntryOutcome, SkipReason};
pub use profile::{QualityProfile, ServiceProfile};
pub use request::{AddRequest, MovieAddOptions, MovieAddRequest, ShowAddOptions, ShowAddRequest};
pub use strategy::ShowIdStrategy;
pub use watchlist::{ResolvedIdentifier, WatchlistEntry};
