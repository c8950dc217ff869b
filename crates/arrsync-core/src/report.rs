use arrsync_models::{AddOutcome, EntryOutcome, WatchlistEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One watchlist entry and where it ended up
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    #[serde(flatten)]
    pub entry: WatchlistEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<u32>,
    pub outcome: EntryOutcome,
}

/// Everything a single pipeline run did, in watchlist order
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub environment: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub dry_run: bool,
    pub quality_profile_id: Option<u32>,
    pub entries: Vec<EntryReport>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub added: usize,
    pub planned: usize,
    pub rejected: usize,
    pub transport_failed: usize,
    pub not_found: usize,
    pub resolve_failed: usize,
    pub skipped: usize,
}

impl RunReport {
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total: self.entries.len(),
            ..RunSummary::default()
        };

        for report in &self.entries {
            match &report.outcome {
                EntryOutcome::Dispatched { outcome: AddOutcome::Added } => summary.added += 1,
                EntryOutcome::Dispatched { outcome: AddOutcome::Rejected(_) } => summary.rejected += 1,
                EntryOutcome::Dispatched { outcome: AddOutcome::TransportFailed(_) } => {
                    summary.transport_failed += 1
                }
                EntryOutcome::Planned { .. } => summary.planned += 1,
                EntryOutcome::NotFound => summary.not_found += 1,
                EntryOutcome::ResolveFailed { .. } => summary.resolve_failed += 1,
                EntryOutcome::Skipped { .. } => summary.skipped += 1,
            }
        }

        summary
    }

    pub fn outcome_for(&self, title: &str) -> Option<&EntryOutcome> {
        self.entries
            .iter()
            .find(|r| r.entry.title == title)
            .map(|r| &r.outcome)
    }
}

impl RunSummary {
    /// Entries that reached a service or the resolver and failed there
    pub fn failures(&self) -> usize {
        self.rejected + self.transport_failed + self.resolve_failed
    }
}
