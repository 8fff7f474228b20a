use serde::Serialize;

use crate::domain::record::ModdingRecord;
use crate::domain::search::{RecordKind, SortOrder};
use crate::domain::user::User;
use crate::domain::vote::VoteSummary;
use crate::pagination::Page;

/// Data required to render the modding summary of a user.
#[derive(Debug, Serialize)]
pub struct SummaryPageData {
    pub user: User,
    /// Newest discussions opened by the user.
    pub discussions: Page<ModdingRecord>,
    /// Newest replies written by the user.
    pub posts: Page<ModdingRecord>,
    /// Newest beatmap set events triggered by the user.
    pub events: Page<ModdingRecord>,
    /// Recent votes cast by the user, grouped by discussion author.
    pub votes_given: Vec<VoteSummary>,
    /// Recent votes on the user's discussions, grouped by voter.
    pub votes_received: Vec<VoteSummary>,
}

/// Data required to render one per-kind listing page.
#[derive(Debug, Serialize)]
pub struct ListingPageData {
    pub user: User,
    pub kind: RecordKind,
    /// Effective sort, echoed back into the filter form.
    pub sort: SortOrder,
    /// Whether deleted records are part of the listing.
    pub with_deleted: bool,
    pub records: Page<ModdingRecord>,
}
