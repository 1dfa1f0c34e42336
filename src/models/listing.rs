use serde::Serialize;

/// A match link discovered on a listing page, before numbering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    /// Match name (e.g. "England vs Sri Lanka, 3rd T20I")
    pub name: String,

    /// Absolute URL of the match detail page
    pub locator: String,

    /// The listing marked the match as live
    pub is_live: bool,
}

/// A numbered entry of one listing pass.
///
/// The ordinal only reflects discovery order within the listing it came from.
/// It is not stable across passes: ordinal 3 today may be a different match
/// from ordinal 3 a minute later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchIndexEntry {
    /// 1-based position in this listing
    #[serde(rename = "number")]
    pub ordinal: usize,

    pub name: String,

    #[serde(rename = "url")]
    pub locator: String,

    pub is_live: bool,
}
