pub mod chain;
pub mod details;
pub mod listing;
pub mod page;

pub use chain::{ExtractionChain, FieldValue, Resolved, Strategy};
pub use details::DetailExtractor;
pub use listing::{discover_matches, match_id_from_locator};
pub use page::{Fragment, Marker, PageSnapshot};
