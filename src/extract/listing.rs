use tracing::debug;

use crate::extract::page::{collapse_whitespace, PageSnapshot};
use crate::indexer::dedupe_by_key;
use crate::models::MatchCandidate;

/// Path segment shared by every live score page link
const MATCH_LINK: &str = "/live-cricket-scores/";

/// Find match links on a listing page.
///
/// A link qualifies when its href points at a live score page and its name
/// (title attribute, else text) reads like a fixture ("A vs B"). Repeated
/// locators keep their first occurrence.
pub fn discover_matches(page: &PageSnapshot, base_url: &str) -> Vec<MatchCandidate> {
    let base = base_url.trim_end_matches('/');

    let candidates: Vec<MatchCandidate> = page
        .fragments()
        .iter()
        .filter(|f| f.tag == "a")
        .filter_map(|anchor| {
            let href = anchor.attr("href")?;
            if !href.contains(MATCH_LINK) {
                return None;
            }

            let name = anchor
                .attr("title")
                .map(collapse_whitespace)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| anchor.text.clone());
            if name.is_empty() || !name.contains(" vs ") {
                return None;
            }

            let is_live = anchor.text.contains("LIVE")
                || page
                    .closest(anchor, "div")
                    .is_some_and(|div| div.text.contains("LIVE"));

            Some(MatchCandidate {
                name,
                locator: absolute(base, href),
                is_live,
            })
        })
        .collect();

    let candidates = dedupe_by_key(candidates, |c| c.locator.clone());
    debug!("Discovered {} match links", candidates.len());
    candidates
}

fn absolute(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}

/// Numeric match ID from a live score locator, e.g. `.../live-cricket-scores/12345/eng-vs-sl`
pub fn match_id_from_locator(locator: &str) -> Option<&str> {
    let (_, rest) = locator.split_once(MATCH_LINK)?;
    rest.split('/').next().filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
            <div class="cb-mtch-lst">
                <a href="/live-cricket-scores/101/eng-vs-sl-3rd-t20i" title="England   vs Sri Lanka, 3rd T20I">ENG vs SL</a>
                <span>LIVE</span>
            </div>
            <div>
                <a href="/live-cricket-scores/101/eng-vs-sl-3rd-t20i">England vs Sri Lanka</a>
            </div>
            <div>
                <a href="/live-cricket-scores/202/ind-vs-aus">India vs Australia, 1st ODI</a>
            </div>
            <div>
                <a href="/cricket-news/1/headline" title="News vs Views">headline</a>
                <a href="/live-cricket-scores/303/series">Series home</a>
            </div>
        </body></html>
    "#;

    #[test]
    fn test_discover_and_dedupe() {
        let page = PageSnapshot::from_html(LISTING);
        let found = discover_matches(&page, "https://www.cricbuzz.com/");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "England vs Sri Lanka, 3rd T20I");
        assert_eq!(
            found[0].locator,
            "https://www.cricbuzz.com/live-cricket-scores/101/eng-vs-sl-3rd-t20i"
        );
        assert!(found[0].is_live);
        assert_eq!(found[1].name, "India vs Australia, 1st ODI");
        assert!(!found[1].is_live);
    }

    #[test]
    fn test_match_id_from_locator() {
        assert_eq!(
            match_id_from_locator("https://www.cricbuzz.com/live-cricket-scores/101/eng-vs-sl"),
            Some("101")
        );
        assert_eq!(match_id_from_locator("https://www.cricbuzz.com/"), None);
    }
}
