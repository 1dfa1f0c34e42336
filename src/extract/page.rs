use std::collections::HashMap;

use scraper::{ElementRef, Html};

/// Elements whose text is never shown to a reader
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// One element of a page, detached from the parsed tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Lowercase tag name
    pub tag: String,

    pub classes: Vec<String>,

    /// Attributes in document order
    pub attrs: Vec<(String, String)>,

    /// Visible text with whitespace collapsed
    pub text: String,

    /// Index of the parent element within the snapshot
    pub parent: Option<usize>,
}

impl Fragment {
    /// A bare text fragment, for sources without markup
    pub fn text(tag: &str, text: &str) -> Self {
        Self {
            tag: tag.to_string(),
            text: collapse_whitespace(text),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Structural marker locating a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Tag(&'static str),
    Class(&'static str),
    /// Attribute present, optionally with an exact value
    Attr(&'static str, Option<&'static str>),
    /// Tag carrying an attribute with an exact value, e.g. `meta[name=description]`
    TagAttr(&'static str, &'static str, &'static str),
}

impl Marker {
    pub fn matches(&self, fragment: &Fragment) -> bool {
        match *self {
            Marker::Tag(tag) => fragment.tag == tag,
            Marker::Class(class) => fragment.has_class(class),
            Marker::Attr(name, value) => match (fragment.attr(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
            Marker::TagAttr(tag, name, value) => {
                fragment.tag == tag && fragment.attr(name) == Some(value)
            }
        }
    }
}

/// Owned, flattened view of a document.
///
/// Built once per fetched page; holds no reference to the source markup, so
/// the fetch layer can drop its buffer as soon as the snapshot exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    fragments: Vec<Fragment>,
    text: String,
}

impl PageSnapshot {
    /// Parse markup and flatten every visible element
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut fragments = Vec::new();
        let mut positions = HashMap::new();

        for node in document.root_element().descendants() {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            let name = element.value().name().to_ascii_lowercase();
            if HIDDEN_TAGS.contains(&name.as_str()) {
                continue;
            }

            let parent = node
                .ancestors()
                .find_map(|a| positions.get(&a.id()).copied());

            positions.insert(node.id(), fragments.len());
            fragments.push(Fragment {
                tag: name,
                classes: element.value().classes().map(str::to_string).collect(),
                attrs: element
                    .value()
                    .attrs()
                    .map(|(n, v)| (n.to_ascii_lowercase(), v.to_string()))
                    .collect(),
                text: visible_text(element),
                parent,
            });
        }

        let text = visible_text(document.root_element());
        Self { fragments, text }
    }

    /// Snapshot of plain fragments; document text is their texts joined
    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        let text = fragments
            .iter()
            .map(|f| f.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self { fragments, text }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Whole-document visible text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fragments carrying `marker`, in document order
    pub fn by_marker(&self, marker: Marker) -> impl Iterator<Item = &Fragment> + '_ {
        self.fragments.iter().filter(move |f| marker.matches(f))
    }

    /// Fragments whose text contains every label, in document order
    pub fn containing<'a>(&'a self, labels: &'a [&'a str]) -> impl Iterator<Item = &'a Fragment> + 'a {
        self.fragments
            .iter()
            .filter(move |f| labels.iter().all(|l| f.text.contains(l)))
    }

    /// The innermost fragment containing `label`, optionally restricted to a tag.
    ///
    /// Every ancestor of a labelled element contains the label too; the
    /// shortest text is the element that actually carries it.
    pub fn innermost_containing(&self, label: &str, tag: Option<&str>) -> Option<&Fragment> {
        self.fragments
            .iter()
            .filter(|f| tag.map_or(true, |t| f.tag == t))
            .filter(|f| f.text.contains(label))
            .min_by_key(|f| f.text.len())
    }

    /// Closest ancestor (excluding the fragment itself) with the given tag
    pub fn closest(&self, fragment: &Fragment, tag: &str) -> Option<&Fragment> {
        let mut current = fragment.parent;
        while let Some(i) = current {
            let candidate = self.fragments.get(i)?;
            if candidate.tag == tag {
                return Some(candidate);
            }
            current = candidate.parent;
        }
        None
    }
}

/// Collapse runs of whitespace to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn visible_text(element: ElementRef<'_>) -> String {
    let parts: Vec<&str> = element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(ElementRef::wrap);
            if parent.is_some_and(|p| HIDDEN_TAGS.contains(&p.value().name())) {
                return None;
            }
            Some(&**text)
        })
        .collect();
    collapse_whitespace(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head>
            <meta name="description" content="Follow ENG 135/9 (19.2) vs SL">
            <script>var x = "CRR: 99.9";</script>
        </head><body>
            <div class="outer">
                <div class="cb-col-50 inner">Joe Root <b>(r)</b> 45</div>
                <p>Recent : 1 4 W 0</p>
            </div>
        </body></html>
    "#;

    #[test]
    fn test_flattens_elements() {
        let page = PageSnapshot::from_html(PAGE);
        let meta = page
            .by_marker(Marker::TagAttr("meta", "name", "description"))
            .next()
            .unwrap();
        assert_eq!(meta.attr("content"), Some("Follow ENG 135/9 (19.2) vs SL"));

        let inner = page.by_marker(Marker::Class("cb-col-50")).next().unwrap();
        assert_eq!(inner.text, "Joe Root (r) 45");
        assert!(inner.has_class("inner"));
    }

    #[test]
    fn test_script_text_hidden() {
        let page = PageSnapshot::from_html(PAGE);
        assert!(!page.text().contains("99.9"));
        assert!(page.text().contains("Recent : 1 4 W 0"));
    }

    #[test]
    fn test_innermost_and_closest() {
        let page = PageSnapshot::from_html(PAGE);
        let recent = page.innermost_containing("Recent :", None).unwrap();
        assert_eq!(recent.tag, "p");

        let outer = page.closest(recent, "div").unwrap();
        assert!(outer.has_class("outer"));
        assert!(page.closest(outer, "p").is_none());
    }

    #[test]
    fn test_from_fragments() {
        let page = PageSnapshot::from_fragments(vec![
            Fragment::text("div", "  P'SHIP   45 (30) "),
            Fragment::text("p", "Recent : 1 1"),
        ]);
        assert_eq!(page.fragments()[0].text, "P'SHIP 45 (30)");
        assert_eq!(page.text(), "P'SHIP 45 (30) Recent : 1 1");
        assert_eq!(page.containing(&["P'SHIP", "(30)"]).count(), 1);
    }
}
