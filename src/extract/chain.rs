use regex::Regex;
use tracing::debug;

use crate::extract::page::{Marker, PageSnapshot};
use crate::models::{Partnership, WinProbability};
use crate::parse::PlayerLines;

/// A value a chain can resolve: knows its empty value and when it is usable.
pub trait FieldValue: Default {
    fn is_well_formed(&self) -> bool;
}

impl FieldValue for String {
    fn is_well_formed(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl FieldValue for Partnership {
    fn is_well_formed(&self) -> bool {
        // 0(0) is a real value right after a wicket
        true
    }
}

impl FieldValue for WinProbability {
    fn is_well_formed(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> FieldValue for PlayerLines<T> {
    fn is_well_formed(&self) -> bool {
        !self.is_empty()
    }
}

type StrategyFn<T> = Box<dyn Fn(&PageSnapshot) -> Option<T> + Send + Sync>;

/// One way of locating a field. Must not depend on other strategies having run.
pub struct Strategy<T> {
    pub name: &'static str,
    run: StrategyFn<T>,
}

/// Outcome of a chain: the value (empty if nothing matched) and who produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub strategy: Option<&'static str>,
}

impl<T> Resolved<T> {
    pub fn is_resolved(&self) -> bool {
        self.strategy.is_some()
    }
}

/// Ordered fallback strategies for one named field.
///
/// Strategies are tried in order; the first returning a well-formed value
/// wins. When none do, the field's empty value is returned.
pub struct ExtractionChain<T> {
    field: &'static str,
    strategies: Vec<Strategy<T>>,
}

impl<T: FieldValue> ExtractionChain<T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    /// Append a strategy with the lowest priority so far
    pub fn then<F>(mut self, name: &'static str, run: F) -> Self
    where
        F: Fn(&PageSnapshot) -> Option<T> + Send + Sync + 'static,
    {
        self.strategies.push(Strategy {
            name,
            run: Box::new(run),
        });
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name).collect()
    }

    pub fn resolve(&self, page: &PageSnapshot) -> Resolved<T> {
        for strategy in &self.strategies {
            if let Some(value) = (strategy.run)(page).filter(T::is_well_formed) {
                debug!("{} resolved by {}", self.field, strategy.name);
                return Resolved {
                    value,
                    strategy: Some(strategy.name),
                };
            }
        }

        debug!("{}: no strategy matched, using empty value", self.field);
        Resolved {
            value: T::default(),
            strategy: None,
        }
    }
}

// Strategy building blocks. Each returns a pure function over a snapshot.

/// Text of the first non-empty fragment carrying `marker`
pub fn marker_text(marker: Marker) -> impl Fn(&PageSnapshot) -> Option<String> + Send + Sync {
    move |page: &PageSnapshot| {
        page.by_marker(marker)
            .map(|f| f.text.clone())
            .find(|t| !t.is_empty())
    }
}

/// Attribute value of the first fragment carrying `marker` and that attribute
pub fn marker_attr(
    marker: Marker,
    attr: &'static str,
) -> impl Fn(&PageSnapshot) -> Option<String> + Send + Sync {
    move |page: &PageSnapshot| {
        page.by_marker(marker)
            .filter_map(|f| f.attr(attr))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
    }
}

/// First capture of `pattern` within fragments carrying `marker`
pub fn marker_pattern(
    marker: Marker,
    pattern: &'static Regex,
    group: usize,
) -> impl Fn(&PageSnapshot) -> Option<String> + Send + Sync {
    move |page: &PageSnapshot| {
        page.by_marker(marker)
            .find_map(|f| capture(pattern, &f.text, group))
    }
}

/// Innermost fragment containing `label`, with the label and anything before it removed
pub fn label_text(
    label: &'static str,
    tag: Option<&'static str>,
) -> impl Fn(&PageSnapshot) -> Option<String> + Send + Sync {
    move |page: &PageSnapshot| {
        let fragment = page.innermost_containing(label, tag)?;
        let (_, rest) = fragment.text.split_once(label)?;
        Some(rest.trim().to_string())
    }
}

/// Innermost fragment containing `label`, verbatim
pub fn label_fragment(
    label: &'static str,
) -> impl Fn(&PageSnapshot) -> Option<String> + Send + Sync {
    move |page: &PageSnapshot| {
        page.innermost_containing(label, None)
            .map(|f| f.text.clone())
    }
}

/// First capture of `pattern` in the innermost fragment containing `label`
pub fn label_pattern(
    label: &'static str,
    pattern: &'static Regex,
    group: usize,
) -> impl Fn(&PageSnapshot) -> Option<String> + Send + Sync {
    move |page: &PageSnapshot| {
        let fragment = page.innermost_containing(label, None)?;
        capture(pattern, &fragment.text, group)
    }
}

/// First capture of `pattern` anywhere in the document text
pub fn global_pattern(
    pattern: &'static Regex,
    group: usize,
) -> impl Fn(&PageSnapshot) -> Option<String> + Send + Sync {
    move |page: &PageSnapshot| capture(pattern, page.text(), group)
}

fn capture(pattern: &Regex, text: &str, group: usize) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
