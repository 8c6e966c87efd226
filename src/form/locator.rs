use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::document::{ElementKey, HtmlDocument, LabelElement, compile_selector};

/// Longest label text the loose label match will trust.
const MAX_LOOSE_LABEL_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorTier {
    ExactId,
    Selector,
    Label,
}

impl LocatorTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactId => "exact_id",
            Self::Selector => "selector",
            Self::Label => "label",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub element: ElementKey,
    pub tier: LocatorTier,
}

/// Resolves a comma-separated locator expression against `document`.
///
/// Fragments addressing an exact id are tried first, then every fragment in
/// declared order, and finally `<label>` text. Only the first match of each
/// fragment is considered, and it must be visible. `None` means no tier matched.
pub fn locate(document: &HtmlDocument, locator: &str) -> Option<Located> {
    let fragments = locator
        .split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<&str>>();

    let by_id = fragments
        .iter()
        .copied()
        .filter(|fragment| fragment.contains('#') || fragment.contains("[id="));
    if let Some(element) = first_visible(document, by_id) {
        debug!(locator, tier = "exact_id", "located element");
        return Some(Located {
            element,
            tier: LocatorTier::ExactId,
        });
    }

    if let Some(element) = first_visible(document, fragments.iter().copied()) {
        debug!(locator, tier = "selector", "located element");
        return Some(Located {
            element,
            tier: LocatorTier::Selector,
        });
    }

    let element = locate_by_label(document, locator)?;
    debug!(locator, tier = "label", "located element");
    Some(Located {
        element,
        tier: LocatorTier::Label,
    })
}

fn first_visible<'a>(
    document: &HtmlDocument,
    fragments: impl Iterator<Item = &'a str>,
) -> Option<ElementKey> {
    for fragment in fragments {
        let Ok(selector) = compile_selector(fragment) else {
            debug!(fragment, "skipping unparsable selector fragment");
            continue;
        };
        if let Some(element) = document.query_first(&selector) {
            if document.is_visible(element) {
                return Some(element);
            }
        }
    }
    None
}

/// Short field name the expression targets, e.g. `name` for `input#name` or
/// `age` for `input[name*="Age"]`.
pub fn field_short_name(locator: &str) -> Option<String> {
    let pattern = Regex::new(
        r#"(?i)#(\w+)|id="(\w+)"|id\*="(\w+)"|name\*="(\w+)"|placeholder\*="(\w+)""#,
    )
    .ok()?;
    let captures = pattern.captures(locator)?;

    (1..=5)
        .find_map(|group| captures.get(group))
        .map(|found| found.as_str().to_lowercase())
}

fn locate_by_label(document: &HtmlDocument, locator: &str) -> Option<ElementKey> {
    let short_name = field_short_name(locator)?;

    for label in document.labels() {
        let text = label.text.to_lowercase();
        let text = text.trim();

        let found = match short_name.as_str() {
            "name" => strict_name_match(document, &label, text),
            "moreaboutself" | "moreabout" => strict_more_about_match(document, &label, text),
            _ => loose_match(document, &label, text, &short_name),
        };
        if found.is_some() {
            return found;
        }
    }

    None
}

// "Surname", "Father's Name" and similar must never resolve to the applicant name.
fn strict_name_match(
    document: &HtmlDocument,
    label: &LabelElement,
    text: &str,
) -> Option<ElementKey> {
    if text != "name" && !text.starts_with("name ") {
        return None;
    }

    let element = document.element_by_id(label.for_id.as_deref()?)?;
    (document.attr(element, "id").as_deref() == Some("name")).then_some(element)
}

fn strict_more_about_match(
    document: &HtmlDocument,
    label: &LabelElement,
    text: &str,
) -> Option<ElementKey> {
    if !text.contains("more about") {
        return None;
    }

    let element = document.element_by_id(label.for_id.as_deref()?)?;
    let id = document.attr(element, "id").unwrap_or_default();
    (id == "moreAboutSelf" || id.contains("moreAbout")).then_some(element)
}

fn loose_match(
    document: &HtmlDocument,
    label: &LabelElement,
    text: &str,
    short_name: &str,
) -> Option<ElementKey> {
    if !text.contains(short_name) || text.chars().count() >= MAX_LOOSE_LABEL_CHARS {
        return None;
    }

    if let Some(element) = label
        .for_id
        .as_deref()
        .and_then(|id| document.element_by_id(id))
    {
        return Some(element);
    }

    document.first_control_in_parent(label.key)
}
