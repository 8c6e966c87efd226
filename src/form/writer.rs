use tracing::warn;

use super::document::{DomEvent, ElementKey, HtmlDocument, SelectOption};
use crate::model::FieldKey;

/// Sets a text control's value and fires the notifications a live form's
/// validation listens for.
pub fn write_text(document: &mut HtmlDocument, element: ElementKey, value: &str, field: FieldKey) {
    warn_on_suspicious_target(document, element, field);

    document.set_value(element, value);
    document.dispatch(element, DomEvent::Input);
    document.dispatch(element, DomEvent::Change);
    document.dispatch(element, DomEvent::Blur);
    document.dispatch(element, DomEvent::Focus);
    document.dispatch(element, DomEvent::Blur);

    let written = document.value(element);
    if written != value && !document.is_password(element) {
        warn!(field = %field, expected = value, actual = %written, "value mismatch after write");
    }
}

/// Picks the option matching `value`: exact text or value, then containment in
/// either direction, then an "Other" option. Returns false when none applies.
/// A non-`select` control only takes the value when it matches a known option.
pub fn select_choice(
    document: &mut HtmlDocument,
    element: ElementKey,
    value: &str,
    field: FieldKey,
    known_options: &[&str],
) -> bool {
    if document.tag(element).as_deref() != Some("select") {
        let Some(canonical) = canonical_option(value, known_options) else {
            return false;
        };
        write_text(document, element, canonical, field);
        return true;
    }

    let options = document.options(element);
    let Some(option) = match_option(&options, value) else {
        return false;
    };

    let chosen = option.value.clone();
    document.set_value(element, &chosen);
    document.dispatch(element, DomEvent::Change);
    true
}

pub fn match_option<'o>(options: &'o [SelectOption], value: &str) -> Option<&'o SelectOption> {
    let wanted = value.to_lowercase();

    let exact = options.iter().find(|option| {
        option.text.trim().to_lowercase() == wanted || option.value.to_lowercase() == wanted
    });
    if exact.is_some() {
        return exact;
    }

    let partial = options.iter().find(|option| {
        let text = option.text.trim().to_lowercase();
        !text.is_empty() && (text.contains(&wanted) || wanted.contains(&text))
    });
    if partial.is_some() {
        return partial;
    }

    options
        .iter()
        .find(|option| option.text.to_lowercase().contains("other"))
}

fn canonical_option<'k>(value: &str, known_options: &[&'k str]) -> Option<&'k str> {
    let wanted = value.to_lowercase();
    known_options
        .iter()
        .copied()
        .find(|option| option.to_lowercase() == wanted)
        .or_else(|| {
            known_options
                .iter()
                .copied()
                .find(|option| wanted.contains(&option.to_lowercase()))
        })
}

fn warn_on_suspicious_target(document: &HtmlDocument, element: ElementKey, field: FieldKey) {
    let id = document.attr(element, "id").unwrap_or_default();
    let name = document
        .attr(element, "name")
        .unwrap_or_default()
        .to_lowercase();

    let suspicious = match field {
        FieldKey::Name => id.to_lowercase() != "name" && !name.contains("name"),
        FieldKey::MoreAboutSelf => {
            id.to_lowercase() != "moreaboutself" && !name.contains("more") && !name.contains("about")
        }
        _ => false,
    };

    if suspicious {
        warn!(field = %field, id = %id, name = %name, "locator may have matched the wrong element");
    }
}
