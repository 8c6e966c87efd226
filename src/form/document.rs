use std::collections::HashMap;
use std::fs;
use std::path::Path;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::model::ControlValue;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },
    #[error("failed to read form page {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// Position of an element in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    Input,
    Change,
    Focus,
    Blur,
}

impl DomEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Change => "change",
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub element: ElementKey,
    pub event: DomEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub text: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelElement {
    pub key: ElementKey,
    pub text: String,
    pub for_id: Option<String>,
}

/// In-memory form page. Structure comes from the parsed markup; control values
/// and dispatched events live in an overlay that fills mutate.
pub struct HtmlDocument {
    html: Html,
    any: Selector,
    controls: Selector,
    labels: Selector,
    options: Selector,
    values: HashMap<ElementKey, String>,
    events: Vec<DispatchedEvent>,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Result<Self, DocumentError> {
        Ok(Self {
            html: Html::parse_document(markup),
            any: compile_selector("*")?,
            controls: compile_selector("input, select, textarea")?,
            labels: compile_selector("label")?,
            options: compile_selector("option")?,
            values: HashMap::new(),
            events: Vec::new(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let markup = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&markup)
    }

    pub fn control_count(&self) -> usize {
        self.html.select(&self.controls).count()
    }

    pub fn controls(&self) -> Vec<ElementKey> {
        self.html
            .select(&self.controls)
            .filter_map(|element| self.key_for(element))
            .collect()
    }

    /// First element matching `selector` in document order, like `querySelector`.
    pub fn query_first(&self, selector: &Selector) -> Option<ElementKey> {
        let element = self.html.select(selector).next()?;
        self.key_for(element)
    }

    pub fn element_by_id(&self, id: &str) -> Option<ElementKey> {
        self.html
            .select(&self.any)
            .position(|element| element.value().id() == Some(id))
            .map(ElementKey)
    }

    pub fn labels(&self) -> Vec<LabelElement> {
        self.html
            .select(&self.labels)
            .filter_map(|label| {
                Some(LabelElement {
                    key: self.key_for(label)?,
                    text: collapsed_text(label),
                    for_id: label.value().attr("for").map(ToOwned::to_owned),
                })
            })
            .collect()
    }

    /// First input/select/textarea inside the parent of `key`.
    pub fn first_control_in_parent(&self, key: ElementKey) -> Option<ElementKey> {
        let element = self.element(key)?;
        let parent = element.parent().and_then(ElementRef::wrap)?;
        let control = parent.select(&self.controls).next()?;
        self.key_for(control)
    }

    pub fn tag(&self, key: ElementKey) -> Option<String> {
        self.element(key)
            .map(|element| element.value().name().to_ascii_lowercase())
    }

    pub fn attr(&self, key: ElementKey, name: &str) -> Option<String> {
        self.element(key)
            .and_then(|element| element.value().attr(name).map(ToOwned::to_owned))
    }

    pub fn is_password(&self, key: ElementKey) -> bool {
        self.input_type(key).as_deref() == Some("password")
    }

    /// Layout participation: no `hidden` attribute and no inline `display:none`
    /// on the element or its ancestors. Hidden-type inputs always qualify.
    pub fn is_visible(&self, key: ElementKey) -> bool {
        let Some(element) = self.element(key) else {
            return false;
        };
        if self.input_type(key).as_deref() == Some("hidden") {
            return true;
        }

        std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .all(|node| !removed_from_layout(node))
    }

    pub fn value(&self, key: ElementKey) -> String {
        if let Some(value) = self.values.get(&key) {
            return value.clone();
        }

        let Some(element) = self.element(key) else {
            return String::new();
        };
        match element.value().name() {
            "textarea" => element.text().collect(),
            "select" => self.default_option_value(element),
            _ => element.value().attr("value").unwrap_or_default().to_string(),
        }
    }

    pub fn set_value(&mut self, key: ElementKey, value: &str) {
        self.values.insert(key, value.to_string());
    }

    pub fn options(&self, key: ElementKey) -> Vec<SelectOption> {
        let Some(element) = self.element(key) else {
            return Vec::new();
        };
        element
            .select(&self.options)
            .map(|option| {
                let text = collapsed_text(option);
                let value = option
                    .value()
                    .attr("value")
                    .map(ToOwned::to_owned)
                    .unwrap_or_else(|| text.clone());
                SelectOption { text, value }
            })
            .collect()
    }

    pub fn dispatch(&mut self, key: ElementKey, event: DomEvent) {
        self.events.push(DispatchedEvent {
            element: key,
            event,
        });
    }

    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> Vec<ControlValue> {
        self.controls()
            .into_iter()
            .map(|key| ControlValue {
                tag: self.tag(key).unwrap_or_default(),
                id: self.attr(key, "id"),
                name: self.attr(key, "name"),
                value: self.value(key),
                events: self
                    .events
                    .iter()
                    .filter(|dispatched| dispatched.element == key)
                    .map(|dispatched| dispatched.event.as_str().to_string())
                    .collect(),
            })
            .collect()
    }

    fn element(&self, key: ElementKey) -> Option<ElementRef<'_>> {
        self.html.select(&self.any).nth(key.0)
    }

    fn key_for(&self, element: ElementRef<'_>) -> Option<ElementKey> {
        self.html
            .select(&self.any)
            .position(|candidate| candidate == element)
            .map(ElementKey)
    }

    fn input_type(&self, key: ElementKey) -> Option<String> {
        let element = self.element(key)?;
        if element.value().name() != "input" {
            return None;
        }
        Some(
            element
                .value()
                .attr("type")
                .unwrap_or("text")
                .to_ascii_lowercase(),
        )
    }

    fn default_option_value(&self, select: ElementRef<'_>) -> String {
        let options = select.select(&self.options).collect::<Vec<ElementRef<'_>>>();
        let chosen = options
            .iter()
            .find(|option| option.value().attr("selected").is_some())
            .or_else(|| options.first());

        chosen
            .map(|option| {
                option
                    .value()
                    .attr("value")
                    .map(ToOwned::to_owned)
                    .unwrap_or_else(|| collapsed_text(*option))
            })
            .unwrap_or_default()
    }
}

/// Parses one selector fragment; invalid fragments are reported, not fatal.
pub fn compile_selector(selector: &str) -> Result<Selector, DocumentError> {
    Selector::parse(selector).map_err(|error| DocumentError::Selector {
        selector: selector.to_string(),
        reason: error.to_string(),
    })
}

fn removed_from_layout(element: ElementRef<'_>) -> bool {
    if element.value().attr("hidden").is_some() {
        return true;
    }

    element
        .value()
        .attr("style")
        .map(|style| {
            style
                .chars()
                .filter(|character| !character.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase()
                .contains("display:none")
        })
        .unwrap_or(false)
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<&str>>()
        .join(" ")
}
