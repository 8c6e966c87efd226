use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::document::{DomEvent, HtmlDocument};
use super::locator::locate;
use super::registry::{FieldKind, FieldMapping, ordered_mappings};
use super::writer::{select_choice, write_text};
use crate::extraction::{SynthesisConfig, normalize_free_text, normalize_income, synthesize};
use crate::model::{FieldError, FieldKey, FillOutcome, FilledField, ProfileRecord, SkippedField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillConfig {
    pub retry: RetryPolicy,
    pub readiness: ReadinessPolicy,
    pub synthesis: SynthesisConfig,
}

/// Polls until the page shows at least one form control or the timeout lapses.
/// Returns whether controls were seen; callers proceed either way.
/// A parsed document never changes while it waits, so polling only matters for
/// a live page handle. A static page is either ready at once or waits out the
/// full timeout.
pub fn wait_for_form(document: &HtmlDocument, policy: &ReadinessPolicy) -> bool {
    let started = Instant::now();
    loop {
        if document.control_count() > 0 {
            return true;
        }

        let elapsed = started.elapsed();
        if elapsed >= policy.timeout {
            warn!(
                timeout_ms = policy.timeout.as_millis() as u64,
                "no form controls appeared before timeout; continuing"
            );
            return false;
        }
        thread::sleep(policy.poll_interval.min(policy.timeout - elapsed));
    }
}

/// Applies fill-time cleanup and synthesized fields. An extracted name always survives.
pub fn prepare_record(record: &ProfileRecord, config: &SynthesisConfig) -> ProfileRecord {
    let mut cleaned = record.clone();

    if let Some(income) = record.get(FieldKey::AnnualIncome) {
        cleaned.insert(FieldKey::AnnualIncome, &normalize_income(income));
    }
    if let Some(about) = record.get(FieldKey::MoreAboutSelf) {
        let trimmed = normalize_free_text(about);
        if !cleaned.insert(FieldKey::MoreAboutSelf, &trimmed) {
            cleaned.remove(FieldKey::MoreAboutSelf);
        }
    }

    let mut prepared = synthesize(&cleaned, config);
    if let Some(name) = record.get(FieldKey::Name) {
        prepared.insert(FieldKey::Name, name);
    }
    prepared
}

/// Fills every registry field from `record`, one at a time in priority order.
/// Per-field failures land in the outcome; nothing here aborts the run.
pub fn fill_form(
    document: &mut HtmlDocument,
    record: &ProfileRecord,
    config: &FillConfig,
) -> FillOutcome {
    wait_for_form(document, &config.readiness);

    let prepared = prepare_record(record, &config.synthesis);
    info!(
        fields = prepared.len(),
        name = prepared.get(FieldKey::Name).unwrap_or_default(),
        email = prepared.get(FieldKey::Email).unwrap_or_default(),
        "filling form"
    );

    let mut outcome = FillOutcome::default();
    for mapping in ordered_mappings() {
        let Some(value) = prepared.get(mapping.key) else {
            outcome.skipped.push(SkippedField {
                field: mapping.key,
                reason: "No data".to_string(),
            });
            continue;
        };

        let value = value.trim();
        if value.is_empty() {
            outcome.skipped.push(SkippedField {
                field: mapping.key,
                reason: "Empty value".to_string(),
            });
            continue;
        }

        if fill_with_retry(document, mapping, value, &config.retry) {
            debug!(field = %mapping.key, value = %preview(value), "filled field");
            outcome.filled.push(FilledField {
                field: mapping.key,
                value: value.to_string(),
            });
        } else {
            let reason = match mapping.kind {
                FieldKind::Text => "Field not found",
                FieldKind::Choice => "Dropdown not found or value not matched",
            };
            warn!(field = %mapping.key, locator = mapping.locator, reason, "failed to fill field");
            outcome.errors.push(FieldError {
                field: mapping.key,
                error: reason.to_string(),
            });
        }
    }

    trigger_change_events(document);

    info!(
        filled = outcome.filled.len(),
        skipped = outcome.skipped.len(),
        errors = outcome.errors.len(),
        "form fill finished"
    );
    outcome
}

fn fill_with_retry(
    document: &mut HtmlDocument,
    mapping: &FieldMapping,
    value: &str,
    policy: &RetryPolicy,
) -> bool {
    let max_attempts = policy.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        if write_field(document, mapping, value) {
            return true;
        }
        if attempt < max_attempts {
            thread::sleep(policy.backoff);
        }
    }
    false
}

fn write_field(document: &mut HtmlDocument, mapping: &FieldMapping, value: &str) -> bool {
    let Some(located) = locate(document, mapping.locator) else {
        return false;
    };

    match mapping.kind {
        FieldKind::Text => {
            write_text(document, located.element, value, mapping.key);
            true
        }
        FieldKind::Choice => select_choice(
            document,
            located.element,
            value,
            mapping.key,
            mapping.choice_options,
        ),
    }
}

/// Re-fires input/change/blur on every control that holds a value.
pub fn trigger_change_events(document: &mut HtmlDocument) {
    for control in document.controls() {
        if document.value(control).is_empty() {
            continue;
        }
        document.dispatch(control, DomEvent::Input);
        document.dispatch(control, DomEvent::Change);
        document.dispatch(control, DomEvent::Blur);
    }
}

fn preview(value: &str) -> String {
    let mut shortened = value.chars().take(50).collect::<String>();
    if value.chars().count() > 50 {
        shortened.push_str("...");
    }
    shortened
}
