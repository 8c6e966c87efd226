use std::collections::HashSet;

use regex::Regex;

use super::units::{parse_height, parse_weight};
use crate::model::{FieldKey, ProfileRecord};

/// Label spellings per field, in the order fields are resolved.
pub const LABEL_VOCABULARY: &[(FieldKey, &[&str])] = &[
    (FieldKey::FormNumber, &["Form Number", "FormNumber"]),
    (FieldKey::Name, &["Name"]),
    (FieldKey::Gender, &["Gender"]),
    (FieldKey::Age, &["Age"]),
    (FieldKey::MaritalStatus, &["Marital Status", "MaritalStatus"]),
    (FieldKey::Education, &["Education"]),
    (FieldKey::EducationDetail, &["Education Detail", "EducationDetail"]),
    (FieldKey::Occupation, &["Occupation"]),
    (FieldKey::Religion, &["Religion"]),
    (FieldKey::Caste, &["Caste"]),
    (FieldKey::SubCaste, &["Sub Caste", "SubCaste"]),
    (FieldKey::Gothram, &["Gothram", "Gothra"]),
    (FieldKey::MotherTongue, &["Mother Tongue", "MotherTongue"]),
    (FieldKey::HoroscopeMatch, &["Horoscope Match", "HoroscopeMatch"]),
    (FieldKey::Star, &["Star"]),
    (
        FieldKey::RassiMoonSign,
        &["Rassi / Moon Sign", "Rassi", "Raasi Moon Sign", "RaasiMoonSign"],
    ),
    (
        FieldKey::DhoshamManglik,
        &["Dhosham / Magalik", "Dhosham", "Dosham Manglik", "DoshamManglik"],
    ),
    (FieldKey::Height, &["Height"]),
    (FieldKey::Weight, &["Weight"]),
    (FieldKey::Citizenship, &["Citizenship"]),
    (FieldKey::HomeState, &["Home State", "HomeState"]),
    (
        FieldKey::CountryLivingIn,
        &["Country Living in", "Country Living In", "CountryLivingIn"],
    ),
    (FieldKey::BodyType, &["Body Type", "BodyType"]),
    (FieldKey::EatingHabit, &["Eating Habit", "EatingHabit"]),
    (FieldKey::Complexion, &["Complexion"]),
    (FieldKey::PhysicalStatus, &["Physical Status", "PhysicalStatus"]),
    (FieldKey::SmokingHabit, &["Smoking Habit", "SmokingHabit"]),
    (FieldKey::DrinkingHabit, &["Drinking Habit", "DrinkingHabit"]),
    (FieldKey::FamilyValue, &["Family Value", "FamilyValue"]),
    (FieldKey::FamilyType, &["Family Type", "FamilyType"]),
    (FieldKey::FamilyStatus, &["Family Status", "FamilyStatus"]),
    (FieldKey::AnnualIncome, &["Annual Income", "AnnualIncome"]),
];

/// First occurrence of one label spelling in the normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelOccurrence {
    pub label: &'static str,
    pub start: usize,
    pub value_start: usize,
    pub next_label_offset: usize,
}

struct NarrativePattern {
    key: FieldKey,
    start: Regex,
    end: Option<Regex>,
}

pub struct FieldExtractor {
    labels: Vec<(&'static str, Regex)>,
    narratives: Vec<NarrativePattern>,
}

impl FieldExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        let mut seen = HashSet::new();
        let mut labels = Vec::new();
        for (_, spellings) in LABEL_VOCABULARY {
            for label in spellings.iter().copied() {
                if seen.insert(label) {
                    labels.push((label, label_regex(label)?));
                }
            }
        }

        let narratives = vec![
            NarrativePattern {
                key: FieldKey::MoreAboutSelf,
                start: Regex::new(r"(?i)More About Self[:\s]+")?,
                end: Some(Regex::new(
                    r"(?i)\s*(?:Your Expectation|About Parents Siblings)",
                )?),
            },
            NarrativePattern {
                key: FieldKey::YourExpectation,
                start: Regex::new(r"(?i)Your Expectation[:\s]+")?,
                end: Some(Regex::new(r"(?i)\s*About Parents Siblings")?),
            },
            NarrativePattern {
                key: FieldKey::AboutParentsSiblings,
                start: Regex::new(r"(?i)About Parents Siblings[:\s]+")?,
                end: None,
            },
        ];

        Ok(Self { labels, narratives })
    }

    /// First occurrence of every known label, sorted by offset. Each occurrence's
    /// value runs up to the next label that starts at or after its value.
    pub fn locate_labels(&self, text: &str) -> Vec<LabelOccurrence> {
        let mut occurrences = self
            .labels
            .iter()
            .filter_map(|(label, pattern)| {
                pattern.find(text).map(|found| LabelOccurrence {
                    label: *label,
                    start: found.start(),
                    value_start: found.end(),
                    next_label_offset: text.len(),
                })
            })
            .collect::<Vec<LabelOccurrence>>();

        occurrences.sort_by_key(|occurrence| occurrence.start);

        let starts = occurrences
            .iter()
            .map(|occurrence| occurrence.start)
            .collect::<Vec<usize>>();
        for occurrence in &mut occurrences {
            if let Some(next) = starts
                .iter()
                .copied()
                .find(|start| *start >= occurrence.value_start)
            {
                occurrence.next_label_offset = next;
            }
        }

        occurrences
    }

    /// Builds the record from whitespace-normalized document text.
    pub fn extract(&self, text: &str) -> ProfileRecord {
        let occurrences = self.locate_labels(text);
        let mut record = ProfileRecord::new();

        for (key, spellings) in LABEL_VOCABULARY {
            for label in spellings.iter() {
                let Some(occurrence) = occurrences
                    .iter()
                    .find(|occurrence| occurrence.label == *label)
                else {
                    continue;
                };

                let value = &text[occurrence.value_start..occurrence.next_label_offset];
                if record.insert(*key, value) {
                    break;
                }
            }
        }

        for narrative in &self.narratives {
            if let Some(value) = narrative.capture(text) {
                record.insert(narrative.key, value);
            }
        }

        apply_measurements(&mut record);
        record
    }
}

impl NarrativePattern {
    fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        let start = self.start.find(text)?;
        let rest = &text[start.end()..];
        let end = self
            .end
            .as_ref()
            .and_then(|pattern| pattern.find(rest))
            .map(|found| found.start())
            .unwrap_or(rest.len());
        Some(&rest[..end])
    }
}

fn label_regex(label: &str) -> Result<Regex, regex::Error> {
    let escaped = label
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<String>>()
        .join(r"\s+");

    if label.contains(' ') {
        Regex::new(&format!(r"(?i){escaped}:\s*"))
    } else {
        Regex::new(&format!(r"(?i)\b{escaped}:\s*"))
    }
}

fn apply_measurements(record: &mut ProfileRecord) {
    if let Some(height) = record.get(FieldKey::Height).and_then(parse_height) {
        record.insert(FieldKey::HeightFeet, &height.feet);
        record.insert(FieldKey::HeightInches, &height.inches);
        record.insert(FieldKey::HeightCms, &height.cms);
    }

    if let Some(weight) = record.get(FieldKey::Weight).and_then(parse_weight) {
        record.insert(FieldKey::WeightKg, &weight.kg);
        record.insert(FieldKey::WeightLbs, &weight.lbs);
    }
}
