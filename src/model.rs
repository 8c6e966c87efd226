use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! field_keys {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Logical profile field. The serialized names are the record's JSON keys.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum FieldKey {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl FieldKey {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(FieldKey::$variant => $name,)+
                }
            }
        }
    };
}

field_keys! {
    FormNumber => "formNumber",
    Name => "name",
    Gender => "gender",
    Age => "age",
    MaritalStatus => "maritalStatus",
    Education => "education",
    EducationDetail => "educationDetail",
    Occupation => "occupation",
    Religion => "religion",
    Caste => "caste",
    SubCaste => "subCaste",
    Gothram => "gothram",
    MotherTongue => "motherTongue",
    HoroscopeMatch => "horoscopeMatch",
    Star => "star",
    RassiMoonSign => "rassiMoonSign",
    DhoshamManglik => "dhoshamManglik",
    Height => "height",
    Weight => "weight",
    Citizenship => "citizenship",
    HomeState => "homeState",
    CountryLivingIn => "countryLivingIn",
    BodyType => "bodyType",
    EatingHabit => "eatingHabit",
    Complexion => "complexion",
    PhysicalStatus => "physicalStatus",
    SmokingHabit => "smokingHabit",
    DrinkingHabit => "drinkingHabit",
    FamilyValue => "familyValue",
    FamilyType => "familyType",
    FamilyStatus => "familyStatus",
    AnnualIncome => "annualIncome",
    MoreAboutSelf => "moreAboutSelf",
    YourExpectation => "yourExpectation",
    AboutParentsSiblings => "aboutParentsSiblings",
    HeightFeet => "heightFeet",
    HeightInches => "heightInches",
    HeightCms => "heightCms",
    WeightKg => "weightKg",
    WeightLbs => "weightLbs",
    Email => "email",
    RetypeEmail => "retypeEmail",
    Password => "password",
    RetypePassword => "retypePassword",
    HowToKnowAboutUs => "howToKnowAboutUs",
    HomeCityDistrict => "homeCityDistrict",
    StateCityLivingIn => "stateCityLivingIn",
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted profile. Present values are always trimmed and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<FieldKey, String>",
    into = "BTreeMap<FieldKey, String>"
)]
pub struct ProfileRecord {
    fields: BTreeMap<FieldKey, String>,
}

impl ProfileRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    /// Stores the trimmed value. Blank values leave the key untouched and return false.
    pub fn insert(&mut self, key: FieldKey, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.fields.insert(key, value.to_string());
        true
    }

    pub fn insert_if_absent(&mut self, key: FieldKey, value: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        self.insert(key, value)
    }

    pub fn remove(&mut self, key: FieldKey) -> Option<String> {
        self.fields.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.fields.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

impl From<BTreeMap<FieldKey, String>> for ProfileRecord {
    fn from(raw: BTreeMap<FieldKey, String>) -> Self {
        let mut record = ProfileRecord::new();
        for (key, value) in raw {
            record.insert(key, &value);
        }
        record
    }
}

impl From<ProfileRecord> for BTreeMap<FieldKey, String> {
    fn from(record: ProfileRecord) -> Self {
        record.fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledField {
    pub field: FieldKey,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedField {
    pub field: FieldKey,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FieldKey,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillOutcome {
    pub filled: Vec<FilledField>,
    pub skipped: Vec<SkippedField>,
    pub errors: Vec<FieldError>,
}

impl FillOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_clean() {
            format!("Form filled successfully! ({} fields)", self.filled.len())
        } else {
            format!(
                "Form filled with {} fields. {} errors, {} skipped.",
                self.filled.len(),
                self.errors.len(),
                self.skipped.len()
            )
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_path: String,
    pub source_sha256: String,
    pub source_bytes: usize,
    pub backend: String,
    pub page_count: usize,
    pub field_count: usize,
    pub record_path: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FillRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub finished_at: String,
    pub form_path: String,
    pub record_source: String,
    pub summary: String,
    pub outcome: FillOutcome,
    pub controls: Vec<ControlValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlValue {
    pub tag: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub value: String,
    pub events: Vec<String>,
}
