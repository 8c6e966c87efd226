use crate::model::FieldKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Choice,
}

/// How one record field reaches the form: alternation of selectors from most to
/// least specific, plus the option labels a choice control is expected to carry.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub key: FieldKey,
    pub kind: FieldKind,
    pub locator: &'static str,
    pub choice_options: &'static [&'static str],
}

const fn text(key: FieldKey, locator: &'static str) -> FieldMapping {
    FieldMapping {
        key,
        kind: FieldKind::Text,
        locator,
        choice_options: &[],
    }
}

const fn choice(
    key: FieldKey,
    locator: &'static str,
    choice_options: &'static [&'static str],
) -> FieldMapping {
    FieldMapping {
        key,
        kind: FieldKind::Choice,
        locator,
        choice_options,
    }
}

pub const FIELD_MAPPINGS: &[FieldMapping] = &[
    text(
        FieldKey::Name,
        r#"input#name, input[id="name"], input[name="name"], input[name*="Name"]:not([type="password"]):not([name*="Password"]), input[placeholder*="Name"]:not([type="password"])"#,
    ),
    text(
        FieldKey::Age,
        r#"input[name*="Age"], input[id*="age"], input[placeholder*="Age"]"#,
    ),
    text(
        FieldKey::Education,
        r#"input[name*="Education"], input[id*="education"], input[placeholder*="Education"]"#,
    ),
    text(
        FieldKey::Occupation,
        r#"input[name*="Occupation"], input[id*="occupation"], input[placeholder*="Occupation"]"#,
    ),
    text(
        FieldKey::Caste,
        r#"input#caste, input[id="caste"], input[name="caste"], input[name*="Caste"], input[id*="caste"], input[placeholder*="Caste"]"#,
    ),
    text(
        FieldKey::Gothram,
        r#"input[name*="Gothra"], input[id*="gothra"], input[placeholder*="Gothra"]"#,
    ),
    text(
        FieldKey::HoroscopeMatch,
        r#"input[name*="Horoscope"], input[id*="horoscope"], input[placeholder*="Horoscope"]"#,
    ),
    text(
        FieldKey::RassiMoonSign,
        r#"input[name*="Raasi"], input[name*="Rassi"], input[id*="raasi"], input[placeholder*="Raasi"]"#,
    ),
    text(
        FieldKey::HeightFeet,
        r#"input[name*="Height Feet"], input[id*="heightFeet"], input[placeholder*="Height Feet"]"#,
    ),
    text(
        FieldKey::HeightInches,
        r#"input[name*="Height Inches"], input[id*="heightInches"], input[placeholder*="Height Inches"]"#,
    ),
    text(
        FieldKey::WeightLbs,
        r#"input[name*="Weight Lbs"], input[id*="weightLbs"], input[placeholder*="Weight Lbs"]"#,
    ),
    text(
        FieldKey::HomeState,
        r#"input[name*="Home State"], input[id*="homeState"], input[placeholder*="Home State"]"#,
    ),
    text(
        FieldKey::HomeCityDistrict,
        r#"input[id*="homeCity"], input[id*="cityDistrict"], input[name*="Home City"], input[name*="City District"], input[placeholder*="Home City"], input[placeholder*="City District"]"#,
    ),
    choice(
        FieldKey::CountryLivingIn,
        r#"select[name*="Country"], select[id*="country"], select[placeholder*="Country"]"#,
        &["India", "USA", "UK", "Canada", "Australia", "Other"],
    ),
    text(
        FieldKey::Email,
        r#"input[type="email"]:not([name*="Retype"]):not([id*="retype"]), input[name*="Email"]:not([name*="Retype"]):not([id*="retype"]), input[id*="email"]:not([id*="retype"]):not([name*="Retype"])"#,
    ),
    choice(
        FieldKey::BodyType,
        r#"select[name*="Body"], select[id*="bodyType"], select[placeholder*="Body"]"#,
        &["Slim", "Average", "Athletic", "Heavy", "Other"],
    ),
    text(
        FieldKey::PhysicalStatus,
        r#"input[name*="Physical"], input[id*="physical"], input[placeholder*="Physical"]"#,
    ),
    text(
        FieldKey::DrinkingHabit,
        r#"input[name*="Drinking"], input[id*="drinking"], input[placeholder*="Drinking"]"#,
    ),
    choice(
        FieldKey::FamilyValue,
        r#"select[name*="FamilyValue"], select[id*="familyValue"], select[placeholder*="FamilyValue"]"#,
        &["Traditional", "Moderate", "Liberal", "Other"],
    ),
    text(
        FieldKey::FamilyStatus,
        r#"input[name*="Family Status"], input[id*="familyStatus"], input[placeholder*="Family Status"]"#,
    ),
    text(
        FieldKey::AboutParentsSiblings,
        r#"textarea[name*="Parents"], textarea[id*="parents"], input[name*="Parents"], input[placeholder*="Parents"]"#,
    ),
    text(
        FieldKey::YourExpectation,
        r#"textarea[name*="Expectation"], textarea[id*="expectation"], input[name*="Expectation"], input[placeholder*="Expectation"]"#,
    ),
    text(
        FieldKey::RetypePassword,
        r#"input[name*="Retype Password"], input[id*="retypePassword"], input[type="password"][name*="retype"]"#,
    ),
    text(
        FieldKey::Gender,
        r#"input[name*="Gender"], input[id*="gender"], input[placeholder*="Gender"]"#,
    ),
    text(
        FieldKey::MaritalStatus,
        r#"input[name*="Marital"], input[id*="marital"], input[placeholder*="Marital"]"#,
    ),
    text(
        FieldKey::EducationDetail,
        r#"input[name*="Education Detail"], input[id*="educationDetail"], input[placeholder*="Education Detail"]"#,
    ),
    choice(
        FieldKey::Religion,
        r#"select[name*="Religion"], select[id*="religion"], select[placeholder*="Religion"]"#,
        &["Hindu", "Muslim", "Christian", "Sikh", "Buddhist", "Jain", "Other"],
    ),
    text(
        FieldKey::SubCaste,
        r#"input[name*="Sub Caste"], input[id*="subCaste"], input[placeholder*="Sub Caste"]"#,
    ),
    text(
        FieldKey::MotherTongue,
        r#"input[name*="Mother Tongue"], input[id*="motherTongue"], input[placeholder*="Mother Tongue"]"#,
    ),
    choice(
        FieldKey::Star,
        r#"select[name*="Star"], select[id*="star"], select[placeholder*="Star"]"#,
        &[
            "Aswini",
            "Bharani",
            "Krittika",
            "Rohini",
            "Mrigashira",
            "Ardra",
            "Punarvasu",
            "Pushya",
            "Ashlesha",
            "Magha",
            "Purva Phalguni",
            "Uttara Phalguni",
            "Hasta",
            "Chitra",
            "Swati",
            "Vishakha",
            "Anuradha",
            "Jyeshta",
            "Mula",
            "Purva Ashadha",
            "Uttara Ashadha",
            "Shravana",
            "Dhanishta",
            "Shatabhisha",
            "Purva Bhadrapada",
            "Uttara Bhadrapada",
            "Revati",
            "Other",
        ],
    ),
    choice(
        FieldKey::DhoshamManglik,
        r#"select[name*="Dosham"], select[name*="Dhosham"], select[id*="dosham"], select[placeholder*="Dosham"]"#,
        &["Yes", "No", "Other"],
    ),
    text(
        FieldKey::HeightCms,
        r#"input[name*="Height Cms"], input[id*="heightCms"], input[placeholder*="Height Cms"]"#,
    ),
    text(
        FieldKey::WeightKg,
        r#"input[name*="Weight Kg"], input[id*="weightKg"], input[placeholder*="Weight Kg"]"#,
    ),
    choice(
        FieldKey::Citizenship,
        r#"select[name*="Citizenship"], select[id*="citizenship"], select[placeholder*="Citizenship"]"#,
        &["Indian", "USA", "UK", "Canada", "Australia", "Other"],
    ),
    text(
        FieldKey::StateCityLivingIn,
        r#"input[name*="State City"], input[id*="stateCity"], input[placeholder*="State City"]"#,
    ),
    text(
        FieldKey::RetypeEmail,
        r#"input[name*="Retype Email"], input[id*="retypeEmail"], input[type="email"][name*="retype"]"#,
    ),
    text(
        FieldKey::Complexion,
        r#"input[name*="Complexion"], input[id*="complexion"], input[placeholder*="Complexion"]"#,
    ),
    choice(
        FieldKey::EatingHabit,
        r#"select[name*="Eating"], select[id*="eatingHabit"], select[placeholder*="Eating"]"#,
        &["Vegetarian", "Non-Vegetarian", "Vegan", "Eggetarian", "Other"],
    ),
    choice(
        FieldKey::SmokingHabit,
        r#"select[name*="Smoking"], select[id*="smokingHabit"], select[placeholder*="Smoking"]"#,
        &["Never", "Occasionally", "Regularly", "Other"],
    ),
    text(
        FieldKey::FamilyType,
        r#"input[name*="Family Type"], input[id*="familyType"], input[placeholder*="Family Type"]"#,
    ),
    text(
        FieldKey::AnnualIncome,
        r#"input[name*="Annual Income"], input[id*="annualIncome"], input[placeholder*="Annual Income"]"#,
    ),
    text(
        FieldKey::MoreAboutSelf,
        r#"textarea#moreAboutSelf, textarea[id="moreAboutSelf"], textarea[name="moreAboutSelf"], textarea[name*="More About"], textarea[id*="moreAbout"], input[name*="More About"], input[placeholder*="More About"]"#,
    ),
    text(
        FieldKey::Password,
        r#"input#password[type="password"], input[type="password"][id="password"], input[type="password"][name="password"], input[type="password"][name*="Password"]:not([name*="Retype"]), input[type="password"][id*="password"]:not([id*="retype"])"#,
    ),
    text(
        FieldKey::HowToKnowAboutUs,
        r#"input[name*="How To Know"], input[id*="howToKnow"], input[placeholder*="How To Know"]"#,
    ),
];

/// Identity fields first, then demographics, education, background, location,
/// physical, habits, family, free text.
pub const FILL_PRIORITY: &[FieldKey] = &[
    FieldKey::Name,
    FieldKey::Email,
    FieldKey::RetypeEmail,
    FieldKey::Password,
    FieldKey::RetypePassword,
    FieldKey::Age,
    FieldKey::Gender,
    FieldKey::MaritalStatus,
    FieldKey::Education,
    FieldKey::EducationDetail,
    FieldKey::Occupation,
    FieldKey::Caste,
    FieldKey::SubCaste,
    FieldKey::Religion,
    FieldKey::Gothram,
    FieldKey::HomeState,
    FieldKey::HomeCityDistrict,
    FieldKey::StateCityLivingIn,
    FieldKey::CountryLivingIn,
    FieldKey::HeightFeet,
    FieldKey::HeightInches,
    FieldKey::HeightCms,
    FieldKey::WeightKg,
    FieldKey::WeightLbs,
    FieldKey::BodyType,
    FieldKey::Complexion,
    FieldKey::PhysicalStatus,
    FieldKey::EatingHabit,
    FieldKey::SmokingHabit,
    FieldKey::DrinkingHabit,
    FieldKey::FamilyValue,
    FieldKey::FamilyType,
    FieldKey::FamilyStatus,
    FieldKey::AnnualIncome,
    FieldKey::MoreAboutSelf,
    FieldKey::YourExpectation,
    FieldKey::AboutParentsSiblings,
    FieldKey::HowToKnowAboutUs,
];

pub fn mapping_for(key: FieldKey) -> Option<&'static FieldMapping> {
    FIELD_MAPPINGS.iter().find(|mapping| mapping.key == key)
}

/// Registry entries in fill order: the priority list, then the rest in registry order.
pub fn ordered_mappings() -> Vec<&'static FieldMapping> {
    let mut ordered = FILL_PRIORITY
        .iter()
        .filter_map(|key| mapping_for(*key))
        .collect::<Vec<&'static FieldMapping>>();

    for mapping in FIELD_MAPPINGS {
        if !ordered.iter().any(|existing| existing.key == mapping.key) {
            ordered.push(mapping);
        }
    }

    ordered
}
