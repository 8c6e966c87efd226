use crate::model::{FieldKey, ProfileRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisConfig {
    pub email_domain: String,
    pub password_suffix: String,
    pub referral_source: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            email_domain: "nitresearchcenter.com".to_string(),
            password_suffix: "@1234".to_string(),
            referral_source: "My Friend".to_string(),
        }
    }
}

/// Returns `record` extended with the fields the form needs but the PDF never
/// carries. Keys already present are left as they are.
pub fn synthesize(record: &ProfileRecord, config: &SynthesisConfig) -> ProfileRecord {
    let mut augmented = record.clone();
    for (key, value) in derive_fields(record, config) {
        augmented.insert_if_absent(key, &value);
    }
    augmented
}

fn derive_fields(record: &ProfileRecord, config: &SynthesisConfig) -> Vec<(FieldKey, String)> {
    let mut derived = Vec::new();

    if let (Some(form_number), Some(name)) =
        (record.get(FieldKey::FormNumber), record.get(FieldKey::Name))
    {
        let name_slug = name.split_whitespace().collect::<Vec<&str>>().join("_");
        let email = format!("{form_number}_{name_slug}@{}", config.email_domain);
        derived.push((FieldKey::Email, email.clone()));
        derived.push((FieldKey::RetypeEmail, email));
    }

    if let Some(first_name) = record
        .get(FieldKey::Name)
        .and_then(|name| name.split_whitespace().next())
    {
        let password = format!("{first_name}{}", config.password_suffix);
        derived.push((FieldKey::Password, password.clone()));
        derived.push((FieldKey::RetypePassword, password));
    }

    derived.push((FieldKey::HowToKnowAboutUs, config.referral_source.clone()));

    // The form asks for city/district and current state; the PDF only has the home state.
    if let Some(home_state) = record.get(FieldKey::HomeState) {
        derived.push((FieldKey::HomeCityDistrict, home_state.to_string()));
        derived.push((FieldKey::StateCityLivingIn, home_state.to_string()));
    }

    derived
}
