use super::page_text::split_form_feed_pages;
use super::units::{Height, parse_height, parse_weight};
use super::*;
use crate::model::FieldKey;

const SAMPLE_PROFILE: &str = "Form Number: 4521 Name: Jane Doe Gender: Female Age: 29 \
    Marital Status: Never Married Religion: Hindu Sub Caste: Vadama Height: 6'7\" \
    Weight: 84 kg Home State: Tamil Nadu Annual Income: Rs. 20 Lakh per annum \
    More About Self: Calm and caring. Your Expectation: Someone honest. \
    About Parents Siblings: Two elder brothers.";

fn extract_text(text: &str) -> ProfileRecord {
    let extractor = FieldExtractor::new().expect("label patterns compile");
    extractor.extract(text)
}

#[test]
fn label_values_run_until_the_next_label() {
    let record = extract_text(SAMPLE_PROFILE);

    assert_eq!(record.get(FieldKey::FormNumber), Some("4521"));
    assert_eq!(record.get(FieldKey::Name), Some("Jane Doe"));
    assert_eq!(record.get(FieldKey::Gender), Some("Female"));
    assert_eq!(record.get(FieldKey::Age), Some("29"));
    assert_eq!(record.get(FieldKey::MaritalStatus), Some("Never Married"));
    assert_eq!(record.get(FieldKey::SubCaste), Some("Vadama"));
    assert_eq!(record.get(FieldKey::HomeState), Some("Tamil Nadu"));
}

#[test]
fn narratives_stop_at_the_following_section() {
    let record = extract_text(SAMPLE_PROFILE);

    assert_eq!(record.get(FieldKey::MoreAboutSelf), Some("Calm and caring."));
    assert_eq!(record.get(FieldKey::YourExpectation), Some("Someone honest."));
    assert_eq!(
        record.get(FieldKey::AboutParentsSiblings),
        Some("Two elder brothers.")
    );
}

#[test]
fn measurements_expand_into_unit_fields() {
    let record = extract_text(SAMPLE_PROFILE);

    assert_eq!(record.get(FieldKey::Height), Some("6'7\""));
    assert_eq!(record.get(FieldKey::HeightFeet), Some("6"));
    assert_eq!(record.get(FieldKey::HeightInches), Some("7"));
    assert_eq!(record.get(FieldKey::HeightCms), Some("201"));
    assert_eq!(record.get(FieldKey::WeightKg), Some("84"));
    assert_eq!(record.get(FieldKey::WeightLbs), Some("185"));
}

#[test]
fn caste_reads_the_sub_caste_value_when_no_standalone_label_exists() {
    let record = extract_text(SAMPLE_PROFILE);

    assert_eq!(record.get(FieldKey::Caste), Some("Vadama"));
    assert_eq!(record.get(FieldKey::SubCaste), Some("Vadama"));
}

#[test]
fn empty_label_value_leaves_the_key_absent() {
    let record = extract_text("Name: Gender: Female Age: 31");

    assert!(!record.contains(FieldKey::Name));
    assert_eq!(record.get(FieldKey::Gender), Some("Female"));
    assert_eq!(record.get(FieldKey::Age), Some("31"));
}

#[test]
fn surname_is_not_read_as_name() {
    let record = extract_text("Surname: Rao Gender: Male");

    assert!(!record.contains(FieldKey::Name));
    assert_eq!(record.get(FieldKey::Gender), Some("Male"));
}

#[test]
fn repeated_labels_keep_the_first_occurrence() {
    let record = extract_text("Name: Asha Age: 27 Name: Reference Contact");

    assert_eq!(record.get(FieldKey::Name), Some("Asha"));
}

#[test]
fn alternate_spellings_are_recognised() {
    let record = extract_text("FormNumber: 77 Gothra: Kashyapa Dosham Manglik: No");

    assert_eq!(record.get(FieldKey::FormNumber), Some("77"));
    assert_eq!(record.get(FieldKey::Gothram), Some("Kashyapa"));
    assert_eq!(record.get(FieldKey::DhoshamManglik), Some("No"));
}

#[test]
fn locate_labels_orders_occurrences_and_links_boundaries() {
    let extractor = FieldExtractor::new().expect("label patterns compile");
    let text = "Age: 30 Name: Ravi";

    let occurrences = extractor.locate_labels(text);
    assert_eq!(occurrences.len(), 2);
    assert_eq!(occurrences[0].label, "Age");
    assert_eq!(occurrences[0].next_label_offset, occurrences[1].start);
    assert_eq!(occurrences[1].label, "Name");
    assert_eq!(occurrences[1].next_label_offset, text.len());
}

#[test]
fn document_text_collapses_whitespace_across_pages() {
    let pages = vec![
        "Name:   Jane\n Doe\n".to_string(),
        String::new(),
        "\tGender:\r\nFemale ".to_string(),
    ];

    assert_eq!(
        normalize_document_text(&pages),
        "Name: Jane Doe Gender: Female"
    );
}

#[test]
fn income_keeps_only_the_amount() {
    assert_eq!(
        normalize_income("Rs. 20 Lakh per annum More About Self: ..."),
        "Rs. 20 Lakh"
    );
    assert_eq!(normalize_income("15 Lakh"), "Rs. 15 Lakh");
    assert_eq!(normalize_income("Rs."), "Rs.");
}

#[test]
fn free_text_is_cut_at_the_next_section() {
    assert_eq!(
        normalize_free_text("Enjoys travel. Your Expectation: kind"),
        "Enjoys travel."
    );
    assert_eq!(
        normalize_free_text("Reads a lot. about parents siblings: one sister"),
        "Reads a lot."
    );
    assert_eq!(normalize_free_text("  Plain text  "), "Plain text");
}

#[test]
fn height_converts_to_centimetres() {
    let height = parse_height("6'7\"").expect("height parses");

    assert_eq!(
        height,
        Height {
            feet: "6".to_string(),
            inches: "7".to_string(),
            cms: "201".to_string(),
        }
    );
    assert!(parse_height("tall").is_none());
}

#[test]
fn oversized_height_is_left_unconverted() {
    assert!(parse_height("9999999999999999999'1\"").is_none());

    let record = extract_text("Height: 9999999999999999999'1\" Age: 3");
    assert_eq!(record.get(FieldKey::Height), Some("9999999999999999999'1\""));
    assert!(!record.contains(FieldKey::HeightCms));
    assert!(!record.contains(FieldKey::HeightFeet));
    assert_eq!(record.get(FieldKey::Age), Some("3"));
}

#[test]
fn weight_converts_between_units() {
    let metric = parse_weight("84 kg").expect("kg parses");
    assert_eq!(metric.kg, "84");
    assert_eq!(metric.lbs, "185");

    let imperial = parse_weight("185 lbs").expect("lbs parses");
    assert_eq!(imperial.lbs, "185");
    let kg = imperial.kg.parse::<i64>().expect("kg is numeric");
    assert!((kg - 84).abs() <= 1);

    assert!(parse_weight("average").is_none());
}

#[test]
fn synthesize_derives_login_fields() {
    let mut record = ProfileRecord::new();
    record.insert(FieldKey::FormNumber, "123");
    record.insert(FieldKey::Name, "Jane Doe");

    let augmented = synthesize(&record, &SynthesisConfig::default());
    assert_eq!(
        augmented.get(FieldKey::Email),
        Some("123_Jane_Doe@nitresearchcenter.com")
    );
    assert_eq!(
        augmented.get(FieldKey::RetypeEmail),
        augmented.get(FieldKey::Email)
    );
    assert_eq!(augmented.get(FieldKey::Password), Some("Jane@1234"));
    assert_eq!(
        augmented.get(FieldKey::RetypePassword),
        augmented.get(FieldKey::Password)
    );
    assert_eq!(augmented.get(FieldKey::HowToKnowAboutUs), Some("My Friend"));
    assert_eq!(augmented.get(FieldKey::Name), Some("Jane Doe"));
}

#[test]
fn synthesize_never_overwrites_existing_values() {
    let mut record = ProfileRecord::new();
    record.insert(FieldKey::Name, "Jane");
    record.insert(FieldKey::HomeState, "Kerala");
    record.insert(FieldKey::HomeCityDistrict, "Kochi");

    let augmented = synthesize(&record, &SynthesisConfig::default());
    assert_eq!(augmented.get(FieldKey::Name), Some("Jane"));
    assert_eq!(augmented.get(FieldKey::HomeCityDistrict), Some("Kochi"));
    assert_eq!(augmented.get(FieldKey::StateCityLivingIn), Some("Kerala"));
    assert!(!augmented.contains(FieldKey::Email));
}

#[test]
fn synthesize_uses_the_configured_domain() {
    let mut record = ProfileRecord::new();
    record.insert(FieldKey::FormNumber, "9");
    record.insert(FieldKey::Name, "Arun Kumar");
    let config = SynthesisConfig {
        email_domain: "example.org".to_string(),
        ..SynthesisConfig::default()
    };

    let augmented = synthesize(&record, &config);
    assert_eq!(
        augmented.get(FieldKey::Email),
        Some("9_Arun_Kumar@example.org")
    );
}

#[test]
fn malformed_bytes_are_rejected() {
    let result = extract(b"this is not a pdf", TextBackend::Lopdf);

    assert!(matches!(result, Err(ExtractionError::Malformed(_))));
}

#[test]
fn form_feed_output_without_text_has_no_pages() {
    assert!(matches!(
        split_form_feed_pages(""),
        Err(ExtractionError::NoPages)
    ));
    assert!(matches!(
        split_form_feed_pages("\u{000C}  \u{000C}\n"),
        Err(ExtractionError::NoPages)
    ));

    let pages = split_form_feed_pages("first\u{000C}second\u{000C}").expect("two pages");
    assert_eq!(pages, vec!["first".to_string(), "second".to_string()]);
}
