use regex::Regex;

const CM_PER_INCH: f64 = 2.54;
const LBS_PER_KG: f64 = 2.20462;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Height {
    pub feet: String,
    pub inches: String,
    pub cms: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weight {
    pub kg: String,
    pub lbs: String,
}

/// Reduces an income cell to `Rs. <amount>`, dropping the "per annum" tail and
/// any section text swallowed after it.
pub fn normalize_income(raw: &str) -> String {
    let amount = raw.split("per annum").next().unwrap_or(raw).trim();
    let amount = strip_currency_prefix(amount);
    let amount = amount.split("More About").next().unwrap_or(amount).trim();

    if amount.is_empty() {
        raw.to_string()
    } else {
        format!("Rs. {amount}")
    }
}

fn strip_currency_prefix(value: &str) -> &str {
    match value.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("rs.") => value[3..].trim_start(),
        _ => value,
    }
}

/// Cuts a narrative block at the first following section marker.
pub fn normalize_free_text(raw: &str) -> String {
    let cut = ["Your Expectation", "About Parents Siblings"]
        .iter()
        .filter_map(|marker| find_ascii_case_insensitive(raw, marker))
        .min()
        .unwrap_or(raw.len());

    raw[..cut].trim().to_string()
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }

    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Parses `6'7"` style heights.
pub fn parse_height(raw: &str) -> Option<Height> {
    let pattern = Regex::new(r#"(\d+)'(\d+)""#).ok()?;
    let captures = pattern.captures(raw)?;

    let feet = captures.get(1)?.as_str();
    let inches = captures.get(2)?.as_str();
    let total_inches = feet
        .parse::<u64>()
        .ok()?
        .checked_mul(12)?
        .checked_add(inches.parse::<u64>().ok()?)?;
    let cms = (total_inches as f64 * CM_PER_INCH).round() as u64;

    Some(Height {
        feet: feet.to_string(),
        inches: inches.to_string(),
        cms: cms.to_string(),
    })
}

/// Parses `84 kg` or `185 lbs`, deriving the other unit. Kilograms win when both appear.
pub fn parse_weight(raw: &str) -> Option<Weight> {
    let kg_pattern = Regex::new(r"(?i)(\d+)\s*kg").ok()?;
    let lbs_pattern = Regex::new(r"(?i)(\d+)\s*lbs?").ok()?;

    if let Some(captures) = kg_pattern.captures(raw) {
        let kg = captures.get(1)?.as_str();
        let lbs = (kg.parse::<u64>().ok()? as f64 * LBS_PER_KG).round() as u64;
        return Some(Weight {
            kg: kg.to_string(),
            lbs: lbs.to_string(),
        });
    }

    let captures = lbs_pattern.captures(raw)?;
    let lbs = captures.get(1)?.as_str();
    let kg = (lbs.parse::<u64>().ok()? as f64 / LBS_PER_KG).round() as u64;
    Some(Weight {
        kg: kg.to_string(),
        lbs: lbs.to_string(),
    })
}
