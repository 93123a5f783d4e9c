// Output filename: <NAME>_ADR_<MMDDYYYY>.pdf

use chrono::NaiveDate;

/// Placeholder token when the patient name normalizes to nothing.
const FALLBACK_TOKEN: &str = "UNKNOWN";

const EXTENSION: &str = ".pdf";

/// Collapse a patient name to an uppercase alphanumeric token with single
/// underscores between runs.
fn name_token(name: &str) -> String {
    let mut token = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            token.push(c.to_ascii_uppercase());
        } else if !token.is_empty() && !token.ends_with('_') {
            token.push('_');
        }
    }
    let token = token.trim_end_matches('_');
    if token.is_empty() {
        FALLBACK_TOKEN.to_string()
    } else {
        token.to_string()
    }
}

/// Build the output filename for a checklist generated on `date`.
pub fn build_filename(patient_name: &str, date: NaiveDate) -> String {
    format!(
        "{}_ADR_{}{}",
        name_token(patient_name),
        date.format("%m%d%Y"),
        EXTENSION
    )
}
