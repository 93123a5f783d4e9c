// Checklist record: the validated input the layout engine consumes.

use serde::Deserialize;

use crate::AppError;

/// A value paired with its document-present checkbox.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckedField {
    pub value: String,
    pub checked: bool,
}

/// One therapy discipline line (PT, OT, ST).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TherapyDiscipline {
    pub checked: bool,
    pub initial_eval: String,
    /// Only meaningful for PT; the other disciplines leave it false.
    pub not_applicable: bool,
    pub review_notes: String,
    pub discharge_date: String,
    pub summary: String,
}

/// Chart-tracking flags drawn side by side at the bottom of the sheet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackingFlags {
    pub spreadsheet: bool,
    pub checklist: bool,
    pub folder: bool,
    pub email: bool,
}

/// Flat record for one ADR audit. Built fresh per generate action and
/// discarded after rendering. Every field is optional in the input JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChecklistRecord {
    pub patient_name: String,
    pub soc_date: String,
    pub active_or_discharged: String,
    pub claim_dates: Vec<String>,
    pub cert_period_start: String,
    pub cert_period_end: String,
    pub f2f_referral: CheckedField,
    pub orders_485: CheckedField,
    /// The SN/OASIS row draws a single checkbox, governed by the SOC
    /// entry; the ROC entry contributes only its value.
    pub sn_oasis_soc: CheckedField,
    pub sn_oasis_roc: CheckedField,
    pub revisits: String,
    pub recerts: CheckedField,
    pub tfr6: String,
    pub dc_oasis: String,
    pub pt: TherapyDiscipline,
    pub ot: TherapyDiscipline,
    pub st: TherapyDiscipline,
    pub hha_poc: String,
    pub electronic_sig: String,
    pub docusign_certs: String,
    pub abn: String,
    pub adr_letter: CheckedField,
    pub ub: CheckedField,
    pub oasis_transmittals: CheckedField,
    pub physician_sig_log: CheckedField,
    pub cover_letter: CheckedField,
    pub coord_notes: CheckedField,
    pub tracking: TrackingFlags,
}

impl ChecklistRecord {
    /// Normalize the date-bearing fields to MM/DD/YY and drop blank claim
    /// date rows. Therapy sub-fields are free text and stay as entered.
    fn normalize_dates(&mut self) {
        self.soc_date = fmt_date(&self.soc_date);
        self.cert_period_start = fmt_date(&self.cert_period_start);
        self.cert_period_end = fmt_date(&self.cert_period_end);
        for date in &mut self.claim_dates {
            *date = fmt_date(date);
        }
        self.claim_dates.retain(|date| !date.is_empty());
    }
}

/// Format an ISO date (YYYY-MM-DD) as MM/DD/YY. Empty input stays empty
/// and anything unparseable is returned as typed, never an error.
pub fn fmt_date(val: &str) -> String {
    if val.is_empty() {
        return String::new();
    }
    match chrono::NaiveDate::parse_from_str(val, "%Y-%m-%d") {
        Ok(date) => date.format("%m/%d/%y").to_string(),
        Err(_) => val.to_string(),
    }
}

/// Read and normalize a checklist record from a JSON file. An empty JSON
/// object yields an all-blank record.
pub fn load_record(path: &str) -> Result<ChecklistRecord, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::RecordError(format!("{}: {}", path, e)))?;
    let mut record: ChecklistRecord = serde_json::from_str(&content)
        .map_err(|e| AppError::RecordError(format!("Invalid JSON: {}", e)))?;
    record.normalize_dates();
    Ok(record)
}
