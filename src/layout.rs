// Page layout engine: maps a ChecklistRecord onto letter pages.

use printpdf::*;

use crate::record::{CheckedField, ChecklistRecord, TherapyDiscipline};
use crate::AppError;

// ============================================================================
// Constants
// ============================================================================

/// US Letter dimensions in mm
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;

/// Left and right margin
const MARGIN_MM: f32 = 16.0;

/// Cursor position at the top of every page
const TOP_MM: f32 = 18.0;

/// No row may start below this; overflow opens a new page first
const USABLE_HEIGHT_MM: f32 = 270.0;

/// Standard row advance
const ROW_HEIGHT_MM: f32 = 7.0;

/// Footnote rows reserve 5mm and advance 4.5mm
const NOTE_RESERVE_MM: f32 = 5.0;
const NOTE_ADVANCE_MM: f32 = 4.5;

/// Checkbox glyph edge length
const CHECKBOX_MM: f32 = 3.5;

/// Label column for rows that carry a checkbox
const CHECKBOX_LABEL_OFFSET_MM: f32 = 5.5;

/// Horizontal spacing between tracking items
const TRACKING_STEP_MM: f32 = 38.0;

/// Font sizes in points
const TITLE_FONT_SIZE: f32 = 14.0;
const BODY_FONT_SIZE: f32 = 10.0;
const TRACKING_FONT_SIZE: f32 = 9.0;
const NOTE_FONT_SIZE: f32 = 8.0;

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Builtin Helvetica exposes no glyph metrics, so each character is
/// estimated as a fixed fraction of the em size.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

// ============================================================================
// Cursor
// ============================================================================

/// Top-down vertical cursor threaded through every row operation. `y` is
/// the distance in mm from the top edge of the current page.
#[derive(Debug, Clone)]
pub struct PageCursor {
    y: f32,
    page: usize,
}

impl PageCursor {
    pub fn new() -> Self {
        PageCursor { y: TOP_MM, page: 1 }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// True when a row of height `need` would cross the usable height.
    pub fn needs_break(&self, need: f32) -> bool {
        self.y + need > USABLE_HEIGHT_MM
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    pub fn next_page(&mut self) {
        self.y = TOP_MM;
        self.page += 1;
    }
}

// ============================================================================
// Rendered document
// ============================================================================

/// A finished checklist: the PDF byte blob plus its page count. Page state
/// is sealed once rendering returns.
pub struct RenderedChecklist {
    bytes: Vec<u8>,
    pages: usize,
}

impl RenderedChecklist {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    pub fn write_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}

// ============================================================================
// Composer
// ============================================================================

/// Owns the document, the current layer, and the cursor, and exposes the
/// row primitives the checklist is assembled from.
struct Composer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    font_italic: IndirectFontRef,
    cursor: PageCursor,
}

/// Estimate rendered text width in mm.
fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * PT_TO_MM * APPROX_CHAR_WIDTH_RATIO
}

impl Composer {
    fn new() -> Result<Self, AppError> {
        let (doc, page1, layer1) = PdfDocument::new(
            "ADR Chart Checklist",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let layer = doc.get_page(page1).get_layer(layer1);

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::PdfError(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::PdfError(e.to_string()))?;
        let font_italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        Ok(Composer {
            doc,
            layer,
            font,
            font_bold,
            font_italic,
            cursor: PageCursor::new(),
        })
    }

    /// Page-break check. Runs before a row is drawn, never after, so no
    /// row straddles a page boundary.
    fn ensure_room(&mut self, need: f32) {
        if self.cursor.needs_break(need) {
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.cursor.next_page();
        }
    }

    fn gap(&mut self, dy: f32) {
        self.cursor.advance(dy);
    }

    /// Text baseline at a top-down y position.
    fn text(&self, s: &str, size: f32, x: f32, y: f32, font: &IndirectFontRef) {
        self.layer
            .use_text(s, size, Mm(x), Mm(PAGE_HEIGHT_MM - y), font);
    }

    /// Line segment between top-down coordinates.
    fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let points = vec![
            (Point::new(Mm(x1), Mm(PAGE_HEIGHT_MM - y1)), false),
            (Point::new(Mm(x2), Mm(PAGE_HEIGHT_MM - y2)), false),
        ];
        self.layer.add_line(Line {
            points,
            is_closed: false,
        });
    }

    fn set_stroke(&self, width: f32) {
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer.set_outline_thickness(width);
    }

    /// 3.5mm checkbox with its top-left corner at (x, y). The checkmark is
    /// two connecting segments at a heavier stroke than the square.
    fn checkbox(&self, x: f32, y: f32, checked: bool) {
        let s = CHECKBOX_MM;
        self.set_stroke(0.4);
        self.line(x, y, x + s, y);
        self.line(x + s, y, x + s, y + s);
        self.line(x + s, y + s, x, y + s);
        self.line(x, y + s, x, y);
        if checked {
            self.set_stroke(0.6);
            self.line(x + 0.6, y + 1.8, x + 1.4, y + 2.8);
            self.line(x + 1.4, y + 2.8, x + 3.0, y + 0.7);
        }
    }

    fn title(&mut self, text: &str) {
        let x = (PAGE_WIDTH_MM - text_width_mm(text, TITLE_FONT_SIZE)) / 2.0;
        self.text(text, TITLE_FONT_SIZE, x, self.cursor.y(), &self.font_bold);
        self.cursor.advance(10.0);
    }

    /// Bold label and colon, value in normal weight at an offset computed
    /// from the label width.
    fn row_plain(&mut self, label: &str, value: &str) {
        self.ensure_room(ROW_HEIGHT_MM);
        let y = self.cursor.y();
        let label_text = format!("{}:", label);
        self.text(&label_text, BODY_FONT_SIZE, MARGIN_MM, y, &self.font_bold);
        let offset = text_width_mm(&format!("{}:  ", label), BODY_FONT_SIZE);
        self.text(value, BODY_FONT_SIZE, MARGIN_MM + offset, y, &self.font);
        self.cursor.advance(ROW_HEIGHT_MM);
    }

    /// Plain row preceded by a checkbox glyph.
    fn row_checked(&mut self, label: &str, field: &CheckedField) {
        self.ensure_room(ROW_HEIGHT_MM);
        let y = self.cursor.y();
        self.checkbox(MARGIN_MM, y - 2.5, field.checked);
        let label_x = MARGIN_MM + CHECKBOX_LABEL_OFFSET_MM;
        self.text(&format!("{}:", label), BODY_FONT_SIZE, label_x, y, &self.font_bold);
        let offset = text_width_mm(&format!("{}:  ", label), BODY_FONT_SIZE);
        self.text(&field.value, BODY_FONT_SIZE, label_x + offset, y, &self.font);
        self.cursor.advance(ROW_HEIGHT_MM);
    }

    /// Small gap, horizontal rule across the usable width, larger gap.
    fn divider(&mut self) {
        self.ensure_room(8.0);
        self.cursor.advance(2.0);
        self.set_stroke(0.3);
        let y = self.cursor.y();
        self.line(MARGIN_MM, y, PAGE_WIDTH_MM - MARGIN_MM, y);
        self.cursor.advance(5.0);
    }

    /// Italic footnote line, indented to the checkbox label column.
    fn note(&mut self, text: &str) {
        self.ensure_room(NOTE_RESERVE_MM);
        self.text(
            text,
            NOTE_FONT_SIZE,
            MARGIN_MM + CHECKBOX_LABEL_OFFSET_MM,
            self.cursor.y(),
            &self.font_italic,
        );
        self.cursor.advance(NOTE_ADVANCE_MM);
    }

    /// SN/OASIS composite row. One checkbox governs the row; SOC and ROC
    /// values sit at fixed offsets.
    fn sn_oasis_row(&mut self, soc: &CheckedField, roc: &CheckedField) {
        self.ensure_room(ROW_HEIGHT_MM);
        let y = self.cursor.y();
        self.checkbox(MARGIN_MM, y - 2.5, soc.checked);
        self.text(
            "SN/OASIS: SOC:",
            BODY_FONT_SIZE,
            MARGIN_MM + CHECKBOX_LABEL_OFFSET_MM,
            y,
            &self.font_bold,
        );
        self.text(&soc.value, BODY_FONT_SIZE, MARGIN_MM + 40.0, y, &self.font);
        self.text("ROC:", BODY_FONT_SIZE, MARGIN_MM + 80.0, y, &self.font_bold);
        self.text(&roc.value, BODY_FONT_SIZE, MARGIN_MM + 92.0, y, &self.font);
        self.cursor.advance(ROW_HEIGHT_MM);
    }

    /// One discipline line: checkbox, label, and five sub-fields at fixed
    /// offsets so empty values never shift later columns.
    fn therapy_row(&mut self, label: &str, therapy: &TherapyDiscipline) {
        self.ensure_room(ROW_HEIGHT_MM);
        let y = self.cursor.y();
        self.checkbox(MARGIN_MM, y - 2.5, therapy.checked);
        self.text(
            &format!("{}:", label),
            BODY_FONT_SIZE,
            MARGIN_MM + CHECKBOX_LABEL_OFFSET_MM,
            y,
            &self.font_bold,
        );
        let mut x = MARGIN_MM + 14.0;
        self.text(
            &format!("I/E: {}", therapy.initial_eval),
            BODY_FONT_SIZE,
            x,
            y,
            &self.font,
        );
        x += 25.0;
        if therapy.not_applicable {
            self.text("N/A", BODY_FONT_SIZE, x, y, &self.font);
        }
        x += 12.0;
        self.text(
            &format!("R/V Notes: {}", therapy.review_notes),
            BODY_FONT_SIZE,
            x,
            y,
            &self.font,
        );
        x += 55.0;
        self.text(
            &format!("DC: {}", therapy.discharge_date),
            BODY_FONT_SIZE,
            x,
            y,
            &self.font,
        );
        x += 25.0;
        self.text(
            &format!("Summary: {}", therapy.summary),
            BODY_FONT_SIZE,
            x,
            y,
            &self.font,
        );
        self.cursor.advance(ROW_HEIGHT_MM);
    }

    /// Four checkbox+label pairs side by side. The break check runs once
    /// for the whole group.
    fn tracking_row(&mut self, items: &[(&str, bool)]) {
        self.cursor.advance(4.0);
        self.ensure_room(ROW_HEIGHT_MM);
        let y = self.cursor.y();
        let mut x = MARGIN_MM;
        for (label, checked) in items {
            self.checkbox(x, y - 2.5, *checked);
            self.text(label, TRACKING_FONT_SIZE, x + 5.0, y, &self.font_bold);
            x += TRACKING_STEP_MM;
        }
        self.cursor.advance(ROW_HEIGHT_MM);
    }

    fn finish(self) -> Result<RenderedChecklist, AppError> {
        let pages = self.cursor.page();
        let bytes = self
            .doc
            .save_to_bytes()
            .map_err(|e| AppError::PdfError(e.to_string()))?;
        Ok(RenderedChecklist { bytes, pages })
    }
}

// ============================================================================
// Checklist assembly
// ============================================================================

/// Render a checklist record into a paginated letter document. The row
/// order is fixed, not configurable.
pub fn render_checklist(record: &ChecklistRecord) -> Result<RenderedChecklist, AppError> {
    let mut c = Composer::new()?;

    c.title("ADR CHART CHECKLIST");

    // Patient identity block
    c.row_plain("Patient Name", &record.patient_name);
    let soc = if record.active_or_discharged.is_empty() {
        record.soc_date.clone()
    } else {
        format!("{}    |    {}", record.soc_date, record.active_or_discharged)
    };
    c.row_plain("SOC Date", &soc);
    c.row_plain("ADR Claim Dates", &record.claim_dates.join(", "));
    let cert = if record.cert_period_start.is_empty() && record.cert_period_end.is_empty() {
        String::new()
    } else {
        format!("{} - {}", record.cert_period_start, record.cert_period_end)
    };
    c.row_plain("Cert Period", &cert);

    c.divider();

    // Orders & referrals
    c.row_checked("F2F Referral Documents", &record.f2f_referral);
    c.row_checked("485/Supplemental Orders", &record.orders_485);
    c.note("* If orders are signed manually > Physician Signature Attestation needed");
    c.note("* If orders are not dated: HCHB \"Process Order\" print screen needed");
    c.note("* If orders are signed via HCHB Portal > HCHB \"Process Order\" print screen needed");
    c.gap(1.0);

    c.divider();

    // SN / OASIS
    c.sn_oasis_row(&record.sn_oasis_soc, &record.sn_oasis_roc);
    c.row_plain("Revisits", &record.revisits);
    c.row_checked("Recerts", &record.recerts);
    c.row_plain("TFR #6", &record.tfr6);
    c.row_plain("DC OASIS", &record.dc_oasis);

    c.divider();

    // Therapy
    c.therapy_row("PT", &record.pt);
    c.therapy_row("OT", &record.ot);
    c.therapy_row("ST", &record.st);
    c.row_plain("HHA POC and Duty Sheets", &record.hha_poc);

    c.divider();

    // Additional documents
    c.row_checked("ADR Letter", &record.adr_letter);
    c.row_checked("UB", &record.ub);
    c.row_checked("OASIS Transmittals", &record.oasis_transmittals);
    c.row_plain("Electronic Signature P&P", &record.electronic_sig);
    c.row_plain("DocuSigned/Bold Sign Certificates", &record.docusign_certs);
    c.row_plain("ABN", &record.abn);
    c.row_checked("Physician Signature Log", &record.physician_sig_log);
    c.row_checked("Cover Letter", &record.cover_letter);
    c.row_checked("Coordination Notes/Missed Visit Notes", &record.coord_notes);

    // Tracking
    c.tracking_row(&[
        ("Spreadsheet", record.tracking.spreadsheet),
        ("Checklist", record.tracking.checklist),
        ("Folder", record.tracking.folder),
        ("Email", record.tracking.email),
    ]);

    c.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_starts_at_top_of_first_page() {
        let cursor = PageCursor::new();
        assert_eq!(cursor.y(), TOP_MM);
        assert_eq!(cursor.page(), 1);
    }

    #[test]
    fn break_triggers_before_a_row_would_overflow() {
        let mut cursor = PageCursor::new();
        while !cursor.needs_break(ROW_HEIGHT_MM) {
            cursor.advance(ROW_HEIGHT_MM);
        }
        // The next row would end past the boundary; drawing must not start.
        assert!(cursor.y() + ROW_HEIGHT_MM > USABLE_HEIGHT_MM);
        cursor.next_page();
        assert_eq!(cursor.y(), TOP_MM);
        assert_eq!(cursor.page(), 2);
    }

    #[test]
    fn rows_never_start_outside_usable_bounds() {
        let mut cursor = PageCursor::new();
        for _ in 0..500 {
            if cursor.needs_break(ROW_HEIGHT_MM) {
                cursor.next_page();
            }
            assert!(cursor.y() >= TOP_MM);
            assert!(cursor.y() <= USABLE_HEIGHT_MM);
            cursor.advance(ROW_HEIGHT_MM);
        }
        assert!(cursor.page() > 1);
    }

    #[test]
    fn empty_record_renders_a_single_page() {
        let doc = render_checklist(&ChecklistRecord::default()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.bytes().len() > 1000);
    }

    #[test]
    fn many_claim_dates_render_as_one_joined_row() {
        let mut record = ChecklistRecord::default();
        record.claim_dates = (1..=12).map(|d| format!("01/{:02}/25", d)).collect();
        let doc = render_checklist(&record).unwrap();
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn not_applicable_with_empty_eval_renders() {
        let mut record = ChecklistRecord::default();
        record.pt.checked = true;
        record.pt.not_applicable = true;
        record.pt.summary = "see attached".into();
        let doc = render_checklist(&record).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(!doc.bytes().is_empty());
    }

    #[test]
    fn fully_populated_record_renders() {
        let mut record = ChecklistRecord::default();
        record.patient_name = "Smith, Jane".into();
        record.soc_date = "01/03/25".into();
        record.active_or_discharged = "Active".into();
        record.f2f_referral.checked = true;
        record.f2f_referral.value = "on file".into();
        record.tracking.spreadsheet = true;
        record.tracking.email = true;
        let doc = render_checklist(&record).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.bytes().len() > 1000);
    }

    #[test]
    fn width_estimate_grows_with_text() {
        let short = text_width_mm("ABN:  ", BODY_FONT_SIZE);
        let long = text_width_mm("Coordination Notes/Missed Visit Notes:  ", BODY_FONT_SIZE);
        assert!(long > short);
        assert!(short > 0.0);
    }
}
