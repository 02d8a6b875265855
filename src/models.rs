use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};

/// One spreadsheet row, as loaded: every field is an optional raw string.
///
/// Populated by an explicit column-name-to-field mapping at load time
/// (`spreadsheet::load_records`); a column missing from the file simply
/// leaves its field `None`.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    /// 1-based spreadsheet row number (header is row 1), used in reports.
    pub row: usize,
    pub tax_id: Option<String>,
    pub legal_name: Option<String>,
    pub trade_name: Option<String>,
    pub birth_date: Option<String>,
    pub registration_date: Option<String>,
    pub plan_name: Option<String>,
    pub plan_value: Option<String>,
    pub due_day: Option<String>,
    pub exempt: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: Option<String>,
    pub mobiles: Option<String>,
    pub phones: Option<String>,
    pub emails: Option<String>,
}

/// A normalized record, ready for reconciliation.
#[derive(Debug, Clone)]
pub struct CleanRecord {
    /// Digits-only CPF/CNPJ; the client's natural key.
    pub tax_id: String,
    pub legal_name: String,
    pub trade_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// Defaults to the processing timestamp when the source value is
    /// missing or unparseable.
    pub registration_date: NaiveDateTime,
    pub plan_name: Option<String>,
    /// Absent is defaulted to zero at persistence time, not here.
    pub plan_value: Option<BigDecimal>,
    pub due_day: Option<i32>,
    pub exempt: bool,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    /// Two-letter state code; unmapped source names stay absent.
    pub state_code: Option<String>,
    pub status: Option<String>,
    pub mobiles: Vec<String>,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
}

/// The enumerated contact types, stored with a stable code column in
/// `tbl_tipos_contato` so cache matching never depends on display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    Mobile,
    Phone,
    Email,
}

impl ContactKind {
    pub const ALL: [ContactKind; 3] = [ContactKind::Mobile, ContactKind::Phone, ContactKind::Email];

    /// Stable code persisted in the backing store.
    pub fn code(self) -> &'static str {
        match self {
            ContactKind::Mobile => "mobile",
            ContactKind::Phone => "phone",
            ContactKind::Email => "email",
        }
    }

    /// Human-readable label, used only when seeding a missing row.
    pub fn label(self) -> &'static str {
        match self {
            ContactKind::Mobile => "Celular",
            ContactKind::Phone => "Telefone",
            ContactKind::Email => "Email",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "mobile" => Some(ContactKind::Mobile),
            "phone" => Some(ContactKind::Phone),
            "email" => Some(ContactKind::Email),
            _ => None,
        }
    }
}

/// One record that could not be imported.
#[derive(Debug, Clone)]
pub struct RowFailure {
    pub row: usize,
    pub reason: String,
    /// Original raw payload, kept for diagnostics.
    pub raw: RawRecord,
}

/// Accumulated outcome of a run; every attempted record is counted exactly
/// once, as imported or as a failure.
#[derive(Debug, Default)]
pub struct RunReport {
    pub imported: usize,
    pub failures: Vec<RowFailure>,
    /// Set when a connectivity failure stopped the loop early.
    pub halted: Option<String>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.imported + self.failures.len()
    }
}
