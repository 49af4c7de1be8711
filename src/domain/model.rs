use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One order record from the collector export.
///
/// Every field is plain text; a column or cell that is absent in the source
/// table is stored as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRow {
    pub claim_type: String,
    pub item_code: String,
    pub total_payment: String,
    pub quantity: String,
    pub orderer_name: String,
    pub contact_phone: String,
    pub postal_code: String,
    pub address: String,
}

/// A row that passed the claim filter, remapped onto reshipment fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformedRow {
    pub item_code: String,
    pub price: String,
    pub quantity: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    /// Raw value; normalized to five digits when the workbook is written.
    pub recipient_postal_code: String,
    pub recipient_address: String,
    pub bundle_key: String,
    /// `YYYYMMDD`
    pub order_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimCount {
    pub claim_type: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub total_rows: usize,
    pub claim_counts: Vec<ClaimCount>,
    pub transformed_rows: usize,
    pub distinct_addresses: usize,
    pub bundle_keys: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    Converted,
    /// No row carried an accepted claim type. Not a failure.
    NoMatchingRows,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub rows: Vec<TransformedRow>,
    pub stats: ConversionStats,
    pub batch_time: NaiveDateTime,
}

impl TransformResult {
    pub fn status(&self) -> ConversionStatus {
        if self.rows.is_empty() {
            ConversionStatus::NoMatchingRows
        } else {
            ConversionStatus::Converted
        }
    }
}

/// Everything the presentation layer needs after one conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub artifact: Vec<u8>,
    pub rows: Vec<TransformedRow>,
    pub stats: ConversionStats,
    pub status: ConversionStatus,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// `None` when nothing was written (dry run, or an empty result with
    /// `write_empty` off).
    pub output_path: Option<String>,
    pub report: ConversionReport,
}
