use crate::domain::model::InputRow;
use crate::utils::error::{EtlError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// Header text of each field in the collector export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputColumns {
    pub claim_type: String,
    pub item_code: String,
    pub total_payment: String,
    pub quantity: String,
    pub orderer_name: String,
    pub contact_phone: String,
    pub postal_code: String,
    pub address: String,
}

impl Default for InputColumns {
    fn default() -> Self {
        Self {
            claim_type: "클레임유형".to_string(),
            item_code: "품목코드".to_string(),
            total_payment: "총결제금액".to_string(),
            quantity: "주문수량".to_string(),
            orderer_name: "주문자명".to_string(),
            contact_phone: "연락처".to_string(),
            postal_code: "우편번호".to_string(),
            address: "주소".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Workbook,
    Delimited(u8),
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputFormat::Workbook),
            "csv" => Ok(InputFormat::Delimited(b',')),
            "tsv" => Ok(InputFormat::Delimited(b'\t')),
            _ => Err(EtlError::UnsupportedFormatError { extension }),
        }
    }
}

/// Column position of each field, `None` when the header is missing.
#[derive(Debug, Clone, Default)]
struct FieldIndex {
    claim_type: Option<usize>,
    item_code: Option<usize>,
    total_payment: Option<usize>,
    quantity: Option<usize>,
    orderer_name: Option<usize>,
    contact_phone: Option<usize>,
    postal_code: Option<usize>,
    address: Option<usize>,
}

impl FieldIndex {
    fn resolve(headers: &[String], columns: &InputColumns) -> Self {
        let find = |name: &str| {
            let position = headers.iter().position(|header| header == name);
            if position.is_none() {
                tracing::warn!("Column '{}' not found; treating it as empty", name);
            }
            position
        };

        Self {
            claim_type: find(&columns.claim_type),
            item_code: find(&columns.item_code),
            total_payment: find(&columns.total_payment),
            quantity: find(&columns.quantity),
            orderer_name: find(&columns.orderer_name),
            contact_phone: find(&columns.contact_phone),
            postal_code: find(&columns.postal_code),
            address: find(&columns.address),
        }
    }

    fn build(&self, cells: &[String]) -> InputRow {
        let take = |index: Option<usize>| {
            index
                .and_then(|i| cells.get(i))
                .cloned()
                .unwrap_or_default()
        };

        InputRow {
            claim_type: take(self.claim_type),
            item_code: take(self.item_code),
            total_payment: take(self.total_payment),
            quantity: take(self.quantity),
            orderer_name: take(self.orderer_name),
            contact_phone: take(self.contact_phone),
            postal_code: take(self.postal_code),
            address: take(self.address),
        }
    }
}

/// Headers match after dropping a leading BOM and surrounding whitespace.
fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

/// Renders a spreadsheet cell as text.
///
/// Integral floats drop the fraction so `12000.0` reads as `12000`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputReader {
    columns: InputColumns,
    sheet: Option<String>,
}

impl InputReader {
    pub fn new(columns: InputColumns, sheet: Option<String>) -> Self {
        Self { columns, sheet }
    }

    pub fn read(&self, path: &Path, data: Vec<u8>) -> Result<Vec<InputRow>> {
        match InputFormat::from_path(path)? {
            InputFormat::Workbook => self.read_workbook(data),
            InputFormat::Delimited(delimiter) => self.read_delimited(&data, delimiter),
        }
    }

    pub fn read_workbook(&self, data: Vec<u8>) -> Result<Vec<InputRow>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))?;

        let range = match &self.sheet {
            Some(name) => workbook.worksheet_range(name)?,
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| EtlError::input("workbook contains no worksheets"))??,
        };

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .ok_or_else(|| EtlError::input("worksheet is empty; expected a header row"))?
            .iter()
            .map(|cell| clean_header(&cell_text(cell)))
            .collect();
        let index = FieldIndex::resolve(&headers, &self.columns);

        let records: Vec<InputRow> = rows
            .map(|cells| {
                let texts: Vec<String> = cells.iter().map(cell_text).collect();
                index.build(&texts)
            })
            .collect();

        tracing::debug!("Read {} rows from workbook", records.len());
        Ok(records)
    }

    pub fn read_delimited(&self, data: &[u8], delimiter: u8) -> Result<Vec<InputRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(data);

        let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();
        if headers.iter().all(String::is_empty) {
            return Err(EtlError::input("file has no header row"));
        }
        let index = FieldIndex::resolve(&headers, &self.columns);

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record?;
            let texts: Vec<String> = record.iter().map(str::to_string).collect();
            records.push(index.build(&texts));
        }

        tracing::debug!("Read {} rows from delimited file", records.len());
        Ok(records)
    }
}
