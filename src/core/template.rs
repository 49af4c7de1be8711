use crate::domain::model::TransformedRow;
use crate::utils::error::Result;
use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use CellSource::{Blank, Constant, Field};

pub const COLUMN_COUNT: usize = 31;
pub const DEFAULT_SHEET_NAME: &str = "Sheet";
pub const DEFAULT_FILENAME_PREFIX: &str = "수기_재발송양식_변환결과";
const FILENAME_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Values repeated on every data row, regardless of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantField {
    Facility,
    OrderType,
    Warehouse,
    CustomerId,
    SalesChannel,
    BrokerageChannel,
    OrderTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    BundleKey,
    ItemCode,
    Price,
    Quantity,
    RecipientName,
    RecipientPhone,
    RecipientPostalCode,
    RecipientAddress,
    OrderDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSource {
    Blank,
    Constant(ConstantField),
    Field(RowField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateColumn {
    pub header: &'static str,
    pub source: CellSource,
}

impl TemplateColumn {
    /// The import format marks mandatory columns with a leading `*`.
    pub fn is_required(&self) -> bool {
        self.header.starts_with('*')
    }
}

const fn column(header: &'static str, source: CellSource) -> TemplateColumn {
    TemplateColumn { header, source }
}

/// The logistics import layout. Consumers read cells by position.
pub const TEMPLATE_COLUMNS: [TemplateColumn; COLUMN_COUNT] = [
    column("* F/C", Constant(ConstantField::Facility)),
    column("* 주문유형", Constant(ConstantField::OrderType)),
    column("* 배송처", Constant(ConstantField::Warehouse)),
    column("* 고객ID", Constant(ConstantField::CustomerId)),
    column("판매채널", Constant(ConstantField::SalesChannel)),
    column("* 묶음배송번호", Field(RowField::BundleKey)),
    column("* 품목코드", Field(RowField::ItemCode)),
    column("품목명", Blank),
    column("옵션", Blank),
    column("가격", Field(RowField::Price)),
    column("* 품목수량", Field(RowField::Quantity)),
    column("주문자", Blank),
    column("* 받는사람명", Field(RowField::RecipientName)),
    column("주문자 전화번호", Blank),
    column("* 받는사람 전화번호", Field(RowField::RecipientPhone)),
    column("* 받는사람 우편번호", Field(RowField::RecipientPostalCode)),
    column("* 받는사람 주소", Field(RowField::RecipientAddress)),
    column("배송메세지", Blank),
    column("* 주문일자", Field(RowField::OrderDate)),
    column("상품주문번호", Blank),
    column("주문번호(참조)", Blank),
    column("주문중개채널(상세)", Blank),
    column("박스구분", Blank),
    column("상세배송유형", Blank),
    column("새벽배송 SMS 전송", Blank),
    column("새벽배송 현관비밀번호", Blank),
    column("위험물 구분", Blank),
    column("* 주문중개채널", Constant(ConstantField::BrokerageChannel)),
    column("API 연동용 판매자ID", Blank),
    column("* 주문시간", Constant(ConstantField::OrderTime)),
    column("받는사람 핸드폰", Blank),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TemplateLayout {
    /// Every one of the 31 columns carries its label.
    #[default]
    Full,
    /// Same 31 positions; only required or populated columns are labelled,
    /// plus the last column so the sheet's used range spans all 31.
    Compact,
}

impl TemplateLayout {
    /// Header text for the column at `index` of [`TEMPLATE_COLUMNS`].
    pub fn header_for(&self, index: usize, column: &TemplateColumn) -> &'static str {
        match self {
            TemplateLayout::Full => column.header,
            TemplateLayout::Compact
                if column.is_required()
                    || column.source != Blank
                    || index == COLUMN_COUNT - 1 =>
            {
                column.header
            }
            TemplateLayout::Compact => "",
        }
    }

    pub fn headers(&self) -> [&'static str; COLUMN_COUNT] {
        let mut headers = [""; COLUMN_COUNT];
        for (index, column) in TEMPLATE_COLUMNS.iter().enumerate() {
            headers[index] = self.header_for(index, column);
        }
        headers
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConstants {
    pub facility: String,
    pub order_type: String,
    pub warehouse: String,
    pub customer_id: String,
    pub sales_channel: String,
    pub brokerage_channel: String,
    pub order_time: String,
}

impl Default for TemplateConstants {
    fn default() -> Self {
        Self {
            facility: "NS001".to_string(),
            order_type: "7".to_string(),
            warehouse: "17".to_string(),
            customer_id: "90015746".to_string(),
            sales_channel: "NFA".to_string(),
            brokerage_channel: "SELF".to_string(),
            order_time: "09:00:00".to_string(),
        }
    }
}

impl TemplateConstants {
    pub fn value(&self, field: ConstantField) -> &str {
        match field {
            ConstantField::Facility => &self.facility,
            ConstantField::OrderType => &self.order_type,
            ConstantField::Warehouse => &self.warehouse,
            ConstantField::CustomerId => &self.customer_id,
            ConstantField::SalesChannel => &self.sales_channel,
            ConstantField::BrokerageChannel => &self.brokerage_channel,
            ConstantField::OrderTime => &self.order_time,
        }
    }
}

/// Pads four-digit codes that lost their leading zero and fills blanks.
///
/// Surrounding whitespace is trimmed; any other length passes through.
pub fn normalize_postal_code(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.chars().count() {
        0 => "00000".to_string(),
        4 => format!("0{}", trimmed),
        _ => trimmed.to_string(),
    }
}

fn field_value(row: &TransformedRow, field: RowField) -> String {
    match field {
        RowField::BundleKey => row.bundle_key.clone(),
        RowField::ItemCode => row.item_code.clone(),
        RowField::Price => row.price.clone(),
        RowField::Quantity => row.quantity.clone(),
        RowField::RecipientName => row.recipient_name.clone(),
        RowField::RecipientPhone => row.recipient_phone.clone(),
        RowField::RecipientPostalCode => normalize_postal_code(&row.recipient_postal_code),
        RowField::RecipientAddress => row.recipient_address.clone(),
        RowField::OrderDate => row.order_date.clone(),
    }
}

/// Suggested download name, stamped with the artifact generation time.
pub fn output_file_name(prefix: &str, generated_at: NaiveDateTime) -> String {
    format!("{}_{}.xlsx", prefix, generated_at.format(FILENAME_STAMP_FORMAT))
}

#[derive(Debug, Clone)]
pub struct TemplateWriter {
    layout: TemplateLayout,
    constants: TemplateConstants,
    sheet_name: String,
}

impl Default for TemplateWriter {
    fn default() -> Self {
        Self::new(TemplateLayout::Full, TemplateConstants::default())
    }
}

impl TemplateWriter {
    pub fn new(layout: TemplateLayout, constants: TemplateConstants) -> Self {
        Self {
            layout,
            constants,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }

    pub fn with_sheet_name(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = sheet_name.into();
        self
    }

    /// All 31 cell values of one data row.
    pub fn row_values(&self, row: &TransformedRow) -> Vec<String> {
        TEMPLATE_COLUMNS
            .iter()
            .map(|column| match column.source {
                Blank => String::new(),
                Constant(field) => self.constants.value(field).to_string(),
                Field(field) => field_value(row, field),
            })
            .collect()
    }

    /// Serializes `rows` into a single-sheet workbook held in memory.
    ///
    /// The header row is written even when `rows` is empty. `created_at`
    /// becomes the document creation time, so identical input and instant
    /// give identical bytes.
    pub fn write(
        &self,
        rows: &[TransformedRow],
        created_at: NaiveDateTime,
    ) -> Result<Cursor<Vec<u8>>> {
        let mut workbook = Workbook::new();

        let created = ExcelDateTime::from_ymd(
            created_at.year() as u16,
            created_at.month() as u8,
            created_at.day() as u8,
        )?
        .and_hms(
            created_at.hour() as u16,
            created_at.minute() as u8,
            created_at.second() as u8,
        )?;
        workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name)?;

        for (col, header) in self.layout.headers().iter().enumerate() {
            sheet.write_string(0, col as u16, *header)?;
        }

        for (index, row) in rows.iter().enumerate() {
            let excel_row = index as u32 + 1;
            for (col, value) in self.row_values(row).iter().enumerate() {
                sheet.write_string(excel_row, col as u16, value)?;
            }
        }

        let buffer = workbook.save_to_buffer()?;
        tracing::debug!(
            "Wrote {:?} template with {} data rows ({} bytes)",
            self.layout,
            rows.len(),
            buffer.len()
        );

        Ok(Cursor::new(buffer))
    }
}
