#![allow(dead_code)]

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use reship_etl::core::reader::cell_text;
use rust_xlsxwriter::Workbook;
use std::io::Cursor;

pub const EXPORT_HEADERS: [&str; 9] = [
    "주문번호",
    "클레임유형",
    "품목코드",
    "총결제금액",
    "주문수량",
    "주문자명",
    "연락처",
    "우편번호",
    "주소",
];

pub struct ExportRow<'a> {
    pub claim_type: &'a str,
    pub item_code: &'a str,
    pub payment: f64,
    pub quantity: f64,
    pub name: &'a str,
    pub phone: &'a str,
    pub postal_code: Option<f64>,
    pub address: Option<&'a str>,
}

pub fn frozen_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 8, 30)
        .unwrap()
        .and_hms_opt(13, 42, 7)
        .unwrap()
}

/// Builds an .xlsx collector export with numeric cells where the collector
/// writes numbers.
pub fn export_workbook(rows: &[ExportRow]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, format!("ORD-{}", i + 1)).unwrap();
        sheet.write_string(r, 1, row.claim_type).unwrap();
        sheet.write_string(r, 2, row.item_code).unwrap();
        sheet.write_number(r, 3, row.payment).unwrap();
        sheet.write_number(r, 4, row.quantity).unwrap();
        sheet.write_string(r, 5, row.name).unwrap();
        sheet.write_string(r, 6, row.phone).unwrap();
        if let Some(postal_code) = row.postal_code {
            sheet.write_number(r, 7, postal_code).unwrap();
        }
        if let Some(address) = row.address {
            sheet.write_string(r, 8, address).unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

pub fn open_output(bytes: &[u8]) -> (Vec<String>, Range<Data>) {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).unwrap();
    let names = workbook.sheet_names().to_vec();
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();
    (names, range)
}

/// Text of a cell by absolute position; cells outside the used range read as "".
pub fn cell(range: &Range<Data>, row: u32, col: u32) -> String {
    range
        .get_value((row, col))
        .map(cell_text)
        .unwrap_or_default()
}

pub fn row_values(range: &Range<Data>, row: u32) -> Vec<String> {
    (0..31).map(|col| cell(range, row, col)).collect()
}
