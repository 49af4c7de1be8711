use crate::domain::model::TransformedRow;
use crate::utils::error::Result;
use std::io::Write;

const PREVIEW_HEADERS: [&str; 9] = [
    "품목코드",
    "가격",
    "품목수량",
    "받는사람명",
    "받는사람 전화번호",
    "받는사람 우편번호",
    "받는사람 주소",
    "묶음배송번호",
    "주문일자",
];

/// Writes up to `limit` transformed rows as TSV, header first.
pub fn write_preview<W: Write>(rows: &[TransformedRow], limit: usize, writer: W) -> Result<()> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    tsv.write_record(PREVIEW_HEADERS)?;
    for row in rows.iter().take(limit) {
        tsv.write_record([
            &row.item_code,
            &row.price,
            &row.quantity,
            &row.recipient_name,
            &row.recipient_phone,
            &row.recipient_postal_code,
            &row.recipient_address,
            &row.bundle_key,
            &row.order_date,
        ])?;
    }
    tsv.flush()?;
    Ok(())
}
