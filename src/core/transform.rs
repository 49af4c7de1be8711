use crate::core::bundle::{BundleKeyAssigner, BundleKeyMap, BundleScope};
use crate::domain::model::{ClaimCount, ConversionStats, InputRow, TransformResult, TransformedRow};
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Claim type of an exchange request.
pub const CLAIM_EXCHANGE: &str = "교환";
/// Claim type of an order without any claim.
pub const CLAIM_NONE: &str = "해당없음";

const ORDER_DATE_FORMAT: &str = "%Y%m%d";

/// Keeps rows whose claim type is exactly one of the accepted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimFilter {
    accepted: Vec<String>,
}

impl Default for ClaimFilter {
    fn default() -> Self {
        Self::new([CLAIM_EXCHANGE, CLAIM_NONE])
    }
}

impl ClaimFilter {
    pub fn new<I, S>(accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted: accepted.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, claim_type: &str) -> bool {
        self.accepted.iter().any(|accepted| accepted == claim_type)
    }

    pub fn apply<'a>(&self, rows: &'a [InputRow]) -> Vec<&'a InputRow> {
        rows.iter().filter(|row| self.accepts(&row.claim_type)).collect()
    }

    /// Matching rows per accepted claim type, in configured order.
    pub fn count(&self, rows: &[InputRow]) -> Vec<ClaimCount> {
        self.accepted
            .iter()
            .map(|claim_type| ClaimCount {
                claim_type: claim_type.clone(),
                rows: rows.iter().filter(|row| &row.claim_type == claim_type).count(),
            })
            .collect()
    }
}

/// Maps one accepted row onto the reshipment fields.
///
/// A row whose address has no key (empty address) gets an empty bundle key.
pub fn transform_row(row: &InputRow, keys: &BundleKeyMap, order_date: &str) -> TransformedRow {
    TransformedRow {
        item_code: row.item_code.clone(),
        price: row.total_payment.clone(),
        quantity: row.quantity.clone(),
        recipient_name: row.orderer_name.clone(),
        recipient_phone: row.contact_phone.clone(),
        recipient_postal_code: row.postal_code.clone(),
        recipient_address: row.address.clone(),
        bundle_key: keys.get(&row.address).unwrap_or_default().to_string(),
        order_date: order_date.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct RowTransformer {
    filter: ClaimFilter,
    assigner: BundleKeyAssigner,
    scope: BundleScope,
}

impl RowTransformer {
    pub fn new(filter: ClaimFilter, assigner: BundleKeyAssigner, scope: BundleScope) -> Self {
        Self {
            filter,
            assigner,
            scope,
        }
    }

    /// Filters `rows`, assigns bundle keys and remaps the survivors.
    ///
    /// `batch_time` drives both the bundle-key stamp and the order date, so a
    /// single call never mixes two instants.
    pub fn transform(&self, rows: &[InputRow], batch_time: NaiveDateTime) -> TransformResult {
        let accepted = self.filter.apply(rows);

        let keys = match self.scope {
            BundleScope::Filtered => self
                .assigner
                .assign(accepted.iter().map(|row| row.address.as_str()), batch_time),
            BundleScope::AllRows => self
                .assigner
                .assign(rows.iter().map(|row| row.address.as_str()), batch_time),
        };

        let order_date = batch_time.format(ORDER_DATE_FORMAT).to_string();
        let transformed: Vec<TransformedRow> = accepted
            .iter()
            .map(|row| transform_row(row, &keys, &order_date))
            .collect();

        let distinct_addresses = transformed
            .iter()
            .map(|row| row.recipient_address.as_str())
            .filter(|address| !address.is_empty())
            .collect::<HashSet<_>>()
            .len();

        let stats = ConversionStats {
            total_rows: rows.len(),
            claim_counts: self.filter.count(rows),
            transformed_rows: transformed.len(),
            distinct_addresses,
            bundle_keys: keys.len(),
        };

        tracing::debug!(
            "Claim filter kept {} of {} rows ({:?} scope, {} bundle keys)",
            stats.transformed_rows,
            stats.total_rows,
            self.scope,
            stats.bundle_keys
        );

        TransformResult {
            rows: transformed,
            stats,
            batch_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn batch_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn row(claim_type: &str, address: &str) -> InputRow {
        InputRow {
            claim_type: claim_type.to_string(),
            item_code: "ITEM-1".to_string(),
            total_payment: "15000".to_string(),
            quantity: "2".to_string(),
            orderer_name: "홍길동".to_string(),
            contact_phone: "010-1234-5678".to_string(),
            postal_code: "6236".to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn test_filter_keeps_only_accepted_claim_types() {
        let rows = vec![
            row("교환", "Seoul A"),
            row("반품", "Seoul B"),
            row("해당없음", "Seoul C"),
            row("교환완료", "Seoul D"),
            row("반품철회", "Seoul E"),
            row("", "Seoul F"),
            row("교환 ", "Seoul G"),
        ];

        let kept = ClaimFilter::default().apply(&rows);
        let addresses: Vec<&str> = kept.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["Seoul A", "Seoul C"]);
    }

    #[test]
    fn test_exchange_and_unclaimed_rows_share_bundle_by_address() {
        let rows = vec![
            row("교환", "Seoul A"),
            row("반품", "Seoul B"),
            row("해당없음", "Seoul A"),
        ];

        let result = RowTransformer::default().transform(&rows, batch_time());

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].bundle_key, "re20241102093001");
        assert_eq!(result.rows[0].bundle_key, result.rows[1].bundle_key);
        assert!(result
            .rows
            .iter()
            .all(|r| r.recipient_address == "Seoul A"));
    }

    #[test]
    fn test_field_mapping() {
        let rows = vec![row("교환", "Seoul A")];
        let result = RowTransformer::default().transform(&rows, batch_time());

        assert_eq!(
            result.rows[0],
            TransformedRow {
                item_code: "ITEM-1".to_string(),
                price: "15000".to_string(),
                quantity: "2".to_string(),
                recipient_name: "홍길동".to_string(),
                recipient_phone: "010-1234-5678".to_string(),
                recipient_postal_code: "6236".to_string(),
                recipient_address: "Seoul A".to_string(),
                bundle_key: "re20241102093001".to_string(),
                order_date: "20241102".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_address_gets_empty_bundle_key() {
        let rows = vec![row("교환", ""), row("교환", "Seoul A")];
        let result = RowTransformer::default().transform(&rows, batch_time());

        assert_eq!(result.rows[0].bundle_key, "");
        assert_eq!(result.rows[1].bundle_key, "re20241102093001");
        assert_eq!(result.stats.distinct_addresses, 1);
    }

    #[test]
    fn test_scope_changes_suffix_numbering() {
        let rows = vec![row("반품", "Seoul B"), row("교환", "Seoul A")];

        let filtered = RowTransformer::new(
            ClaimFilter::default(),
            BundleKeyAssigner::default(),
            BundleScope::Filtered,
        )
        .transform(&rows, batch_time());
        assert_eq!(filtered.rows[0].bundle_key, "re20241102093001");
        assert_eq!(filtered.stats.bundle_keys, 1);

        let all_rows = RowTransformer::new(
            ClaimFilter::default(),
            BundleKeyAssigner::default(),
            BundleScope::AllRows,
        )
        .transform(&rows, batch_time());
        assert_eq!(all_rows.rows[0].bundle_key, "re20241102093002");
        assert_eq!(all_rows.stats.bundle_keys, 2);
    }

    #[test]
    fn test_no_matching_rows_is_empty_result() {
        let rows = vec![row("반품", "Seoul B"), row("교환철회", "Seoul C")];
        let result = RowTransformer::default().transform(&rows, batch_time());

        assert!(result.rows.is_empty());
        assert_eq!(
            result.status(),
            crate::domain::model::ConversionStatus::NoMatchingRows
        );
        assert_eq!(result.stats.total_rows, 2);
    }

    #[test]
    fn test_stats_count_each_accepted_claim_type() {
        let rows = vec![
            row("교환", "Seoul A"),
            row("교환", "Seoul B"),
            row("해당없음", "Seoul A"),
            row("반품", "Seoul C"),
        ];
        let result = RowTransformer::default().transform(&rows, batch_time());

        assert_eq!(result.stats.total_rows, 4);
        assert_eq!(
            result.stats.claim_counts,
            vec![
                ClaimCount {
                    claim_type: "교환".to_string(),
                    rows: 2
                },
                ClaimCount {
                    claim_type: "해당없음".to_string(),
                    rows: 1
                },
            ]
        );
        assert_eq!(result.stats.transformed_rows, 3);
        assert_eq!(result.stats.distinct_addresses, 2);
    }
}
