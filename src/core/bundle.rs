use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_BUNDLE_PREFIX: &str = "re";

/// Batch timestamp layout embedded in every key.
const BATCH_STAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Which rows feed the address → key mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum BundleScope {
    /// Only rows that survived the claim filter.
    #[default]
    Filtered,
    /// Every input row, before filtering. Addresses that are later dropped
    /// still consume a sequence number.
    AllRows,
}

/// Address → bundle key, remembering first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleKeyMap {
    keys: HashMap<String, String>,
    order: Vec<String>,
}

impl BundleKeyMap {
    /// Exact-string lookup; no trimming or case folding.
    pub fn get(&self, address: &str) -> Option<&str> {
        self.keys.get(address).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(address, key)` pairs in the order the addresses were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(move |address| (address.as_str(), self.keys[address].as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct BundleKeyAssigner {
    prefix: String,
}

impl Default for BundleKeyAssigner {
    fn default() -> Self {
        Self::new(DEFAULT_BUNDLE_PREFIX)
    }
}

impl BundleKeyAssigner {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Gives every distinct non-empty address a key `<prefix><YYYYMMDDHHMM><NN>`.
    ///
    /// `batch_time` is read once for the whole batch, so all keys share the
    /// same timestamp. `NN` counts distinct addresses from 1 in first-seen
    /// order, zero-padded to two digits; it simply widens past 99.
    pub fn assign<'a, I>(&self, addresses: I, batch_time: NaiveDateTime) -> BundleKeyMap
    where
        I: IntoIterator<Item = &'a str>,
    {
        let stamp = batch_time.format(BATCH_STAMP_FORMAT).to_string();
        let mut map = BundleKeyMap::default();

        for address in addresses {
            if address.is_empty() || map.keys.contains_key(address) {
                continue;
            }
            let index = map.order.len() + 1;
            let key = format!("{}{}{:02}", self.prefix, stamp, index);
            map.keys.insert(address.to_string(), key);
            map.order.push(address.to_string());
        }

        if map.len() > 99 {
            tracing::warn!(
                "{} distinct addresses in one batch; bundle key suffixes exceed two digits",
                map.len()
            );
        }
        tracing::debug!("Assigned {} bundle keys (batch stamp {})", map.len(), stamp);

        map
    }
}
