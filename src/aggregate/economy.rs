//! Flat per-player economy accumulators

use crate::decode::EconomyRecord;
use std::collections::BTreeMap;

/// Money and waystone counts accumulated across players, keyed by display
/// name. A duplicate display name overwrites the earlier entry
/// (last-write-wins); with unique ids in the identity cache this does not
/// happen in practice.
#[derive(Debug, Clone, Default)]
pub struct EconomyLedger {
    money: BTreeMap<String, i64>,
    waystones: BTreeMap<String, usize>,
}

impl EconomyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, record: &EconomyRecord) {
        self.money.insert(name.to_string(), record.money);
        self.waystones.insert(name.to_string(), record.waystone_count);
    }

    pub fn money(&self) -> &BTreeMap<String, i64> {
        &self.money
    }

    pub fn waystones(&self) -> &BTreeMap<String, usize> {
        &self.waystones
    }

    pub fn len(&self) -> usize {
        self.money.len()
    }

    pub fn is_empty(&self) -> bool {
        self.money.is_empty()
    }
}
