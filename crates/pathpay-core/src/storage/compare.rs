//! The compare list: at most three saved loans, ranked against each other.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PathPayError;
use crate::storage::records::LoanRecord;
use crate::storage::{load_list, save_list, KeyValueStore};
use crate::types::Money;
use crate::PathPayResult;

pub const COMPARE_KEY: &str = "compare_list";

/// Maximum number of loans held for comparison.
pub const COMPARE_CAPACITY: usize = 3;

#[derive(Debug)]
pub struct CompareStore<S> {
    store: S,
}

impl<S: KeyValueStore> CompareStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn list(&self) -> PathPayResult<Vec<LoanRecord>> {
        load_list(&self.store, COMPARE_KEY)
    }

    /// Append `record`. A full list rejects the insert and is left untouched.
    pub fn add(&mut self, record: LoanRecord) -> PathPayResult<usize> {
        let mut records = self.list()?;
        if records.len() >= COMPARE_CAPACITY {
            warn!(
                "compare: rejected '{}', list already holds {} loans",
                record.display_title(),
                records.len()
            );
            return Err(PathPayError::CompareListFull {
                capacity: COMPARE_CAPACITY,
            });
        }
        info!("compare: added '{}'", record.display_title());
        records.push(record);
        save_list(&mut self.store, COMPARE_KEY, &records)?;
        Ok(records.len())
    }

    pub fn remove(&mut self, index: usize) -> PathPayResult<LoanRecord> {
        let mut records = self.list()?;
        if index >= records.len() {
            return Err(PathPayError::IndexOutOfRange {
                index,
                len: records.len(),
            });
        }
        let removed = records.remove(index);
        save_list(&mut self.store, COMPARE_KEY, &records)?;
        info!("compare: removed '{}'", removed.display_title());
        Ok(removed)
    }

    pub fn clear(&mut self) -> PathPayResult<usize> {
        let count = self.list().map(|r| r.len()).unwrap_or(0);
        self.store.remove(COMPARE_KEY)?;
        info!("compare: cleared {count} loans");
        Ok(count)
    }

    /// Stored loans with their rank tags, in stored order.
    pub fn ranked(&self, by: RankBy) -> PathPayResult<Vec<RankedRecord>> {
        Ok(rank_records(self.list()?, by))
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Figure the compare list is ranked on; lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    #[default]
    TotalPayment,
    TotalInterest,
}

impl RankBy {
    fn key(&self, record: &LoanRecord) -> Money {
        match self {
            RankBy::TotalPayment => record.total_payment,
            RankBy::TotalInterest => record.total_interest,
        }
    }
}

impl FromStr for RankBy {
    type Err = PathPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "total_payment" | "payment" => Ok(RankBy::TotalPayment),
            "total_interest" | "interest" => Ok(RankBy::TotalInterest),
            _ => Err(PathPayError::invalid(
                "rank_by",
                format!("Unknown ranking '{s}' (expected total-payment or total-interest)"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareTag {
    BestValue,
    Moderate,
    LeastCostEffective,
}

impl CompareTag {
    fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            0 => Some(CompareTag::BestValue),
            1 => Some(CompareTag::Moderate),
            2 => Some(CompareTag::LeastCostEffective),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompareTag::BestValue => "Best value among compared loans",
            CompareTag::Moderate => "Moderate option",
            CompareTag::LeastCostEffective => "Least cost-effective option",
        }
    }
}

impl fmt::Display for CompareTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    #[serde(flatten)]
    pub record: LoanRecord,
    /// 0 is cheapest. Equal figures share the rank of the first of them.
    pub rank: usize,
    pub tag: Option<CompareTag>,
}

/// Tag each record by how it ranks on `by`, keeping the input order.
pub fn rank_records(records: Vec<LoanRecord>, by: RankBy) -> Vec<RankedRecord> {
    let mut sorted: Vec<Money> = records.iter().map(|r| by.key(r)).collect();
    sorted.sort();

    records
        .into_iter()
        .map(|record| {
            let key = by.key(&record);
            let rank = sorted.iter().position(|k| *k == key).unwrap_or(0);
            RankedRecord {
                tag: CompareTag::for_rank(rank),
                rank,
                record,
            }
        })
        .collect()
}
