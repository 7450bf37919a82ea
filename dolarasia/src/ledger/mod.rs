//! Append-only exchange records. There is no update or delete: a record is
//! created pending and stays that way, and every append rewrites the whole
//! collection under a single key.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::convert::{convert, Direction, LOCAL_CURRENCY};
use crate::id::opaque_id;
use crate::store::{StorageBackend, Store, StoreError};

pub const TRANSACTIONS_KEY: &str = "transactions";

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Rejected,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub direction: Direction,
    pub source_currency: String,
    pub target_currency: String,
    pub source_amount: f64,
    pub rate_applied: f64,
    pub converted_amount: f64,
    pub status: TransactionStatus,
    pub payment_method: String,
    pub created_at: i64,
}

impl Transaction {
    /// The converted amount is always derived from the other fields here, so
    /// a stored record can never disagree with the calculator.
    pub fn create(
        user_id: impl Into<String>,
        direction: Direction,
        currency: &str,
        amount: f64,
        rate: f64,
        payment_method: impl Into<String>,
    ) -> Self {
        let (source_currency, target_currency) = match direction {
            Direction::Buy => (LOCAL_CURRENCY.to_string(), currency.to_string()),
            Direction::Sell => (currency.to_string(), LOCAL_CURRENCY.to_string()),
        };

        Self {
            id: opaque_id(),
            user_id: user_id.into(),
            direction,
            source_currency,
            target_currency,
            source_amount: amount,
            rate_applied: rate,
            converted_amount: convert(amount, rate, direction),
            status: TransactionStatus::Pending,
            payment_method: payment_method.into(),
            created_at: OffsetDateTime::now_utc().unix_timestamp(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LedgerStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub rejected: usize,
}

pub struct Ledger;

impl Ledger {
    pub fn record<B: StorageBackend>(
        store: &mut Store<B>,
        transaction: Transaction,
    ) -> Result<(), StoreError> {
        info!(
            "LEDGER: Recording {} {} -> {} {} for user {}",
            transaction.source_amount,
            transaction.source_currency,
            transaction.converted_amount,
            transaction.target_currency,
            transaction.user_id
        );

        let mut all = Self::load(store);
        all.push(transaction);
        store.set(TRANSACTIONS_KEY, &all)
    }

    pub fn list_by_user<B: StorageBackend>(store: &Store<B>, user_id: &str) -> Vec<Transaction> {
        let mut matched: Vec<Transaction> = Self::load(store)
            .into_iter()
            .filter(|t| t.user_id == user_id)
            .collect();
        newest_first(&mut matched);
        matched
    }

    pub fn list_all<B: StorageBackend>(store: &Store<B>) -> Vec<Transaction> {
        let mut all = Self::load(store);
        newest_first(&mut all);
        all
    }

    pub fn stats<B: StorageBackend>(store: &Store<B>) -> LedgerStats {
        let all = Self::load(store);
        let count =
            |status| all.iter().filter(|t| t.status == status).count();
        LedgerStats {
            total: all.len(),
            pending: count(TransactionStatus::Pending),
            completed: count(TransactionStatus::Completed),
            rejected: count(TransactionStatus::Rejected),
        }
    }

    fn load<B: StorageBackend>(store: &Store<B>) -> Vec<Transaction> {
        match store.get(TRANSACTIONS_KEY) {
            Ok(Some(all)) => all,
            Ok(None) => Vec::new(),
            Err(_) => {
                warn!("LEDGER: Discarding corrupt transaction collection");
                Vec::new()
            }
        }
    }
}

fn newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
