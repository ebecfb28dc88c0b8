//! Read access to a user's transactions.

use async_trait::async_trait;
use postgrest::Postgrest;
use thiserror::Error;

use super::model::Transaction;
use crate::storage::SupabaseConfig;

const TRANSACTIONS_TABLE: &str = "transactions";
// Amounts are cast to text so they reach `Decimal` without a float detour.
const TRANSACTION_COLUMNS: &str = "id,date,amount::text,merchant,category";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transaction store unreachable: {0}")]
    Transport(String),
    #[error("transaction source not found: {0}")]
    NotFound(String),
    #[error("failed to decode transactions: {0}")]
    Decode(String),
}

/// Source of transactions for a user.
///
/// An empty ledger is `Ok(vec![])`, never an error.
#[async_trait]
pub trait TransactionStore {
    async fn fetch_for_user(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError>;
}

pub struct PostgrestTransactionStore {
    client: Postgrest,
    service_role_key: String,
}

impl PostgrestTransactionStore {
    pub fn new(config: &SupabaseConfig) -> Self {
        let client = Postgrest::new(format!(
            "{}/rest/v1",
            config.supabase_url.trim_end_matches('/')
        ))
        .insert_header("apikey", config.service_role_key.clone());

        Self {
            client,
            service_role_key: config.service_role_key.clone(),
        }
    }
}

#[async_trait]
impl TransactionStore for PostgrestTransactionStore {
    async fn fetch_for_user(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError> {
        let response = self
            .client
            .from(TRANSACTIONS_TABLE)
            .auth(&self.service_role_key)
            .select(TRANSACTION_COLUMNS)
            .eq("user_id", user_id)
            .execute()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        classify_response(status, &body)
    }
}

fn classify_response(status: u16, body: &str) -> Result<Vec<Transaction>, StoreError> {
    match status {
        200..=299 => serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string())),
        404 => Err(StoreError::NotFound(body.to_string())),
        other => Err(StoreError::Transport(format!("status {}: {}", other, body))),
    }
}
