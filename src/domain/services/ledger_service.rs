use std::sync::Arc;

use tracing::info;

use crate::domain::models::ledger::{EntryDirection, EntryStatus, LedgerEntry};
use crate::domain::ports::LedgerRepository;
use crate::error::AppError;

/// Append-only money-movement record. Entries are corrected by compensation,
/// never edited.
pub struct LedgerService {
    ledger: Arc<dyn LedgerRepository>,
}

impl LedgerService {
    pub fn new(ledger: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger }
    }

    pub async fn record(
        &self,
        subject_id: &str,
        counterparty_id: &str,
        amount: i64,
        direction: EntryDirection,
    ) -> Result<LedgerEntry, AppError> {
        if amount <= 0 {
            return Err(AppError::Validation(
                "ledger amounts must be positive".to_string(),
            ));
        }
        let entry = LedgerEntry::new(
            subject_id.to_string(),
            counterparty_id.to_string(),
            amount,
            direction,
        );
        self.ledger.insert(&entry).await?;
        info!("Ledger entry {} recorded", entry.id);
        Ok(entry)
    }

    /// PENDING -> SETTLED. Settling an already settled entry is a no-op;
    /// FAILED and REVERSED entries cannot settle.
    pub async fn settle(
        &self,
        entry_id: &str,
        external_reference: &str,
    ) -> Result<LedgerEntry, AppError> {
        let mut entry = self.load(entry_id).await?;

        match entry.status {
            EntryStatus::Settled => Ok(entry),
            EntryStatus::Failed | EntryStatus::Reversed => Err(AppError::InvalidTransition(
                format!("cannot settle a {} entry", entry.status.as_str()),
            )),
            EntryStatus::Pending => {
                let flipped = self.ledger.settle(entry_id, Some(external_reference)).await?;
                if flipped {
                    entry.status = EntryStatus::Settled;
                    entry.external_reference = Some(external_reference.to_string());
                    info!("Ledger entry {} settled", entry.id);
                    return Ok(entry);
                }
                // Lost the race; report what won it.
                let current = self.load(entry_id).await?;
                if current.status == EntryStatus::Settled {
                    Ok(current)
                } else {
                    Err(AppError::InvalidTransition(format!(
                        "cannot settle a {} entry",
                        current.status.as_str()
                    )))
                }
            }
        }
    }

    /// PENDING -> FAILED, for charges that expire or bounce asynchronously.
    pub async fn fail(&self, entry_id: &str) -> Result<LedgerEntry, AppError> {
        let mut entry = self.load(entry_id).await?;

        if entry.status != EntryStatus::Pending {
            return Err(AppError::InvalidTransition(format!(
                "cannot fail a {} entry",
                entry.status.as_str()
            )));
        }
        let flipped = self.ledger.fail(entry_id).await?;
        if !flipped {
            return Err(AppError::InvalidTransition(
                "entry is no longer pending".to_string(),
            ));
        }
        entry.status = EntryStatus::Failed;
        info!("Ledger entry {} failed", entry.id);
        Ok(entry)
    }

    /// Inserts the compensating entry and flags the original REVERSED, in one
    /// transaction. Returns the compensation.
    pub async fn reverse(&self, entry_id: &str) -> Result<LedgerEntry, AppError> {
        let entry = self.load(entry_id).await?;

        if entry.status == EntryStatus::Reversed {
            return Err(AppError::InvalidTransition(
                "entry is already reversed".to_string(),
            ));
        }

        let compensation = entry.compensating();
        self.ledger.reverse(entry_id, &compensation).await?;
        info!(
            "Ledger entry {} reversed by entry {}",
            entry.id, compensation.id
        );
        Ok(compensation)
    }

    pub async fn list_by_subject(&self, subject_id: &str) -> Result<Vec<LedgerEntry>, AppError> {
        self.ledger.list_by_subject(subject_id).await
    }

    async fn load(&self, entry_id: &str) -> Result<LedgerEntry, AppError> {
        self.ledger
            .find_by_id(entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("ledger entry {} not found", entry_id)))
    }
}
