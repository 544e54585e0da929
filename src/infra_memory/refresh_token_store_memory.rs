use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::Duration;

/// Process-local store. Every operation runs under the guard of the single
/// shard holding the record, which gives per-record atomicity.
#[derive(Debug, Default)]
pub struct MemoryRefreshTokenStore {
    records: DashMap<String, RefreshTokenRecord>,
}

impl MemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn issue(
        &self,
        token: &RefreshToken,
        owner: &Username,
        ttl: Duration,
    ) -> Result<RefreshTokenRecord, StoreError> {
        match self.records.entry(token.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                let record = RefreshTokenRecord::new(token.clone(), owner.clone(), Utc::now(), ttl);
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn validate(&self, token: &str) -> Result<Option<Username>, StoreError> {
        let now = Utc::now();
        Ok(self
            .records
            .get(token)
            .filter(|record| record.is_active_at(now))
            .map(|record| record.owner.clone()))
    }

    async fn revoke(&self, token: &str) -> Result<bool, StoreError> {
        match self.records.get_mut(token) {
            Some(mut record) if !record.revoked => {
                record.revoked = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn sweep(&self) -> Result<u64, StoreError> {
        let now = Utc::now();
        let candidates: Vec<String> = self
            .records
            .iter()
            .filter(|entry| entry.value().is_sweepable_at(now))
            .map(|entry| entry.key().clone())
            .collect();

        // The scan above held one shard's read guard at a time. Re-check under
        // the write guard; the record may have changed since.
        let mut removed = 0;
        for token in candidates {
            if self
                .records
                .remove_if(&token, |_, record| record.is_sweepable_at(now))
                .is_some()
            {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn tokens_of(&self, owner: &Username) -> Result<Vec<RefreshToken>, StoreError> {
        let mut owned: Vec<(chrono::DateTime<Utc>, RefreshToken)> = self
            .records
            .iter()
            .filter(|entry| &entry.value().owner == owner)
            .map(|entry| (entry.value().issued_at, entry.value().token.clone()))
            .collect();
        owned.sort_by_key(|(issued_at, _)| *issued_at);
        Ok(owned.into_iter().map(|(_, token)| token).collect())
    }
}
