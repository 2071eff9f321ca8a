use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::domain::{DateWindow, GoalContribution, InvestmentContribution, Movement, UserId};
use crate::errors::Result;
use crate::storage::{LedgerReader, RowKind};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_MAX_SIZE: usize = 1000;

type CacheKey = (UserId, DateWindow, RowKind);

#[derive(Debug, Clone)]
enum CachedRows {
    Movements(Vec<Movement>),
    GoalContributions(Vec<GoalContribution>),
    InvestmentContributions(Vec<InvestmentContribution>),
}

#[derive(Debug)]
struct CacheEntry {
    rows: CachedRows,
    inserted: Instant,
    /// Value of the access clock at the last hit or insert.
    last_used: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub size: usize,
    pub max_size: usize,
}

/// Memoises fetches of any [`LedgerReader`] per user, window and row kind.
///
/// Entries expire after `ttl` and the least recently used one is evicted once
/// `max_size` entries are held. Failed fetches are never cached. Writers are
/// expected to call [`invalidate_user`](Self::invalidate_user) after changing
/// a user's ledger.
pub struct CachedLedgerReader<R> {
    inner: R,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    max_size: usize,
    clock: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<R: LedgerReader> CachedLedgerReader<R> {
    pub fn new(inner: R, ttl: Duration, max_size: usize) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_size: max_size.max(1),
            clock: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn with_defaults(inner: R) -> Self {
        Self::new(inner, DEFAULT_TTL, DEFAULT_MAX_SIZE)
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn invalidate_user(&self, user: UserId) {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|(owner, _, _), _| *owner != user);
        tracing::debug!(%user, dropped = before - entries.len(), "invalidated cached ledger rows");
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        CacheStats {
            hits,
            misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
            size: self.entries().len(),
            max_size: self.max_size,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn lookup<T: Clone>(
        &self,
        key: &CacheKey,
        extract: fn(&CachedRows) -> Option<&Vec<T>>,
    ) -> Option<Vec<T>> {
        let mut entries = self.entries();
        if entries.get(key)?.inserted.elapsed() >= self.ttl {
            entries.remove(key);
            return None;
        }
        let entry = entries.get_mut(key)?;
        entry.last_used = self.tick();
        extract(&entry.rows).cloned()
    }

    fn store(&self, key: CacheKey, rows: CachedRows) {
        let mut entries = self.entries();
        if !entries.contains_key(&key) && entries.len() >= self.max_size {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.inserted.elapsed() < ttl);
            if entries.len() >= self.max_size {
                evict_lru(&mut entries);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                rows,
                inserted: Instant::now(),
                last_used: self.tick(),
            },
        );
    }

    fn cached<T: Clone>(
        &self,
        key: CacheKey,
        extract: fn(&CachedRows) -> Option<&Vec<T>>,
        wrap: fn(Vec<T>) -> CachedRows,
        load: impl FnOnce() -> Result<Vec<T>>,
    ) -> Result<Vec<T>> {
        if let Some(rows) = self.lookup(&key, extract) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(user = %key.0, window = %key.1, rows = %key.2, "ledger cache hit");
            return Ok(rows);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(user = %key.0, window = %key.1, rows = %key.2, "ledger cache miss");
        let rows = load()?;
        self.store(key, wrap(rows.clone()));
        Ok(rows)
    }
}

fn evict_lru(entries: &mut HashMap<CacheKey, CacheEntry>) {
    let oldest = entries
        .iter()
        .min_by_key(|(_, entry)| entry.last_used)
        .map(|(key, _)| *key);
    if let Some(key) = oldest {
        tracing::trace!(user = %key.0, window = %key.1, rows = %key.2, "evicted cached ledger rows");
        entries.remove(&key);
    }
}

impl<R: LedgerReader> LedgerReader for CachedLedgerReader<R> {
    fn fetch_movements(&self, user: UserId, window: DateWindow) -> Result<Vec<Movement>> {
        self.cached(
            (user, window, RowKind::Movements),
            |rows| match rows {
                CachedRows::Movements(rows) => Some(rows),
                _ => None,
            },
            CachedRows::Movements,
            || self.inner.fetch_movements(user, window),
        )
    }

    fn fetch_goal_contributions(
        &self,
        user: UserId,
        window: DateWindow,
    ) -> Result<Vec<GoalContribution>> {
        self.cached(
            (user, window, RowKind::GoalContributions),
            |rows| match rows {
                CachedRows::GoalContributions(rows) => Some(rows),
                _ => None,
            },
            CachedRows::GoalContributions,
            || self.inner.fetch_goal_contributions(user, window),
        )
    }

    fn fetch_investment_contributions(
        &self,
        user: UserId,
        window: DateWindow,
    ) -> Result<Vec<InvestmentContribution>> {
        self.cached(
            (user, window, RowKind::InvestmentContributions),
            |rows| match rows {
                CachedRows::InvestmentContributions(rows) => Some(rows),
                _ => None,
            },
            CachedRows::InvestmentContributions,
            || self.inner.fetch_investment_contributions(user, window),
        )
    }
}
