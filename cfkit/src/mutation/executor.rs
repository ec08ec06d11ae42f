use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::errors::CfError;
use crate::types::{ByteColumn, MutationBatch, MutationOp};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MutationResult {
    pub mutations: usize,
    pub rows: usize,
    pub latency: Duration,
}

impl MutationResult {
    pub fn latency_ms(&self) -> f64 {
        self.latency.as_secs_f64() * 1000.0
    }
}

/// Submits a batch of mutations to a store
#[async_trait]
pub trait MutationExecutor: Send + Sync {
    async fn execute(&self, batch: MutationBatch) -> Result<MutationResult, CfError>;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredCell {
    pub value: Vec<u8>,
    pub clock: i64,
    pub ttl: Option<i32>,
}

impl StoredCell {
    // an expiry past i64::MAX never arrives
    fn expired_at(&self, now_micros: i64) -> bool {
        let expires = self
            .ttl
            .and_then(|ttl| i64::from(ttl).checked_mul(1_000_000))
            .and_then(|ttl_micros| self.clock.checked_add(ttl_micros));
        matches!(expires, Some(at) if at <= now_micros)
    }
}

#[derive(Debug, Clone)]
enum CellState {
    Live(StoredCell),
    Tombstone(i64),
}

impl CellState {
    fn clock(&self) -> i64 {
        match self {
            CellState::Live(cell) => cell.clock,
            CellState::Tombstone(clock) => *clock,
        }
    }
}

#[derive(Debug, Default)]
struct StoredRow {
    cells: BTreeMap<Vec<u8>, CellState>,
    deleted_at: Option<i64>,
}

impl StoredRow {
    fn insert(&mut self, column: ByteColumn) {
        // row tombstones win ties
        if self.deleted_at.is_some_and(|deleted| column.clock <= deleted) {
            return;
        }
        let newer = match self.cells.get(&column.name) {
            Some(CellState::Live(cell)) => column.clock >= cell.clock,
            Some(CellState::Tombstone(clock)) => column.clock > *clock,
            None => true,
        };
        if newer {
            self.cells.insert(
                column.name,
                CellState::Live(StoredCell {
                    value: column.value,
                    clock: column.clock,
                    ttl: column.ttl,
                }),
            );
        }
    }

    fn delete_column(&mut self, name: Vec<u8>, clock: i64) {
        let shadows = self
            .cells
            .get(&name)
            .map_or(true, |state| state.clock() <= clock);
        if shadows {
            self.cells.insert(name, CellState::Tombstone(clock));
        }
    }

    fn delete(&mut self, clock: i64) {
        self.deleted_at = Some(self.deleted_at.map_or(clock, |prev| prev.max(clock)));
        self.cells.retain(|_, state| state.clock() > clock);
    }

    fn live(&self, now_micros: i64) -> impl Iterator<Item = (&Vec<u8>, &StoredCell)> {
        self.cells.iter().filter_map(move |(name, state)| match state {
            CellState::Live(cell) if !cell.expired_at(now_micros) => Some((name, cell)),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutorStats {
    pub batches: u64,
    pub insertions: u64,
    pub column_deletions: u64,
    pub row_deletions: u64,
}

/// Column family store held in memory, resolving conflicts by clock
#[derive(Default)]
pub struct InMemoryExecutor {
    rows: DashMap<(String, Vec<u8>), StoredRow>,
    stats: Mutex<ExecutorStats>,
}

impl InMemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(&self, column_family: &str, key: &[u8], name: &[u8]) -> Option<StoredCell> {
        let now = Utc::now().timestamp_micros();
        let row = self.rows.get(&(column_family.to_string(), key.to_vec()))?;
        let cell = row
            .live(now)
            .find(|(cell_name, _)| cell_name.as_slice() == name)
            .map(|(_, cell)| cell.clone());
        cell
    }

    /// Live columns of a row, sorted by name bytes
    pub fn row(&self, column_family: &str, key: &[u8]) -> BTreeMap<Vec<u8>, StoredCell> {
        let now = Utc::now().timestamp_micros();
        self.rows
            .get(&(column_family.to_string(), key.to_vec()))
            .map(|row| {
                let cells: BTreeMap<_, _> = row
                    .live(now)
                    .map(|(name, cell)| (name.clone(), cell.clone()))
                    .collect();
                cells
            })
            .unwrap_or_default()
    }

    /// Rows with at least one live column
    pub fn row_count(&self, column_family: &str) -> usize {
        let now = Utc::now().timestamp_micros();
        self.rows
            .iter()
            .filter(|entry| entry.key().0 == column_family)
            .filter(|entry| entry.value().live(now).next().is_some())
            .count()
    }

    pub fn stats(&self) -> ExecutorStats {
        self.stats.lock().clone()
    }
}

#[async_trait]
impl MutationExecutor for InMemoryExecutor {
    async fn execute(&self, batch: MutationBatch) -> Result<MutationResult, CfError> {
        let start = Instant::now();
        let mutations = batch.len();
        let rows = batch.row_count();
        let mut stats = ExecutorStats::default();

        for mutation in batch.mutations {
            let mut row = self
                .rows
                .entry((mutation.column_family, mutation.key))
                .or_default();
            match mutation.op {
                MutationOp::Insert(column) => {
                    stats.insertions += 1;
                    row.insert(column);
                }
                MutationOp::DeleteColumn { name, clock } => {
                    stats.column_deletions += 1;
                    row.delete_column(name, clock);
                }
                MutationOp::DeleteRow { clock } => {
                    stats.row_deletions += 1;
                    row.delete(clock);
                }
            }
        }

        {
            let mut totals = self.stats.lock();
            totals.batches += 1;
            totals.insertions += stats.insertions;
            totals.column_deletions += stats.column_deletions;
            totals.row_deletions += stats.row_deletions;
        }

        debug!("Applied {} mutations across {} rows in memory", mutations, rows);

        Ok(MutationResult {
            mutations,
            rows,
            latency: start.elapsed(),
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}
