//! In-memory session stores for work reports and team messages.
//!
//! Each store exclusively owns its collection. Callers read through `list`,
//! `iter` and lookups, and write only through the store operations, which
//! validate before touching the collection.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};

mod messages;
mod reports;
mod roster;
mod snapshot;

pub use messages::MessageStore;
pub use reports::ReportStore;
pub use roster::TeamRoster;
pub use snapshot::{load_snapshot, save_snapshot};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic sessions and tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

/// Checks restored ids are positive and returns the id that follows them.
pub(crate) fn next_id_after(kind: &str, ids: impl IntoIterator<Item = i64>) -> Result<i64> {
    let mut highest = 0;
    for id in ids {
        if id <= 0 {
            bail!("restored {kind} id {id} is not positive");
        }
        highest = highest.max(id);
    }
    highest
        .checked_add(1)
        .with_context(|| format!("restored {kind} ids leave no room for new ones"))
}
