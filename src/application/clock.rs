//! Injected time and identifier capabilities.
//!
//! Orchestrators never call `Utc::now()` or `Uuid::new_v4()` directly;
//! deterministic substitutes stand in during tests.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

pub trait IdGen: Send + Sync + 'static {
    fn next_id(&self) -> Uuid;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGen;

impl IdGen for UuidGen {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
