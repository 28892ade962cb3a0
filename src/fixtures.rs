// 🎟️ Seeds Fixtures - loaded result tree handed out to load-test workers
//
// Read-only after load. The only mutable state is the cursor behind
// `get_next_user`, advanced under a mutex so that concurrent workers never
// draw the same user.

use parking_lot::Mutex;
use rand::Rng;

use crate::error::{Result, SeedsError};
use crate::plan::PlanTotals;
use crate::result::{SeedUserResult, SeedsResult};
use crate::store::SeedsDump;

pub struct SeedsFixtures {
    scenario: String,
    result: SeedsResult,
    cursor: Mutex<usize>,
}

impl SeedsFixtures {
    pub fn new(scenario: &str, result: SeedsResult) -> Self {
        SeedsFixtures {
            scenario: scenario.to_string(),
            result,
            cursor: Mutex::new(0),
        }
    }

    pub fn from_dump(dump: SeedsDump) -> Self {
        Self::new(&dump.scenario, dump.result)
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn users(&self) -> &[SeedUserResult] {
        &self.result.users
    }

    pub fn result(&self) -> &SeedsResult {
        &self.result
    }

    pub fn len(&self) -> usize {
        self.result.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result.users.is_empty()
    }

    pub fn totals(&self) -> PlanTotals {
        self.result.totals()
    }

    /// Next unused user, in seeding order; each user is handed out once
    pub fn get_next_user(&self) -> Result<&SeedUserResult> {
        let index = {
            let mut cursor = self.cursor.lock();
            if *cursor >= self.result.users.len() {
                return Err(SeedsError::Exhausted {
                    scenario: self.scenario.clone(),
                    total: self.result.users.len(),
                });
            }
            let index = *cursor;
            *cursor += 1;
            index
        };
        Ok(&self.result.users[index])
    }

    /// Any user; may repeat and does not move the cursor
    pub fn get_random_user(&self) -> Result<&SeedUserResult> {
        if self.result.users.is_empty() {
            return Err(SeedsError::Exhausted {
                scenario: self.scenario.clone(),
                total: 0,
            });
        }
        let index = rand::thread_rng().gen_range(0..self.result.users.len());
        Ok(&self.result.users[index])
    }

    /// The Nth seeded user
    pub fn get_user(&self, index: usize) -> Result<&SeedUserResult> {
        self.result
            .users
            .get(index)
            .ok_or(SeedsError::UserIndexOutOfRange {
                index,
                total: self.result.users.len(),
            })
    }

    /// Users not yet handed out by `get_next_user`
    pub fn remaining(&self) -> usize {
        self.result.users.len().saturating_sub(*self.cursor.lock())
    }

    /// Start handing out users from the beginning again
    pub fn reset(&self) {
        *self.cursor.lock() = 0;
    }
}

// ============================================================================
// TESTS
// ============================================================================
