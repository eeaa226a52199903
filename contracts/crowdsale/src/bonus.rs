//! Time-tiered bonus table.
//!
//! Tiers are `(offset, percent)` pairs where `offset` is measured in seconds
//! from the sale's opening time. The first tier whose offset has not elapsed
//! yet decides the percent applied to the base rate; past the last tier the
//! rate is applied as is.

use soroban_sdk::{contracttype, Env, Vec};

use crate::ContractError;

/// Percent applied once every tier has elapsed.
pub const NO_BONUS_PERCENT: u32 = 100;

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct BonusSchedule {
    /// Offsets from opening time, strictly increasing.
    pub offsets: Vec<u64>,
    /// Percent for each offset, `120` meaning a 20% bonus.
    pub percents: Vec<u32>,
}

impl BonusSchedule {
    pub fn empty(env: &Env) -> Self {
        Self {
            offsets: Vec::new(env),
            percents: Vec::new(env),
        }
    }

    /// Builds a schedule from the two parallel sequences.
    pub fn new(offsets: Vec<u64>, percents: Vec<u32>) -> Result<Self, ContractError> {
        if offsets.len() != percents.len() {
            return Err(ContractError::InvalidSchedule);
        }

        let mut previous: Option<u64> = None;
        for offset in offsets.iter() {
            if matches!(previous, Some(prev) if offset <= prev) {
                return Err(ContractError::InvalidSchedule);
            }
            previous = Some(offset);
        }

        Ok(Self { offsets, percents })
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn len(&self) -> u32 {
        self.offsets.len()
    }

    /// Returns the percent in force `elapsed` seconds after opening, or
    /// `None` while no schedule has been configured.
    pub fn percent_at(&self, elapsed: u64) -> Option<u32> {
        if self.is_empty() {
            return None;
        }

        for (offset, percent) in self.offsets.iter().zip(self.percents.iter()) {
            if elapsed < offset {
                return Some(percent);
            }
        }

        Some(NO_BONUS_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use soroban_sdk::vec;

    const DAY: u64 = 86_400;

    fn sample(env: &Env) -> BonusSchedule {
        BonusSchedule::new(
            vec![env, DAY, 3 * DAY, 10 * DAY, 17 * DAY],
            vec![env, 120u32, 115, 110, 105],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_schedule_has_no_percent() {
        let env = Env::default();
        let schedule = BonusSchedule::empty(&env);

        assert!(schedule.is_empty());
        assert_eq!(schedule.percent_at(0), None);
        assert_eq!(schedule.percent_at(100 * DAY), None);
    }

    #[test]
    fn test_percent_follows_tiers() {
        let env = Env::default();
        let schedule = sample(&env);

        assert_eq!(schedule.percent_at(0), Some(120));
        assert_eq!(schedule.percent_at(2 * 3_600), Some(120));
        assert_eq!(schedule.percent_at(2 * DAY), Some(115));
        assert_eq!(schedule.percent_at(4 * DAY), Some(110));
        assert_eq!(schedule.percent_at(11 * DAY), Some(105));
        assert_eq!(schedule.percent_at(20 * DAY), Some(NO_BONUS_PERCENT));
    }

    #[test]
    fn test_tier_boundary_moves_to_next_tier() {
        let env = Env::default();
        let schedule = sample(&env);

        assert_eq!(schedule.percent_at(DAY - 1), Some(120));
        assert_eq!(schedule.percent_at(DAY), Some(115));
        assert_eq!(schedule.percent_at(17 * DAY), Some(NO_BONUS_PERCENT));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let env = Env::default();
        let result = BonusSchedule::new(vec![&env, DAY, 2 * DAY], vec![&env, 120u32]);

        assert_eq!(result, Err(ContractError::InvalidSchedule));
    }

    #[test]
    fn test_unordered_offsets_rejected() {
        let env = Env::default();

        let descending = BonusSchedule::new(vec![&env, 2 * DAY, DAY], vec![&env, 120u32, 110]);
        assert_eq!(descending, Err(ContractError::InvalidSchedule));

        let repeated = BonusSchedule::new(vec![&env, DAY, DAY], vec![&env, 120u32, 110]);
        assert_eq!(repeated, Err(ContractError::InvalidSchedule));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_percent_is_a_tier_or_no_bonus(elapsed in 0u64..40 * DAY) {
            let env = Env::default();
            let schedule = sample(&env);

            let percent = schedule.percent_at(elapsed).unwrap();
            let in_table = schedule.percents.iter().any(|p| p == percent);
            prop_assert!(in_table || percent == NO_BONUS_PERCENT);
        }

        #[test]
        fn prop_percent_never_increases_over_time(a in 0u64..40 * DAY, b in 0u64..40 * DAY) {
            let env = Env::default();
            let schedule = sample(&env);

            let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(schedule.percent_at(earlier) >= schedule.percent_at(later));
        }
    }
}
