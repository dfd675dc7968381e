//! Eviction policies
//!
//! When no station accepts a transaction the scheduler flushes one station
//! chosen by an [`EvictionPolicy`]. Every policy scans in ascending index
//! order and resolves ties to the lowest index, so identical input streams
//! produce identical schedules.

use crate::station::Station;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chooses the station to flush
pub trait EvictionPolicy: Send {
    /// Index of the victim in `stations`
    ///
    /// `stations` is never empty; the scheduler rejects empty pools before
    /// any scheduling.
    fn select_victim(&mut self, stations: &[Station]) -> usize;

    /// Short policy name for logs and reports
    fn name(&self) -> &'static str;
}

fn first_min_by<K: Ord>(stations: &[Station], key: impl Fn(&Station) -> K) -> usize {
    let mut best = 0;
    for i in 1..stations.len() {
        if key(&stations[i]) < key(&stations[best]) {
            best = i;
        }
    }
    best
}

fn first_max_by<K: Ord>(stations: &[Station], key: impl Fn(&Station) -> K) -> usize {
    let mut best = 0;
    for i in 1..stations.len() {
        if key(&stations[i]) > key(&stations[best]) {
            best = i;
        }
    }
    best
}

/// Flush the station with the fewest merged transactions
///
/// The default policy: the station with the fewest merges holds the least
/// accumulated work.
#[derive(Clone, Copy, Debug, Default)]
pub struct LeastCount;

impl EvictionPolicy for LeastCount {
    fn select_victim(&mut self, stations: &[Station]) -> usize {
        first_min_by(stations, Station::count)
    }

    fn name(&self) -> &'static str {
        "least-count"
    }
}

/// Flush the station with the most merged transactions
#[derive(Clone, Copy, Debug, Default)]
pub struct MostCount;

impl EvictionPolicy for MostCount {
    fn select_victim(&mut self, stations: &[Station]) -> usize {
        first_max_by(stations, Station::count)
    }

    fn name(&self) -> &'static str {
        "most-count"
    }
}

/// Flush the station whose current batch was opened earliest
#[derive(Clone, Copy, Debug, Default)]
pub struct Oldest;

impl EvictionPolicy for Oldest {
    fn select_victim(&mut self, stations: &[Station]) -> usize {
        first_min_by(stations, Station::opened_at)
    }

    fn name(&self) -> &'static str {
        "oldest"
    }
}

/// Flush the station holding the most keys
#[derive(Clone, Copy, Debug, Default)]
pub struct LargestKeySet;

impl EvictionPolicy for LargestKeySet {
    fn select_victim(&mut self, stations: &[Station]) -> usize {
        first_max_by(stations, Station::key_count)
    }

    fn name(&self) -> &'static str {
        "largest-key-set"
    }
}

/// Flush a uniformly random station from a seeded RNG
#[derive(Clone, Debug)]
pub struct RandomVictim {
    rng: StdRng,
}

impl RandomVictim {
    /// Create a policy seeded with `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl EvictionPolicy for RandomVictim {
    fn select_victim(&mut self, stations: &[Station]) -> usize {
        self.rng.gen_range(0..stations.len())
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Policy selector for configuration files and the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// [`LeastCount`]
    #[default]
    LeastCount,
    /// [`MostCount`]
    MostCount,
    /// [`Oldest`]
    Oldest,
    /// [`LargestKeySet`]
    LargestKeySet,
    /// [`RandomVictim`]
    Random,
}

impl PolicyKind {
    /// All selectable policies
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::LeastCount,
        PolicyKind::MostCount,
        PolicyKind::Oldest,
        PolicyKind::LargestKeySet,
        PolicyKind::Random,
    ];

    /// Instantiate the policy; `seed` is used only by [`PolicyKind::Random`]
    pub fn build(self, seed: u64) -> Box<dyn EvictionPolicy> {
        match self {
            PolicyKind::LeastCount => Box::new(LeastCount),
            PolicyKind::MostCount => Box::new(MostCount),
            PolicyKind::Oldest => Box::new(Oldest),
            PolicyKind::LargestKeySet => Box::new(LargestKeySet),
            PolicyKind::Random => Box::new(RandomVictim::new(seed)),
        }
    }

    /// Name as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::LeastCount => "least-count",
            PolicyKind::MostCount => "most-count",
            PolicyKind::Oldest => "oldest",
            PolicyKind::LargestKeySet => "largest-key-set",
            PolicyKind::Random => "random",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolicyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown eviction policy '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::txn;

    /// Build stations whose counts are `counts`, each merge a fresh key
    fn stations_with_counts(counts: &[usize]) -> Vec<Station> {
        let mut next_key = 0u64;
        counts
            .iter()
            .enumerate()
            .map(|(id, &count)| {
                let mut station = Station::new(id);
                for _ in 0..count {
                    assert!(station.try_merge(&txn(&[next_key])));
                    next_key += 1;
                }
                station
            })
            .collect()
    }

    #[test]
    fn test_least_count_picks_minimum() {
        let stations = stations_with_counts(&[3, 1, 2]);
        assert_eq!(LeastCount.select_victim(&stations), 1);
    }

    #[test]
    fn test_least_count_tie_breaks_to_lowest_index() {
        let stations = stations_with_counts(&[4, 2, 5, 2, 2]);
        assert_eq!(LeastCount.select_victim(&stations), 1);

        let stations = stations_with_counts(&[1, 1, 1]);
        assert_eq!(LeastCount.select_victim(&stations), 0);
    }

    #[test]
    fn test_single_station() {
        let stations = stations_with_counts(&[9]);
        assert_eq!(LeastCount.select_victim(&stations), 0);
        assert_eq!(MostCount.select_victim(&stations), 0);
        assert_eq!(RandomVictim::new(1).select_victim(&stations), 0);
    }

    #[test]
    fn test_most_count_first_max() {
        let stations = stations_with_counts(&[1, 4, 4, 2]);
        assert_eq!(MostCount.select_victim(&stations), 1);
    }

    #[test]
    fn test_oldest_uses_opened_at() {
        let mut stations = stations_with_counts(&[1, 1, 1]);
        stations[0].mark_opened(7);
        stations[1].mark_opened(2);
        stations[2].mark_opened(2);
        assert_eq!(Oldest.select_victim(&stations), 1);
    }

    #[test]
    fn test_largest_key_set() {
        let mut stations = stations_with_counts(&[1, 1]);
        assert!(stations[1].try_merge(&txn(&[100, 101, 102])));
        assert_eq!(LargestKeySet.select_victim(&stations), 1);
    }

    #[test]
    fn test_random_is_seeded() {
        let stations = stations_with_counts(&[1; 16]);
        let mut a = RandomVictim::new(42);
        let mut b = RandomVictim::new(42);
        let picks_a: Vec<usize> = (0..32).map(|_| a.select_victim(&stations)).collect();
        let picks_b: Vec<usize> = (0..32).map(|_| b.select_victim(&stations)).collect();
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(|&i| i < 16));
    }

    #[test]
    fn test_policy_kind_parse() {
        for kind in PolicyKind::ALL {
            assert_eq!(kind.as_str().parse::<PolicyKind>().unwrap(), kind);
            assert_eq!(kind.build(0).name(), kind.as_str());
        }
        assert!("fifo".parse::<PolicyKind>().is_err());
        assert_eq!(PolicyKind::default(), PolicyKind::LeastCount);
    }
}
