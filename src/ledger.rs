use std::collections::{BTreeMap, BTreeSet};

use crate::models::{BeltId, BeltRank, Track};

/// Age from which a student trains on the adult track.
pub const ADULT_TRACK_AGE: i32 = 16;

/// Read-only view over the academy's belt ranks, kept sorted by `rank`.
#[derive(Debug, Clone, Default)]
pub struct BeltLedger {
    ranks: Vec<BeltRank>,
}

impl BeltLedger {
    pub fn new(mut ranks: Vec<BeltRank>) -> Self {
        ranks.sort_by(|a, b| a.rank.cmp(&b.rank).then(a.id.cmp(&b.id)));
        Self { ranks }
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn find(&self, id: BeltId) -> Option<&BeltRank> {
        self.ranks.iter().find(|belt| belt.id == id)
    }

    pub fn find_in_track_by_name(&self, track: Track, name: &str) -> Option<&BeltRank> {
        self.ranks
            .iter()
            .find(|belt| belt.track == track && belt.name == name)
    }

    /// Ranks in ascending `rank` order, optionally restricted to one track.
    pub fn sorted_by_rank(&self, track: Option<Track>) -> Vec<&BeltRank> {
        self.ranks
            .iter()
            .filter(|belt| track.map_or(true, |track| belt.track == track))
            .collect()
    }

    /// Lowest rank of the same track strictly above `current`, or `None` when
    /// `current` closes its track.
    pub fn next_rank_in_track(&self, current: &BeltRank) -> Option<&BeltRank> {
        self.ranks
            .iter()
            .find(|belt| belt.track == current.track && belt.rank > current.rank)
    }

    pub fn entry_rank(&self, track: Track) -> Option<&BeltRank> {
        self.ranks.iter().find(|belt| belt.track == track)
    }

    /// Belt handed to a newly enrolled student of the given age.
    pub fn initial_belt_for_age(&self, age: i32) -> Option<&BeltRank> {
        let track = if age < ADULT_TRACK_AGE {
            Track::Kids
        } else {
            Track::Adult
        };
        self.entry_rank(track)
    }

    /// Integrity problems worth surfacing to an operator. Gaps in the shared
    /// `rank` sequence are expected and not reported.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen_ids = BTreeSet::new();
        let mut seen_ranks: BTreeMap<(Track, i32), &str> = BTreeMap::new();

        for belt in &self.ranks {
            if !seen_ids.insert(belt.id) {
                issues.push(format!("duplicate belt id {}", belt.id));
            }
            if let Some(other) = seen_ranks.insert((belt.track, belt.rank), belt.name.as_str()) {
                issues.push(format!(
                    "{} track has rank {} on both \"{}\" and \"{}\"",
                    belt.track, belt.rank, other, belt.name
                ));
            }
            if belt.track == Track::Kids && belt.min_age.is_none() {
                issues.push(format!("kids belt \"{}\" has no minimum age", belt.name));
            }
        }

        issues
    }
}
