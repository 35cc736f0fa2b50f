use serde::Serialize;

use crate::player_pool::{Player, PlayerPool};
use crate::squad_ranker::{RankedSubset, cmp_form};

pub const DEFAULT_OWNERSHIP_CEILING: f64 = 15.0;
pub const DEFAULT_CANDIDATE_COUNT: usize = 7;

/// Limits derived from the players being sold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferThresholds {
    /// Combined cost of the worst subset; candidates may not exceed it.
    pub budget: u64,
    /// Mean form of the worst subset; candidates must beat it strictly.
    pub form_floor: f64,
    /// Candidates must be owned by strictly fewer managers than this percentage.
    pub ownership_ceiling: f64,
}

impl TransferThresholds {
    pub fn from_worst(worst: &RankedSubset, ownership_ceiling: f64) -> Self {
        Self {
            budget: worst.total_cost(),
            form_floor: worst.mean_form(),
            ownership_ceiling,
        }
    }

    pub fn admits(&self, player: &Player) -> bool {
        u64::from(player.cost) <= self.budget
            && player.form > self.form_floor
            && player.ownership < self.ownership_ceiling
    }
}

/// Table view of a candidate: (name, form, cost, ownership).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRow {
    pub name: String,
    pub form: f64,
    pub cost: u32,
    pub ownership: f64,
}

/// Differential replacements for the worst subset, best form first.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferCandidateSet {
    pub thresholds: TransferThresholds,
    candidates: Vec<Player>,
}

impl TransferCandidateSet {
    pub fn players(&self) -> &[Player] {
        &self.candidates
    }

    pub fn rows(&self) -> Vec<CandidateRow> {
        self.candidates
            .iter()
            .map(|p| CandidateRow {
                name: p.name.clone(),
                form: p.form,
                cost: p.cost,
                ownership: p.ownership,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Searches the whole pool for players that fit the worst subset's combined budget,
/// beat its mean form and sit under the ownership ceiling.
///
/// An empty `worst` yields budget 0 and form floor 0.
pub fn recommend(
    worst: &RankedSubset,
    pool: &PlayerPool,
    ownership_ceiling: f64,
    candidate_count: usize,
) -> TransferCandidateSet {
    let thresholds = TransferThresholds::from_worst(worst, ownership_ceiling);

    let mut survivors: Vec<&Player> = pool.iter().filter(|p| thresholds.admits(p)).collect();
    survivors.sort_by(|a, b| cmp_form(b.form, a.form));

    TransferCandidateSet {
        thresholds,
        candidates: survivors
            .into_iter()
            .take(candidate_count)
            .cloned()
            .collect(),
    }
}
