use std::cmp::Ordering;

use log::debug;
use serde::Serialize;

use crate::player_pool::{Player, PlayerPool};

/// Number of players shown in each of the best/worst tables.
pub const DEFAULT_SUBSET_SIZE: usize = 7;

/// Squad players ordered by form. Worst subsets ascend, best subsets descend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedSubset {
    players: Vec<Player>,
}

/// Table view of a ranked squad player: (name, form, cost).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadRow {
    pub name: String,
    pub form: f64,
    pub cost: u32,
}

impl RankedSubset {
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn rows(&self) -> Vec<SquadRow> {
        self.players
            .iter()
            .map(|p| SquadRow {
                name: p.name.clone(),
                form: p.form,
                cost: p.cost,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Combined sale value of the subset.
    pub fn total_cost(&self) -> u64 {
        self.players.iter().map(|p| u64::from(p.cost)).sum()
    }

    /// Mean form, or 0.0 when empty.
    pub fn mean_form(&self) -> f64 {
        if self.players.is_empty() {
            return 0.0;
        }
        let total: f64 = self.players.iter().map(|p| p.form).sum();
        total / self.players.len() as f64
    }
}

impl From<Vec<Player>> for RankedSubset {
    fn from(players: Vec<Player>) -> Self {
        Self { players }
    }
}

/// Splits the resolvable part of a squad into its `k` worst and `k` best players by form.
///
/// Picks missing from the pool are dropped. The two subsets may overlap when the squad
/// has fewer than `2 * k` players; overlap is kept as-is.
pub fn partition(picks: &[u32], pool: &PlayerPool, k: usize) -> (RankedSubset, RankedSubset) {
    let mut resolved: Vec<&Player> = Vec::with_capacity(picks.len());
    for &id in picks {
        match pool.find_by_id(id) {
            Some(player) => resolved.push(player),
            None => debug!("dropping squad pick {id}: not in player pool"),
        }
    }

    // sort_by is stable, so equal form keeps squad order in both directions.
    let mut ascending = resolved.clone();
    ascending.sort_by(|a, b| cmp_form(a.form, b.form));
    let mut descending = resolved;
    descending.sort_by(|a, b| cmp_form(b.form, a.form));

    let worst = ascending.into_iter().take(k).cloned().collect::<Vec<_>>();
    let best = descending.into_iter().take(k).cloned().collect::<Vec<_>>();
    (RankedSubset::from(worst), RankedSubset::from(best))
}

pub(crate) fn cmp_form(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}
