use log::info;

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::fpl_fetch::FplSource;
use crate::history::{PeriodRecord, current_period, points_trend};
use crate::player_pool::PlayerPool;
use crate::squad_ranker::{RankedSubset, partition};
use crate::transfer_recommender::{TransferCandidateSet, recommend};

/// Everything a presenter needs for one team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamReport {
    pub team_id: u32,
    pub current_period: u32,
    pub trend: Vec<PeriodRecord>,
    pub best: RankedSubset,
    pub worst: RankedSubset,
    pub recommendation: TransferCandidateSet,
}

/// Runs history → picks → pool → rank → recommend. Any retrieval or pool failure stops
/// the pipeline before later stages run.
pub fn analyze_team<S: FplSource + ?Sized>(
    source: &S,
    team_id: u32,
    config: &AnalyzerConfig,
) -> Result<TeamReport, AnalysisError> {
    let history = source.team_history(team_id)?;
    let period = current_period(&history).ok_or(AnalysisError::NoCompletedPeriod { team_id })?;
    let trend = points_trend(&history, config.trend_window);
    info!("team {team_id}: analysing gameweek {period}");

    let picks = source.team_picks(team_id, period)?;
    let pool = PlayerPool::build(source.player_records()?)?;
    info!(
        "team {team_id}: {} picks against {} pool players",
        picks.len(),
        pool.len()
    );

    let pick_ids: Vec<u32> = picks.iter().map(|p| p.player_id).collect();
    let (worst, best) = partition(&pick_ids, &pool, config.subset_size);
    let recommendation = recommend(
        &worst,
        &pool,
        config.ownership_ceiling,
        config.candidate_count,
    );
    info!(
        "team {team_id}: {} candidates (budget {}, form floor {:.2})",
        recommendation.len(),
        recommendation.thresholds.budget,
        recommendation.thresholds.form_floor
    );

    Ok(TeamReport {
        team_id,
        current_period: period,
        trend,
        best,
        worst,
        recommendation,
    })
}
