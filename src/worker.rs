use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use log::{error, info};

use crate::analysis::{TeamReport, analyze_team};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::fpl_fetch::{FplApi, FplSource};
use crate::state::{Delta, ProviderCommand};

/// Runs analyses on one background thread, strictly one at a time, in request order.
pub fn spawn_analysis_worker(
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    config: AnalyzerConfig,
) {
    thread::spawn(move || {
        let api = match FplApi::new(&config) {
            Ok(api) => Some(api),
            Err(err) => {
                error!("http client unavailable: {err:#}");
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] HTTP client unavailable: {err:#}"
                )));
                None
            }
        };

        while let Ok(cmd) = cmd_rx.recv() {
            let ProviderCommand::Analyze { team_id } = cmd;
            let result = match api.as_ref() {
                Some(api) => run_one(&tx, api, team_id, &config),
                None => Err(AnalysisError::upstream("FPL API", "http client unavailable")),
            };
            if tx.send(Delta::Finished { team_id, result }).is_err() {
                break;
            }
        }
        info!("analysis worker stopped");
    });
}

fn run_one(
    tx: &Sender<Delta>,
    source: &dyn FplSource,
    team_id: u32,
    config: &AnalyzerConfig,
) -> Result<TeamReport, AnalysisError> {
    let _ = tx.send(Delta::Started { team_id });
    analyze_team(source, team_id, config)
}
