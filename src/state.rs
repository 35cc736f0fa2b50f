use std::collections::VecDeque;

use crate::analysis::TeamReport;
use crate::error::AnalysisError;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisStatus {
    Idle,
    Loading { team_id: u32 },
    Ready(Box<TeamReport>),
    Failed { team_id: u32, message: String },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub team_input: String,
    pub status: AnalysisStatus,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            team_input: String::new(),
            status: AnalysisStatus::Idle,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    /// Appends a digit unless the id would no longer fit in a `u32`.
    pub fn push_input(&mut self, c: char) {
        let Some(digit) = c.to_digit(10) else {
            return;
        };
        let current = if self.team_input.is_empty() {
            Some(0)
        } else {
            self.team_input.parse::<u32>().ok()
        };
        let fits = current
            .and_then(|n| n.checked_mul(10))
            .and_then(|n| n.checked_add(digit))
            .is_some();
        if fits {
            self.team_input.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        self.team_input.pop();
    }

    /// Parsed team id, if the input box holds a positive number.
    pub fn team_id(&self) -> Option<u32> {
        self.team_input.parse::<u32>().ok().filter(|id| *id > 0)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, AnalysisStatus::Loading { .. })
    }

    pub fn report(&self) -> Option<&TeamReport> {
        match &self.status {
            AnalysisStatus::Ready(report) => Some(&**report),
            _ => None,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

/// Messages from the analysis worker to the UI.
#[derive(Debug)]
pub enum Delta {
    Started {
        team_id: u32,
    },
    Finished {
        team_id: u32,
        result: Result<TeamReport, AnalysisError>,
    },
    Log(String),
}

/// Requests from the UI to the analysis worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Analyze { team_id: u32 },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Started { team_id } => {
            state.status = AnalysisStatus::Loading { team_id };
            state.push_log(format!("[INFO] Analysing team {team_id}"));
        }
        Delta::Finished { team_id, result } => match result {
            Ok(report) => {
                state.push_log(format!(
                    "[INFO] Team {team_id}: gameweek {}, {} recommended",
                    report.current_period,
                    report.recommendation.len()
                ));
                state.status = AnalysisStatus::Ready(Box::new(report));
            }
            Err(err) => {
                let message = err.to_string();
                state.push_log(format!("[WARN] {message}"));
                state.status = AnalysisStatus::Failed { team_id, message };
            }
        },
        Delta::Log(msg) => state.push_log(msg),
    }
}
