use std::fmt;

/// Failures that abort a team analysis.
///
/// Ranking and recommendation never produce these; they degrade to empty results instead.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A remote retrieval failed (transport error or non-2xx status).
    UpstreamUnavailable { resource: String, reason: String },

    /// A player-pool record had a numeric field that could not be parsed,
    /// or repeated an identifier already in the pool.
    MalformedPlayerRecord {
        player_id: Option<u32>,
        field: &'static str,
        value: String,
    },

    /// The team history holds no period with a positive point total.
    NoCompletedPeriod { team_id: u32 },
}

impl AnalysisError {
    pub fn upstream(resource: impl Into<String>, reason: impl fmt::Display) -> Self {
        AnalysisError::UpstreamUnavailable {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::UpstreamUnavailable { resource, reason } => {
                write!(f, "Failed to retrieve {resource}: {reason}")
            }
            AnalysisError::MalformedPlayerRecord {
                player_id: Some(id),
                field,
                value,
            } => write!(f, "Player {id} has malformed {field}: {value:?}"),
            AnalysisError::MalformedPlayerRecord {
                player_id: None,
                field,
                value,
            } => write!(f, "Player record has malformed {field}: {value:?}"),
            AnalysisError::NoCompletedPeriod { team_id } => {
                write!(f, "Team {team_id} has no gameweek with points yet")
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure_point() {
        let err = AnalysisError::upstream("team history", "http 404 Not Found");
        assert_eq!(
            err.to_string(),
            "Failed to retrieve team history: http 404 Not Found"
        );

        let err = AnalysisError::MalformedPlayerRecord {
            player_id: Some(7),
            field: "form",
            value: "N/A".into(),
        };
        assert_eq!(err.to_string(), "Player 7 has malformed form: \"N/A\"");
    }
}
