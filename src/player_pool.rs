use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::AnalysisError;

/// A league player as seen by the ranking engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub form: f64,
    /// Price in tenths of a million.
    pub cost: u32,
    pub ownership: f64,
}

/// One entry of `bootstrap-static` `elements`, before validation.
///
/// `form` and `selected_by_percent` arrive as strings in the live API ("5.2"),
/// but numbers are accepted too.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayerRecord {
    pub id: u32,
    pub web_name: String,
    #[serde(default)]
    pub form: Value,
    pub now_cost: u32,
    #[serde(default)]
    pub selected_by_percent: Value,
}

/// Immutable snapshot of every player in the league, in upstream order.
#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    players: Vec<Player>,
    by_id: HashMap<u32, usize>,
}

impl PlayerPool {
    /// Validates every record. The first malformed one aborts the whole build.
    pub fn build(raw: Vec<RawPlayerRecord>) -> Result<Self, AnalysisError> {
        let mut players = Vec::with_capacity(raw.len());
        let mut by_id = HashMap::with_capacity(raw.len());

        for record in raw {
            let form = parse_metric(&record.form)
                .ok_or_else(|| malformed(record.id, "form", &record.form))?;
            let ownership = parse_metric(&record.selected_by_percent).ok_or_else(|| {
                malformed(
                    record.id,
                    "selected_by_percent",
                    &record.selected_by_percent,
                )
            })?;

            if by_id.insert(record.id, players.len()).is_some() {
                return Err(AnalysisError::MalformedPlayerRecord {
                    player_id: Some(record.id),
                    field: "id",
                    value: "duplicate identifier".to_string(),
                });
            }
            players.push(Player {
                id: record.id,
                name: record.web_name,
                form,
                cost: record.now_cost,
                ownership,
            });
        }

        Ok(Self { players, by_id })
    }

    /// Builds a pool from already-typed players, e.g. cached or synthetic data.
    /// Applies the same finiteness and uniqueness checks as [`build`](Self::build).
    pub fn from_players(players: Vec<Player>) -> Result<Self, AnalysisError> {
        let mut by_id = HashMap::with_capacity(players.len());
        for (idx, player) in players.iter().enumerate() {
            if !player.form.is_finite() {
                return Err(non_finite(player.id, "form", player.form));
            }
            if !player.ownership.is_finite() {
                return Err(non_finite(player.id, "selected_by_percent", player.ownership));
            }
            if by_id.insert(player.id, idx).is_some() {
                return Err(AnalysisError::MalformedPlayerRecord {
                    player_id: Some(player.id),
                    field: "id",
                    value: "duplicate identifier".to_string(),
                });
            }
        }
        Ok(Self { players, by_id })
    }

    pub fn find_by_id(&self, id: u32) -> Option<&Player> {
        self.by_id.get(&id).map(|&idx| &self.players[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

fn parse_metric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn malformed(player_id: u32, field: &'static str, value: &Value) -> AnalysisError {
    let value = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    AnalysisError::MalformedPlayerRecord {
        player_id: Some(player_id),
        field,
        value,
    }
}

fn non_finite(player_id: u32, field: &'static str, value: f64) -> AnalysisError {
    AnalysisError::MalformedPlayerRecord {
        player_id: Some(player_id),
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(id: u32, name: &str, form: Value, cost: u32, own: Value) -> RawPlayerRecord {
        RawPlayerRecord {
            id,
            web_name: name.to_string(),
            form,
            now_cost: cost,
            selected_by_percent: own,
        }
    }

    #[test]
    fn build_accepts_string_and_numeric_metrics() {
        let pool = PlayerPool::build(vec![
            raw(1, "Saka", json!("6.4"), 101, json!("38.2")),
            raw(2, "Mbeumo", json!(5.5), 78, json!(12)),
        ])
        .expect("pool should build");

        assert_eq!(pool.len(), 2);
        let saka = pool.find_by_id(1).expect("saka present");
        assert_eq!(saka.form, 6.4);
        assert_eq!(saka.ownership, 38.2);
        let mbeumo = pool.find_by_id(2).expect("mbeumo present");
        assert_eq!(mbeumo.ownership, 12.0);
        assert!(pool.find_by_id(3).is_none());
    }

    #[test]
    fn build_preserves_input_order() {
        let pool = PlayerPool::build(vec![
            raw(9, "C", json!("1.0"), 40, json!("1.0")),
            raw(3, "A", json!("2.0"), 40, json!("1.0")),
            raw(5, "B", json!("3.0"), 40, json!("1.0")),
        ])
        .unwrap();
        let ids: Vec<u32> = pool.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![9, 3, 5]);
    }

    #[test]
    fn malformed_form_fails_whole_pool() {
        let err = PlayerPool::build(vec![
            raw(1, "Ok", json!("4.0"), 50, json!("2.0")),
            raw(2, "Broken", json!("N/A"), 50, json!("2.0")),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MalformedPlayerRecord {
                player_id: Some(2),
                field: "form",
                value: "N/A".to_string(),
            }
        );
    }

    #[test]
    fn malformed_ownership_and_non_finite_values_fail() {
        let err = PlayerPool::build(vec![raw(4, "X", json!("1.0"), 50, Value::Null)]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MalformedPlayerRecord {
                field: "selected_by_percent",
                ..
            }
        ));

        let err = PlayerPool::build(vec![raw(5, "Y", json!("NaN"), 50, json!("1"))]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MalformedPlayerRecord { field: "form", .. }
        ));
    }

    #[test]
    fn from_players_rejects_non_finite_metrics() {
        let player = |id: u32, form: f64, ownership: f64| Player {
            id,
            name: format!("P{id}"),
            form,
            cost: 50,
            ownership,
        };

        let err = PlayerPool::from_players(vec![player(1, 3.0, 1.0), player(2, f64::NAN, 1.0)])
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MalformedPlayerRecord {
                player_id: Some(2),
                field: "form",
                value: "NaN".to_string(),
            }
        );

        let err = PlayerPool::from_players(vec![player(3, 3.0, f64::INFINITY)]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MalformedPlayerRecord {
                player_id: Some(3),
                field: "selected_by_percent",
                ..
            }
        ));
    }

    #[test]
    fn malformed_ownership_reports_its_own_value() {
        let err =
            PlayerPool::build(vec![raw(6, "Z", json!("2.0"), 50, json!("lots"))]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MalformedPlayerRecord {
                player_id: Some(6),
                field: "selected_by_percent",
                value: "lots".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = PlayerPool::build(vec![
            raw(1, "A", json!("1"), 40, json!("1")),
            raw(1, "B", json!("2"), 40, json!("1")),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MalformedPlayerRecord { field: "id", .. }
        ));
    }
}
