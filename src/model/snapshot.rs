use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::PlayerList;

/// Everything produced by one scrape run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub last_updated: DateTime<Utc>,
    /// Current-season roster.
    pub roster: PlayerList,
    /// Incoming players keyed by season label, in configured season order.
    /// Every requested season has an entry, empty when nothing could be scraped.
    pub recruiting: IndexMap<String, PlayerList>,
}

impl RosterSnapshot {
    /// True when neither the roster nor any recruiting season has players.
    pub fn is_empty(&self) -> bool {
        self.roster.is_empty() && self.recruiting.values().all(Vec::is_empty)
    }

    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            roster: self.roster.len(),
            recruiting: self
                .recruiting
                .iter()
                .map(|(season, players)| (season.clone(), players.len()))
                .collect(),
        }
    }
}

/// Player counts for the operator-facing run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub roster: usize,
    pub recruiting: Vec<(String, usize)>,
}

impl std::fmt::Display for SnapshotSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scraped {} players for the main roster.", self.roster)?;
        for (season, count) in &self.recruiting {
            write!(f, "\nScraped {count} recruits for the {season} season.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlayerRecord;

    fn player(name: &str) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn snapshot(roster: PlayerList, recruiting: &[(&str, PlayerList)]) -> RosterSnapshot {
        RosterSnapshot {
            last_updated: Utc::now(),
            roster,
            recruiting: recruiting
                .iter()
                .map(|(s, p)| (s.to_string(), p.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_is_empty() {
        assert!(snapshot(vec![], &[("2026-2027", vec![]), ("2027-2028", vec![])]).is_empty());
        assert!(!snapshot(vec![], &[("2026-2027", vec![player("A")])]).is_empty());
        assert!(!snapshot(vec![player("A")], &[]).is_empty());
    }

    #[test]
    fn test_summary_keeps_season_order() {
        let snap = snapshot(
            vec![player("A"), player("B")],
            &[("2028-2029", vec![]), ("2026-2027", vec![player("C")])],
        );
        let summary = snap.summary();
        assert_eq!(summary.roster, 2);
        assert_eq!(
            summary.recruiting,
            vec![("2028-2029".to_string(), 0), ("2026-2027".to_string(), 1)]
        );
        assert_eq!(
            summary.to_string(),
            "Scraped 2 players for the main roster.\n\
             Scraped 0 recruits for the 2028-2029 season.\n\
             Scraped 1 recruits for the 2026-2027 season."
        );
    }

    #[test]
    fn test_serialized_shape() {
        let snap = snapshot(
            vec![player("A")],
            &[("2027-2028", vec![]), ("2026-2027", vec![])],
        );
        let value = serde_json::to_value(&snap).unwrap();

        assert!(value["last_updated"].is_string());
        assert_eq!(value["roster"][0]["name"], "A");
        assert_eq!(value["roster"][0]["player_link"], "");
        assert_eq!(value["recruiting"]["2026-2027"], serde_json::json!([]));

        let text = serde_json::to_string(&snap).unwrap();
        let later = text.find("\"2027-2028\"").unwrap();
        let earlier = text.find("\"2026-2027\"").unwrap();
        assert!(later < earlier, "seasons reordered in {text}");
    }
}
