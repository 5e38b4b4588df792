use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the score sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    #[serde(rename = "G", default, deserialize_with = "trimmed_string")]
    pub scorer: String,
    #[serde(rename = "A1", default, deserialize_with = "name_or_none")]
    pub assist1: Option<String>,
    #[serde(rename = "A2", default, deserialize_with = "name_or_none")]
    pub assist2: Option<String>,
    #[serde(rename = "Date", default)]
    pub date: String,
    #[serde(rename = "Opponent", default)]
    pub opponent: String,
}

impl GoalRecord {
    pub fn new(scorer: &str, assist1: Option<&str>, assist2: Option<&str>) -> Self {
        Self {
            scorer: scorer.trim().to_string(),
            assist1: assist1.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
            assist2: assist2.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
            date: String::new(),
            opponent: String::new(),
        }
    }

    pub fn with_game(mut self, date: &str, opponent: &str) -> Self {
        self.date = date.to_string();
        self.opponent = opponent.to_string();
        self
    }

    /// Everyone credited on the goal, scorer first, absent or empty names skipped.
    pub fn point_getters(&self) -> impl Iterator<Item = &str> {
        std::iter::once(Some(self.scorer.as_str()))
            .chain([self.assist1.as_deref(), self.assist2.as_deref()])
            .flatten()
            .filter(|name| !name.is_empty())
    }

    pub fn is_unassisted(&self) -> bool {
        self.assists().next().is_none()
    }

    pub fn assists(&self) -> impl Iterator<Item = &str> {
        [self.assist1.as_deref(), self.assist2.as_deref()]
            .into_iter()
            .flatten()
            .filter(|name| !name.is_empty())
    }

    pub fn credits(&self, player: &str) -> bool {
        self.point_getters().any(|name| name == player)
    }
}

pub fn load_goal_records(path: &Path) -> Result<Vec<GoalRecord>> {
    let file = File::open(path).with_context(|| format!("open goal csv {}", path.display()))?;
    let records =
        parse_goal_records(file).with_context(|| format!("parse goal csv {}", path.display()))?;
    debug!("loaded {} goals from {}", records.len(), path.display());
    Ok(records)
}

/// Reads `G,A1,A2,Date,Opponent` rows. Short rows are padded with empty
/// fields, so missing columns read as absent; rows that still fail to
/// decode are skipped.
pub fn parse_goal_records<R: Read>(rdr: R) -> Result<Vec<GoalRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader.headers().context("read goal csv header")?.clone();
    let mut out = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let mut row = row.context("read goal csv row")?;
        while row.len() < headers.len() {
            row.push_field("");
        }
        match row.deserialize::<GoalRecord>(Some(&headers)) {
            Ok(record) => out.push(record),
            Err(err) => warn!("skipping goal row {}: {err}", idx + 1),
        }
    }
    Ok(out)
}

fn trimmed_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()).unwrap_or_default())
}

fn name_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_assist_cells_are_none() {
        let raw = "G,A1,A2,Date,Opponent\nCrosby,,,10/5,Flyers\nMalkin,Kessel, ,10/7,Rangers\n";
        let rows = parse_goal_records(raw.as_bytes()).expect("csv should parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].assist1, None);
        assert_eq!(rows[0].assist2, None);
        assert!(rows[0].is_unassisted());
        assert_eq!(rows[1].assist1.as_deref(), Some("Kessel"));
        assert_eq!(rows[1].assist2, None);
        assert_eq!(rows[1].opponent, "Rangers");
    }

    #[test]
    fn short_rows_read_as_missing_fields() {
        let raw = "G,A1,A2,Date,Opponent\nLetang,Crosby\n";
        let rows = parse_goal_records(raw.as_bytes()).expect("csv should parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].scorer, "Letang");
        assert_eq!(rows[0].assist1.as_deref(), Some("Crosby"));
        assert_eq!(rows[0].assist2, None);
        assert!(rows[0].date.is_empty());
    }

    #[test]
    fn scorer_only_and_partial_rows() {
        let raw = "G,A1,A2,Date,Opponent\nLetang\nCrosby,Guentzel,,10/1\n";
        let rows = parse_goal_records(raw.as_bytes()).expect("csv should parse");
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_unassisted());
        assert_eq!(rows[1].assist1.as_deref(), Some("Guentzel"));
        assert_eq!(rows[1].date, "10/1");
        assert!(rows[1].opponent.is_empty());
    }

    #[test]
    fn new_trims_names_like_csv_ingest() {
        let rec = GoalRecord::new(" ", Some("  "), Some(" Malkin "));
        assert!(rec.scorer.is_empty());
        assert_eq!(rec.assist1, None);
        assert_eq!(rec.assist2.as_deref(), Some("Malkin"));
        assert_eq!(rec.point_getters().collect::<Vec<_>>(), vec!["Malkin"]);
    }

    #[test]
    fn point_getters_skip_empty_scorer() {
        let rec = GoalRecord::new("", Some("Dumoulin"), None);
        let names: Vec<&str> = rec.point_getters().collect();
        assert_eq!(names, vec!["Dumoulin"]);
        assert!(!rec.is_unassisted());
    }

    #[test]
    fn credits_matches_any_point_getter() {
        let rec = GoalRecord::new("Hornqvist", Some("Crosby"), Some("Letang"));
        assert!(rec.credits("Letang"));
        assert!(rec.credits("Hornqvist"));
        assert!(!rec.credits("Malkin"));
    }
}
