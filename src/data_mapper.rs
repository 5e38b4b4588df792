use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::MapperError;
use crate::format::{self, ChordInfo};
use crate::goal_record::GoalRecord;

/// How shared appearances on a score sheet turn into connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionMode {
    /// Every pair of credited players on a goal is connected, assisters included.
    #[default]
    AllCredited,
    /// The scorer is connected to each assister; assisters are never
    /// connected to each other.
    ScorerAssist,
}

impl FromStr for ConnectionMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" | "all-credited" | "pairwise" => Ok(Self::AllCredited),
            "scorer-assist" | "scorer" => Ok(Self::ScorerAssist),
            other => Err(format!(
                "unknown connection mode '{other}' (expected 'all' or 'scorer-assist')"
            )),
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllCredited => f.write_str("all"),
            Self::ScorerAssist => f.write_str("scorer-assist"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerEntry {
    pub name: String,
    /// Connection count towards every player, indexed by player order.
    pub connections: Vec<u32>,
    pub goals: u32,
    pub points: u32,
    pub goal_share: f64,
    pub involvement_share: f64,
}

/// A directed edge between two player arcs, weighted by the source side's
/// connection count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChordEdge {
    pub source: usize,
    pub target: usize,
    pub value: u32,
}

impl ChordEdge {
    pub fn is_self(&self) -> bool {
        self.source == self.target
    }

    pub fn touches(&self, index: usize) -> bool {
        self.source == index || self.target == index
    }
}

#[derive(Debug)]
struct PlayerNetwork {
    players: Vec<PlayerEntry>,
    by_name: HashMap<String, usize>,
}

/// Owns one session's score sheet and the assist network derived from it.
/// The network is built on first query and kept until the source changes.
#[derive(Debug, Default)]
pub struct DataMapper {
    source: Option<Vec<GoalRecord>>,
    total_goal_count: usize,
    mode: ConnectionMode,
    network: OnceCell<PlayerNetwork>,
}

impl DataMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: ConnectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ConnectionMode) {
        if self.mode != mode {
            self.mode = mode;
            self.network = OnceCell::new();
        }
    }

    pub fn set_source(&mut self, records: Vec<GoalRecord>) {
        self.total_goal_count = records.len();
        self.source = Some(records);
        self.network = OnceCell::new();
    }

    pub fn source(&self) -> Option<&[GoalRecord]> {
        self.source.as_deref()
    }

    pub fn total_goal_count(&self) -> usize {
        self.total_goal_count
    }

    pub fn player_matrix(&self) -> Result<Vec<Vec<u32>>, MapperError> {
        let network = self.network()?;
        Ok(network
            .players
            .iter()
            .map(|p| p.connections.clone())
            .collect())
    }

    pub fn player_count(&self) -> Result<usize, MapperError> {
        Ok(self.network()?.players.len())
    }

    pub fn players(&self) -> Result<&[PlayerEntry], MapperError> {
        Ok(&self.network()?.players)
    }

    pub fn player(&self, index: usize) -> Result<&PlayerEntry, MapperError> {
        let players = &self.network()?.players;
        players.get(index).ok_or(MapperError::UnknownPlayer {
            index,
            players: players.len(),
        })
    }

    pub fn player_name(&self, index: usize) -> Result<&str, MapperError> {
        Ok(self.player(index)?.name.as_str())
    }

    pub fn index_of(&self, name: &str) -> Result<Option<usize>, MapperError> {
        Ok(self.network()?.by_name.get(name).copied())
    }

    /// `"<date> against <opponent>"` for the last goal as stored.
    pub fn last_update(&self) -> Result<String, MapperError> {
        let records = self.source.as_ref().ok_or(MapperError::SourceNotSet)?;
        let last = records.last().ok_or(MapperError::EmptySource)?;
        Ok(format!("{} against {}", last.date, last.opponent))
    }

    pub fn player_info(&self, index: usize) -> Result<String, MapperError> {
        Ok(format::player_info_text(self.player(index)?))
    }

    pub fn chord_details(&self, edge: &ChordEdge) -> Result<ChordInfo, MapperError> {
        let source = self.player(edge.source)?;
        let target = self.player(edge.target)?;

        if edge.is_self() {
            return Ok(ChordInfo::Unassisted {
                name: source.name.clone(),
                share: format::share(edge.value, source.points),
            });
        }

        Ok(ChordInfo::Shared {
            source_name: source.name.clone(),
            target_name: target.name.clone(),
            source_share: format::share(edge.value, source.points),
            target_share: format::share(edge.value, target.points),
        })
    }

    pub fn chord_info(&self, edge: &ChordEdge) -> Result<String, MapperError> {
        Ok(format::chord_info_text(&self.chord_details(edge)?))
    }

    /// Non-zero chords of the upper triangle (self chords included),
    /// heaviest first.
    pub fn chords(&self) -> Result<Vec<ChordEdge>, MapperError> {
        let players = &self.network()?.players;
        let mut out = Vec::new();
        for (i, row) in players.iter().enumerate() {
            for (j, &value) in row.connections.iter().enumerate().skip(i) {
                if value > 0 {
                    out.push(ChordEdge {
                        source: i,
                        target: j,
                        value,
                    });
                }
            }
        }
        out.sort_by(|a, b| {
            b.value
                .cmp(&a.value)
                .then(a.source.cmp(&b.source))
                .then(a.target.cmp(&b.target))
        });
        Ok(out)
    }

    /// Other players this one has a connection with, strongest first.
    pub fn partners(&self, index: usize) -> Result<Vec<(usize, u32)>, MapperError> {
        let player = self.player(index)?;
        let mut out: Vec<(usize, u32)> = player
            .connections
            .iter()
            .enumerate()
            .filter(|&(j, &count)| j != index && count > 0)
            .map(|(j, &count)| (j, count))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(out)
    }

    /// Goals on which both players were credited, whatever their roles.
    pub fn shared_goals(&self, a: usize, b: usize) -> Result<u32, MapperError> {
        let first = self.player(a)?.name.as_str();
        let second = self.player(b)?.name.as_str();
        let records = self.source.as_deref().unwrap_or_default();
        let count = records
            .iter()
            .filter(|goal| goal.credits(first) && goal.credits(second))
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    fn network(&self) -> Result<&PlayerNetwork, MapperError> {
        let records = self.source.as_deref().ok_or(MapperError::SourceNotSet)?;
        Ok(self
            .network
            .get_or_init(|| build_network(records, self.mode, self.total_goal_count)))
    }
}

fn build_network(records: &[GoalRecord], mode: ConnectionMode, total: usize) -> PlayerNetwork {
    let (names, by_name) = collect_players(records);
    let n = names.len();
    let mut connections = vec![vec![0u32; n]; n];
    let mut goals = vec![0u32; n];
    let mut points = vec![0u32; n];

    for goal in records {
        let credited = credited_indices(goal, &by_name);
        let scorer = by_name.get(goal.scorer.as_str()).copied();

        if let Some(s) = scorer {
            goals[s] += 1;
        }
        for &p in &credited {
            points[p] += 1;
        }

        match (scorer, goal.is_unassisted()) {
            (Some(s), true) => connections[s][s] += 1,
            _ => match mode {
                ConnectionMode::AllCredited => {
                    for &p in &credited {
                        for &q in &credited {
                            if p != q {
                                connections[p][q] += 1;
                            }
                        }
                    }
                }
                ConnectionMode::ScorerAssist => {
                    let Some(s) = scorer else { continue };
                    for &a in credited.iter().filter(|&&a| a != s) {
                        connections[s][a] += 1;
                        connections[a][s] += 1;
                    }
                }
            },
        }
    }

    let total = u32::try_from(total).unwrap_or(u32::MAX);
    let players: Vec<PlayerEntry> = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| PlayerEntry {
            name,
            connections: std::mem::take(&mut connections[i]),
            goals: goals[i],
            points: points[i],
            goal_share: format::share(goals[i], total),
            involvement_share: format::share(points[i], total),
        })
        .collect();

    info!(
        "built assist network: {} players from {} goals ({mode})",
        players.len(),
        records.len()
    );
    PlayerNetwork { players, by_name }
}

/// Distinct names in order of first appearance on the score sheet.
fn collect_players(records: &[GoalRecord]) -> (Vec<String>, HashMap<String, usize>) {
    let mut names = Vec::new();
    let mut by_name = HashMap::new();
    for name in records.iter().flat_map(GoalRecord::point_getters) {
        if !by_name.contains_key(name) {
            by_name.insert(name.to_string(), names.len());
            names.push(name.to_string());
        }
    }
    debug!("collected {} distinct players", names.len());
    (names, by_name)
}

/// Player indices credited on a goal, each at most once.
fn credited_indices(goal: &GoalRecord, by_name: &HashMap<String, usize>) -> Vec<usize> {
    let mut out: Vec<usize> = Vec::with_capacity(3);
    for idx in goal.point_getters().filter_map(|name| by_name.get(name).copied()) {
        if !out.contains(&idx) {
            out.push(idx);
        }
    }
    out
}
