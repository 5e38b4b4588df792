use std::collections::VecDeque;

use crate::data_mapper::{ChordEdge, DataMapper};
use crate::error::MapperError;
use crate::palette::ArcColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Players,
    Chords,
}

/// Selection and highlight state of the terminal chord browser.
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub players: Vec<String>,
    pub colors: Vec<ArcColor>,
    pub chords: Vec<ChordEdge>,
    pub focus: Focus,
    pub selected_player: usize,
    pub selected_chord: usize,
    /// Player whose chords stay lit; every other chord is faded.
    pub highlighted: Option<usize>,
    pub help_overlay: bool,
    pub total_goals: usize,
    pub last_update: Option<String>,
    pub logs: VecDeque<String>,
}

impl ViewerState {
    pub fn from_mapper(mapper: &DataMapper, colors: Vec<ArcColor>) -> Result<Self, MapperError> {
        let players = mapper
            .players()?
            .iter()
            .map(|p| p.name.clone())
            .collect::<Vec<_>>();
        let mut state = Self {
            players,
            colors,
            chords: mapper.chords()?,
            focus: Focus::Players,
            selected_player: 0,
            selected_chord: 0,
            highlighted: None,
            help_overlay: false,
            total_goals: mapper.total_goal_count(),
            last_update: mapper.last_update().ok(),
            logs: VecDeque::new(),
        };
        state.push_log(format!(
            "[INFO] {} players, {} chords ({})",
            state.players.len(),
            state.chords.len(),
            mapper.mode()
        ));
        Ok(state)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Players => Focus::Chords,
            Focus::Chords => Focus::Players,
        };
        self.clamp_selection();
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Players => {
                self.selected_player = step_forward(self.selected_player, self.players.len());
            }
            Focus::Chords => {
                self.selected_chord = step_forward(self.selected_chord, self.visible_chords().len());
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            Focus::Players => {
                self.selected_player = step_back(self.selected_player, self.players.len());
            }
            Focus::Chords => {
                self.selected_chord = step_back(self.selected_chord, self.visible_chords().len());
            }
        }
    }

    /// Highlights the selected player's chords, or clears the highlight
    /// when that player is already highlighted.
    pub fn toggle_highlight(&mut self) {
        if self.players.is_empty() {
            return;
        }
        if self.highlighted == Some(self.selected_player) {
            self.highlighted = None;
            self.push_log("[INFO] Highlight cleared");
        } else {
            self.highlighted = Some(self.selected_player);
            let name = self.players[self.selected_player].clone();
            self.push_log(format!("[INFO] Highlighting {name}"));
        }
        self.selected_chord = 0;
    }

    /// A click on a player arc: select it, then toggle its highlight.
    pub fn click_player(&mut self, index: usize) {
        if index >= self.players.len() {
            return;
        }
        self.focus = Focus::Players;
        self.selected_player = index;
        self.toggle_highlight();
    }

    pub fn is_faded(&self, chord: &ChordEdge) -> bool {
        self.highlighted.is_some_and(|idx| !chord.touches(idx))
    }

    pub fn visible_chords(&self) -> Vec<&ChordEdge> {
        self.chords.iter().filter(|c| !self.is_faded(c)).collect()
    }

    pub fn selected_chord(&self) -> Option<ChordEdge> {
        self.visible_chords().get(self.selected_chord).copied().copied()
    }

    pub fn player_color(&self, index: usize) -> Option<ArcColor> {
        self.colors.get(index).copied()
    }

    pub fn clamp_selection(&mut self) {
        if self.selected_player >= self.players.len() {
            self.selected_player = self.players.len().saturating_sub(1);
        }
        let visible = self.visible_chords().len();
        if self.selected_chord >= visible {
            self.selected_chord = visible.saturating_sub(1);
        }
    }
}

fn step_forward(current: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    (current + 1) % total
}

fn step_back(current: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    if current == 0 { total - 1 } else { current - 1 }
}
