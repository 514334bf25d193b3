//! Application state - the current record, info cursor and rendered panels

use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::render;
use crate::sprite::SpriteData;

/// Highest national dex number; lookups below 1 wrap to it.
pub const MAX_POKEMON_ID: u32 = 1025;

/// Tick interval for the loading indicator.
pub const TICK_MS: u64 = 90;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub sprite_url: Option<String>,
    pub cry_url: Option<String>,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub moves: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub name: String,
    pub value: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfoCategory {
    #[default]
    Basic,
    Stats,
    Abilities,
    Moves,
}

impl InfoCategory {
    pub const ALL: [InfoCategory; 4] = [
        InfoCategory::Basic,
        InfoCategory::Stats,
        InfoCategory::Abilities,
        InfoCategory::Moves,
    ];

    pub fn index(self) -> usize {
        match self {
            InfoCategory::Basic => 0,
            InfoCategory::Stats => 1,
            InfoCategory::Abilities => 2,
            InfoCategory::Moves => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InfoCategory::Basic => "Basic",
            InfoCategory::Stats => "Stats",
            InfoCategory::Abilities => "Abilities",
            InfoCategory::Moves => "Moves",
        }
    }

    pub fn step(self, direction: CycleDirection) -> Self {
        let len = Self::ALL.len();
        let index = match direction {
            CycleDirection::Next => (self.index() + 1) % len,
            CycleDirection::Prev => (self.index() + len - 1) % len,
        };
        Self::ALL[index]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleDirection {
    Next,
    Prev,
}

/// The single current record and the info cursor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    current: Option<PokemonRecord>,
    cursor: InfoCategory,
}

impl DisplayState {
    pub fn set_current(&mut self, record: Option<PokemonRecord>) {
        self.current = record;
    }

    pub fn current(&self) -> Option<&PokemonRecord> {
        self.current.as_ref()
    }

    pub fn cursor(&self) -> InfoCategory {
        self.cursor
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = InfoCategory::Basic;
    }

    pub fn cycle_info(&mut self, direction: CycleDirection) {
        self.cursor = self.cursor.step(direction);
    }
}

/// What the header, info and sprite panels last showed.
///
/// Failed lookups only touch the header, so the other two can go stale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Panels {
    pub header: String,
    pub info: String,
    pub sprite: Option<SpriteData>,
}

impl Default for Panels {
    fn default() -> Self {
        Self {
            header: "Pokémon Name".to_string(),
            info: "Height: \nWeight: ".to_string(),
            sprite: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub start_id: u32,
    pub display: DisplayState,
    pub panels: Panels,
    pub search: SearchState,
    pub lookup_loading: bool,
    pub sprite_loading: bool,
    pub cry_requests: u64,
    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            terminal_size: (80, 24),
            start_id: 1,
            display: DisplayState::default(),
            panels: Panels::default(),
            search: SearchState::default(),
            lookup_loading: false,
            sprite_loading: false,
            cry_requests: 0,
            message: None,
            tick: 0,
        }
    }
}

impl AppState {
    pub fn new(start_id: u32) -> Self {
        Self {
            start_id,
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<&PokemonRecord> {
        self.display.current()
    }

    pub fn current_id(&self) -> Option<u32> {
        self.current().map(|record| record.id)
    }

    /// Re-render the info panel from the current record and cursor.
    pub fn refresh_info(&mut self) {
        self.panels.info = render::render_info(self.display.current(), self.display.cursor());
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Record")
                .entry("id", ron_string(&self.current_id()))
                .entry(
                    "name",
                    ron_string(&self.current().map(|record| record.name.clone())),
                )
                .entry("category", ron_string(&self.display.cursor())),
            DebugSection::new("Panels")
                .entry("header", ron_string(&self.panels.header))
                .entry("sprite", ron_string(&self.panels.sprite.is_some())),
            DebugSection::new("Status")
                .entry("search", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("lookup_loading", ron_string(&self.lookup_loading))
                .entry("sprite_loading", ron_string(&self.sprite_loading))
                .entry("cry_requests", ron_string(&self.cry_requests))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
