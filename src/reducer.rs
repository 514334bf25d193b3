use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::api::PokemonQuery;
use crate::effect::Effect;
use crate::render;
use crate::state::{AppState, CycleDirection, PokemonRecord};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.message = None;
            let query = PokemonQuery::Id(i64::from(state.start_id));
            lookup(state, query)
        }

        Action::NavNextId => step_id(state, 1),
        Action::NavPrevId => step_id(state, -1),

        Action::NavNextInfo => cycle_info(state, CycleDirection::Next),
        Action::NavPrevInfo => cycle_info(state, CycleDirection::Prev),

        Action::SearchStart => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.query.push(ch);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            state.search.active = false;
            let text = std::mem::take(&mut state.search.query);
            if text.trim().is_empty() {
                return DispatchResult::changed();
            }
            lookup(state, PokemonQuery::parse(&text))
        }

        Action::PokemonDidLoad(record) => {
            state.lookup_loading = false;
            state.message = None;
            let effects = show_record(state, record);
            if effects.is_empty() {
                DispatchResult::changed()
            } else {
                DispatchResult::changed_with_many(effects)
            }
        }

        Action::PokemonDidError { query, error } => {
            state.lookup_loading = false;
            state.sprite_loading = false;
            state.display.set_current(None);
            // Info and sprite panels keep whatever they last showed.
            state.panels.header = render::NOT_FOUND_HEADER.to_string();
            state.message = Some(format!("{query}: {error}"));
            DispatchResult::changed()
        }

        Action::SpriteDidLoad { id, sprite } => {
            if state.current_id() != Some(id) {
                return DispatchResult::unchanged();
            }
            state.sprite_loading = false;
            state.panels.sprite = Some(sprite);
            DispatchResult::changed()
        }

        Action::SpriteDidError { id, error } => {
            if state.current_id() != Some(id) {
                return DispatchResult::unchanged();
            }
            state.sprite_loading = false;
            state.message = Some(format!("Sprite error: {error}"));
            DispatchResult::changed()
        }

        Action::PlayCry => {
            let Some(record) = state.current() else {
                return DispatchResult::unchanged();
            };
            let Some(url) = record.cry_url.clone() else {
                state.message = Some(format!("No cry available for {}.", record.name));
                return DispatchResult::changed();
            };
            state.cry_requests += 1;
            DispatchResult::changed_with(Effect::PlayCry {
                request: state.cry_requests,
                url,
            })
        }

        Action::CryDidPlay | Action::CryDidSkip => DispatchResult::unchanged(),

        Action::CryDidError(error) => {
            state.message = Some(format!("Cry error: {error}"));
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            if !(state.lookup_loading || state.sprite_loading) {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn lookup(state: &mut AppState, query: PokemonQuery) -> DispatchResult<Effect> {
    state.lookup_loading = true;
    DispatchResult::changed_with(Effect::LoadPokemon { query })
}

fn step_id(state: &mut AppState, delta: i64) -> DispatchResult<Effect> {
    let Some(id) = state.current_id() else {
        return DispatchResult::unchanged();
    };
    lookup(state, PokemonQuery::Id(i64::from(id) + delta))
}

fn cycle_info(state: &mut AppState, direction: CycleDirection) -> DispatchResult<Effect> {
    state.display.cycle_info(direction);
    state.refresh_info();
    DispatchResult::changed()
}

fn show_record(state: &mut AppState, record: PokemonRecord) -> Vec<Effect> {
    state.panels.header = render::render_header(&record);
    let sprite = record.sprite_url.clone();
    let id = record.id;
    state.display.set_current(Some(record));
    state.display.reset_cursor();
    state.refresh_info();

    match sprite {
        Some(url) => {
            state.sprite_loading = true;
            vec![Effect::LoadSprite { id, url }]
        }
        None => {
            state.sprite_loading = false;
            state.panels.sprite = None;
            Vec::new()
        }
    }
}
