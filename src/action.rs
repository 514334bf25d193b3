use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::PokemonRecord;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    NavNextId,
    NavPrevId,
    NavNextInfo,
    NavPrevInfo,

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    PokemonDidLoad(PokemonRecord),
    PokemonDidError { query: String, error: String },
    SpriteDidLoad { id: u32, sprite: SpriteData },
    SpriteDidError { id: u32, error: String },

    PlayCry,
    CryDidPlay,
    CryDidSkip,
    CryDidError(String),

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
