use crate::api::PokemonQuery;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadPokemon { query: PokemonQuery },
    LoadSprite { id: u32, url: String },
    PlayCry { request: u64, url: String },
}
