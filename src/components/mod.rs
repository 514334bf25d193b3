pub mod pokedex_screen;
pub mod sprite_view;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use pokedex_screen::{PokedexScreen, PokedexScreenProps};
pub use sprite_view::{sprite_fit, SpriteView, SpriteViewProps};
