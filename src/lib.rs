//! Pokedex TUI - PokeAPI lookups, sprites and cries on tui-dispatch
//!
//! This library exposes the app's modules for testing.

pub mod action;
pub mod api;
pub mod audio;
pub mod components;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod render;
pub mod services;
pub mod sprite;
pub mod sprite_backend;
pub mod state;
