//! Panel text for the current record

use crate::state::{InfoCategory, PokemonRecord};

pub const NO_SELECTION: &str = "No Pokémon selected";
pub const NOT_FOUND_HEADER: &str = "Error: Pokémon not found";
pub const MOVES_SHOWN: usize = 5;
pub const MOVES_TRAILER: &str = "(showing first 5 moves)";

pub fn render_header(record: &PokemonRecord) -> String {
    format!("#{} {}", record.id, record.name)
}

pub fn render_info(record: Option<&PokemonRecord>, category: InfoCategory) -> String {
    let Some(record) = record else {
        return NO_SELECTION.to_string();
    };

    let lines: Vec<String> = match category {
        InfoCategory::Basic => vec![
            format!("Height: {}", record.height),
            format!("Weight: {}", record.weight),
        ],
        InfoCategory::Stats => std::iter::once("Stats:".to_string())
            .chain(
                record
                    .stats
                    .iter()
                    .map(|stat| format!("{}: {}", stat.name, stat.value)),
            )
            .collect(),
        InfoCategory::Abilities => std::iter::once("Abilities:".to_string())
            .chain(record.abilities.iter().map(|ability| format!("- {ability}")))
            .collect(),
        InfoCategory::Moves => std::iter::once("Moves:".to_string())
            .chain(
                record
                    .moves
                    .iter()
                    .take(MOVES_SHOWN)
                    .map(|name| format!("- {name}")),
            )
            .chain(std::iter::once(MOVES_TRAILER.to_string()))
            .collect(),
    };
    lines.join("\n")
}
