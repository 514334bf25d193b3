use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::Frame;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Paragraph, Wrap};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::sprite::{self, SpriteData};
use crate::sprite_backend;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;
const TEXT_DIM: Color = Color::Rgb(40, 60, 80);

pub struct SpriteViewProps<'a> {
    pub sprite: Option<&'a SpriteData>,
    pub loading: bool,
}

/// Shows the last decoded sprite, or a placeholder when there is none.
#[derive(Default)]
pub struct SpriteView {
    cache: Option<EncodedSprite>,
}

/// The kitty sequence for one sprite at one cell size.
struct EncodedSprite {
    sprite: SpriteData,
    cols: u16,
    rows: u16,
    sequence: String,
}

impl SpriteView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `data` for a `cols` x `rows` box, reusing the last encoding
    /// while neither the sprite nor the box has changed.
    fn sequence_for(&mut self, data: &SpriteData, cols: u16, rows: u16) -> Result<&str, String> {
        let fresh = match &self.cache {
            Some(cached) => cached.cols != cols || cached.rows != rows || cached.sprite != *data,
            None => true,
        };
        if fresh {
            self.cache = None;
            let sequence = sprite::kitty_sequence(data, cols, rows)?;
            self.cache = Some(EncodedSprite {
                sprite: data.clone(),
                cols,
                rows,
                sequence,
            });
        }
        Ok(self
            .cache
            .as_ref()
            .map(|cached| cached.sequence.as_str())
            .unwrap_or_default())
    }
}

impl Component<Action> for SpriteView {
    type Props<'a> = SpriteViewProps<'a>;

    fn handle_event(
        &mut self,
        _event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: SpriteViewProps<'_>) {
        if let Some(data) = props.sprite {
            let (cols, rows) = sprite_fit(data, area.width, area.height);
            match self.sequence_for(data, cols, rows) {
                Ok(sequence) => {
                    let offset_x = area.x.saturating_add(area.width.saturating_sub(cols) / 2);
                    let offset_y = area.y.saturating_add(area.height.saturating_sub(rows) / 2);
                    sprite_backend::update_sprite(offset_x, offset_y, sequence.to_string());
                }
                Err(error) => {
                    tracing::debug!(%error, "sprite not drawable");
                    sprite_backend::clear_sprite();
                }
            }
            return;
        }

        sprite_backend::clear_sprite();
        let content = if props.loading { "[loading sprite]" } else { "" };
        let paragraph = Paragraph::new(content)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(paragraph, area);
    }
}

/// Largest cell box that keeps the sprite's aspect ratio inside the limits.
pub fn sprite_fit(sprite: &SpriteData, max_cols: u16, max_rows: u16) -> (u16, u16) {
    if max_cols == 0 || max_rows == 0 || sprite.height == 0 {
        return (max_cols, max_rows);
    }
    let image_ratio = sprite.width as f32 / sprite.height as f32;
    let cols_for_max_rows = image_ratio * max_rows as f32 * CELL_ASPECT;
    if cols_for_max_rows <= max_cols as f32 {
        let cols = cols_for_max_rows.max(1.0).round() as u16;
        return (cols.max(1), max_rows);
    }
    let rows_for_max_cols = max_cols as f32 / (image_ratio * CELL_ASPECT);
    let rows = rows_for_max_cols.max(1.0).round() as u16;
    (max_cols, rows.clamp(1, max_rows))
}
