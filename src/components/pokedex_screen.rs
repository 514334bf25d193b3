use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tui_dispatch::EventKind;
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use super::{Component, SpriteView, SpriteViewProps};
use crate::action::Action;
use crate::state::{AppState, InfoCategory};

const SHELL_RED: Color = Color::Rgb(220, 30, 30);
const SCREEN_BLUE: Color = Color::Rgb(100, 200, 255);
const TEXT_MAIN: Color = Color::Rgb(12, 18, 28);
const TEXT_DIM: Color = Color::Rgb(40, 60, 80);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct PokedexScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The whole dex: header, sprite, info panel, search line and key hints.
pub struct PokedexScreen {
    sprite: SpriteView,
    status_bar: StatusBar,
}

impl PokedexScreen {
    pub fn new() -> Self {
        Self {
            sprite: SpriteView::new(),
            status_bar: StatusBar::new(),
        }
    }
}

impl Default for PokedexScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for PokedexScreen {
    type Props<'a> = PokedexScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };

        if props.state.search.active {
            return match key.code {
                KeyCode::Esc => Some(Action::SearchCancel),
                KeyCode::Enter => Some(Action::SearchSubmit),
                KeyCode::Backspace => Some(Action::SearchBackspace),
                KeyCode::Char(ch) => Some(Action::SearchInput(ch)),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('k') | KeyCode::Up => Some(Action::NavPrevId),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NavNextId),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::NavPrevInfo),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NavNextInfo),
            KeyCode::Char('p') | KeyCode::Char(' ') => Some(Action::PlayCry),
            KeyCode::Char('/') => Some(Action::SearchStart),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: PokedexScreenProps<'_>) {
        let state = props.state;
        let shell = Block::default()
            .borders(Borders::ALL)
            .title(" POKÉDEX ")
            .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(SHELL_RED))
            .border_style(Style::default().fg(Color::White));
        let inner = shell.inner(area);
        frame.render_widget(shell, area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Min(6),    // Sprite
            Constraint::Length(9), // Info
            Constraint::Length(3), // Search
            Constraint::Length(3), // Hints
        ])
        .split(inner);

        render_header(frame, chunks[0], state);

        let screen = Block::default().style(Style::default().bg(SCREEN_BLUE));
        let sprite_area = screen.inner(chunks[1]);
        frame.render_widget(screen, chunks[1]);
        self.sprite.render(
            frame,
            sprite_area,
            SpriteViewProps {
                sprite: state.panels.sprite.as_ref(),
                loading: state.sprite_loading,
            },
        );

        render_info(frame, chunks[2], state);
        render_search(frame, chunks[3], state);
        render_hints(frame, chunks[4], state, &mut self.status_bar);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled(
        state.panels.header.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    if state.lookup_loading {
        let frame_index = (state.tick % SPINNER.len() as u64) as usize;
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            SPINNER[frame_index],
            Style::default().fg(ACCENT_GOLD),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn render_info(frame: &mut Frame, area: Rect, state: &AppState) {
    let cursor = state.display.cursor();
    let title = Line::from(
        InfoCategory::ALL
            .iter()
            .map(|category| {
                let style = if *category == cursor {
                    Style::default()
                        .fg(ACCENT_GOLD)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(TEXT_DIM)
                };
                Span::styled(format!(" {} ", category.label()), style)
            })
            .collect::<Vec<_>>(),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(SCREEN_BLUE).fg(TEXT_MAIN));
    frame.render_widget(
        Paragraph::new(Text::from(state.panels.info.as_str()))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let (text, style) = if state.search.active {
        (
            format!("{}_", state.search.query),
            Style::default().fg(Color::White),
        )
    } else {
        (
            "Enter Pokémon name...".to_string(),
            Style::default().fg(Color::Gray),
        )
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("SEARCH")
        .border_style(if state.search.active {
            Style::default().fg(ACCENT_GOLD)
        } else {
            Style::default().fg(Color::White)
        });
    frame.render_widget(Paragraph::new(text).style(style).block(block), area);
}

fn render_hints(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_default();
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let hints = if state.search.active {
        vec![
            StatusBarHint::new("Enter", "Search"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ]
    } else {
        vec![
            StatusBarHint::new("j/k", "ID"),
            StatusBarHint::new("h/l", "Info"),
            StatusBarHint::new("p", "Cry"),
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("q", "Quit"),
        ]
    };

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(Color::White),
                focused_style: None,
            }),
            padding: Padding::xy(1, 0),
            bg: Some(SHELL_RED),
            fg: Some(Color::White),
        },
        text: Style::default().fg(Color::White),
        hint_key: Style::default()
            .fg(ACCENT_GOLD)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(Color::White),
        separator: Style::default().fg(Color::White),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::empty(),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}
