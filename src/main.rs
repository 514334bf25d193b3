//! Pokedex TUI - tui-dispatch client for PokeAPI

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api::{ClientConfig, PokeClient, API_BASE};
use pokedex::audio::RodioOutput;
use pokedex::components::{Component, PokedexScreen, PokedexScreenProps};
use pokedex::effect::Effect;
use pokedex::logging;
use pokedex::reducer::reducer;
use pokedex::services::Services;
use pokedex::sprite_backend::{self, SpriteBackend};
use pokedex::state::{AppState, TICK_MS};

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Pokedex TUI backed by PokeAPI")]
struct Args {
    /// Dex number shown at startup
    #[arg(long, short, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    start: u32,

    /// Base URL of the pokemon endpoint
    #[arg(long, default_value = API_BASE)]
    api_base: String,

    /// Per-request HTTP timeout in seconds (minimum 1)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Append tracing output to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DexComponentId {
    Screen,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DexContext {
    Main,
    Search,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        Some(DexComponentId::Screen)
    }

    fn modal(&self) -> Option<DexComponentId> {
        None
    }

    fn binding_context(&self, _id: DexComponentId) -> DexContext {
        if self.search.active {
            DexContext::Search
        } else {
            DexContext::Main
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        start,
        api_base,
        timeout_secs,
        log_file,
        debug: debug_args,
    } = Args::parse();

    let _log_guard = match log_file.as_deref() {
        Some(path) => Some(logging::init(path)?),
        None => None,
    };

    let client = PokeClient::new(ClientConfig {
        base_url: api_base,
        timeout: Duration::from_secs(timeout_secs),
    })
    .map_err(io::Error::other)?;
    tracing::info!(base = client.base_url(), start, "starting pokedex");
    let services = Services::new(client, RodioOutput);

    let debug = DebugSession::new(debug_args);
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(start))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = SpriteBackend::new(stdout, sprite_backend::sprite_slot());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, services, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("pokedex closed");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

struct DexUi {
    screen: PokedexScreen,
}

impl DexUi {
    fn new() -> Self {
        Self {
            screen: PokedexScreen::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        event_ctx.set_component_area(DexComponentId::Screen, area);
        let props = PokedexScreenProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.screen.render(frame, area, props);
    }

    fn handle_screen_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = PokedexScreenProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.screen.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    services: Services,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_screen = Rc::clone(&ui);
    bus.register(DexComponentId::Screen, move |event, state| {
        ui_screen
            .borrow_mut()
            .handle_screen_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect: Effect, ctx: &mut EffectContext<Action>| services.handle(effect, ctx),
        )
        .await
}
