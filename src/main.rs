use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pipdex::action::Action;
use pipdex::api::{self, HttpSource, Transport};
use pipdex::audio::{self, SoundBank};
use pipdex::effect::Effect;
use pipdex::loader::{self, FailurePolicy, LoadOptions};
use pipdex::logging;
use pipdex::reducer::reducer;
use pipdex::state::{AppState, Tab};
use pipdex::ui::{PipComponentId, PipContext, PipUi};

#[derive(Parser, Debug)]
#[command(name = "pipdex")]
#[command(about = "Pip-Boy styled creature catalog backed by PokeAPI")]
struct Args {
    #[command(flatten)]
    config: RuntimeConfig,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(clap::Args, Debug, Clone)]
struct RuntimeConfig {
    /// Number of catalog entries to load
    #[arg(long, default_value_t = api::CATALOG_SIZE)]
    limit: usize,

    /// PokeAPI base URL
    #[arg(long, default_value = api::API_BASE)]
    api_base: String,

    /// Entry fetch chains allowed in flight at once
    #[arg(long, default_value_t = loader::DEFAULT_CONCURRENCY, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    concurrency: usize,

    /// Per-request timeout in seconds (0 disables)
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Drop entries that fail to load instead of failing the whole catalog
    #[arg(long)]
    isolate_failures: bool,

    /// Cache HTTP responses on disk
    #[arg(long)]
    cache: bool,

    /// Directory holding pipboy-{click,tab,select,deny}.wav. No clips ship
    /// with pipdex; missing ones are skipped with a warning in the log
    #[arg(long, default_value = "assets/sounds")]
    sound_dir: PathBuf,

    /// Playback volume between 0.0 and 1.0
    #[arg(long, default_value_t = 0.5)]
    volume: f32,

    /// Start with sound muted
    #[arg(long)]
    muted: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl RuntimeConfig {
    fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            api_base: self.api_base.clone(),
            limit: self.limit,
            concurrency: self.concurrency,
            request_timeout: self.request_timeout(),
            policy: if self.isolate_failures {
                FailurePolicy::Isolate
            } else {
                FailurePolicy::AllOrNothing
            },
        }
    }
}

struct EffectEnv {
    transport: Arc<dyn Transport>,
    sounds: Arc<SoundBank>,
    options: LoadOptions,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let config = args.config;
    logging::init(config.log_file.as_deref())?;

    let cache_dir = if config.cache {
        HttpSource::default_cache_dir()
    } else {
        None
    };
    let transport: Arc<dyn Transport> = Arc::new(
        HttpSource::new(config.request_timeout(), cache_dir)
            .map_err(|err| io::Error::other(format!("http client: {err}")))?,
    );
    let sounds = Arc::new(SoundBank::new(
        transport.clone(),
        config.sound_dir.clone(),
        config.volume,
    ));
    let env = Arc::new(EffectEnv {
        transport,
        sounds,
        options: config.load_options(),
    });
    tracing::info!(limit = config.limit, api_base = %config.api_base, "starting");

    let debug = DebugSession::new(args.debug);
    let limit = config.limit;
    let muted = config.muted;
    let state = debug
        .load_state_or_else_async(|| async move {
            let mut state = AppState::new(limit);
            state.muted = muted;
            Ok::<AppState, io::Error>(state)
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, env).await;

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
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    env: Arc<EffectEnv>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PipUi::new()));
    let mut bus: EventBus<AppState, Action, PipComponentId, PipContext> = EventBus::new();
    let keybindings: Keybindings<PipContext> = Keybindings::new();

    let ui_side = Rc::clone(&ui);
    bus.register(PipComponentId::Side, move |event, state| {
        ui_side.borrow_mut().handle_side_event(&event.kind, state)
    });

    let ui_list = Rc::clone(&ui);
    bus.register(PipComponentId::DexList, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PipComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PipComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) if !state.search.active => match key.code {
            crossterm::event::KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            crossterm::event::KeyCode::Tab => HandlerResponse::action(Action::FocusNext),
            crossterm::event::KeyCode::BackTab => HandlerResponse::action(Action::FocusPrev),
            crossterm::event::KeyCode::Char('/') => HandlerResponse::action(Action::SearchStart),
            crossterm::event::KeyCode::Esc => HandlerResponse::action(Action::SearchCancel),
            crossterm::event::KeyCode::Char('1') => HandlerResponse::action(Action::TabSet(Tab::Dex)),
            crossterm::event::KeyCode::Char('2') => {
                HandlerResponse::action(Action::TabSet(Tab::Stats))
            }
            crossterm::event::KeyCode::Char('3') => HandlerResponse::action(Action::TabSet(Tab::Map)),
            crossterm::event::KeyCode::Char('t') => HandlerResponse::action(Action::TabNext),
            crossterm::event::KeyCode::Char('T') => HandlerResponse::action(Action::TabPrev),
            crossterm::event::KeyCode::Char('[') => HandlerResponse::action(Action::CategoryPrev),
            crossterm::event::KeyCode::Char(']') => HandlerResponse::action(Action::CategoryNext),
            crossterm::event::KeyCode::Char('s') => HandlerResponse::action(Action::SortToggle),
            crossterm::event::KeyCode::Char('v') => HandlerResponse::action(Action::SpriteCycle),
            crossterm::event::KeyCode::Char('x') => {
                HandlerResponse::action(Action::SpriteToggleShiny)
            }
            crossterm::event::KeyCode::Char('m') => HandlerResponse::action(Action::MuteToggle),
            crossterm::event::KeyCode::Char('p') => HandlerResponse::action(Action::PlayCry),
            crossterm::event::KeyCode::Char('r') => HandlerResponse::action(Action::CatalogReload),
            _ => HandlerResponse::ignored(),
        },
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
                    .interval("tick", Duration::from_millis(250), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(&env, effect, ctx),
        )
        .await
}

fn handle_effect(env: &Arc<EffectEnv>, effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadCatalog { limit } => {
            let transport = env.transport.clone();
            let options = LoadOptions {
                limit,
                ..env.options.clone()
            };
            ctx.tasks().spawn(TaskKey::new("catalog"), async move {
                match loader::load_catalog(transport, &options).await {
                    Ok(load) => Action::CatalogDidLoad {
                        catalog: load.catalog,
                        failed: load.failures.into_iter().map(|failure| failure.name).collect(),
                    },
                    Err(error) => {
                        tracing::error!(%error, "catalog load failed");
                        Action::CatalogDidError(error.to_string())
                    }
                }
            });
        }
        Effect::PlaySound(sound) => {
            let sounds = env.sounds.clone();
            ctx.tasks().spawn(TaskKey::new("ui_sound"), async move {
                let result = match sounds.ui_clip(sound).await {
                    Ok(clip) => audio::play(clip, sounds.volume()).await,
                    Err(error) => Err(error),
                };
                if let Err(error) = result {
                    tracing::warn!(?sound, %error, "ui sound failed");
                }
                Action::Tick
            });
        }
        Effect::PlayCry { id, name, url } => {
            let sounds = env.sounds.clone();
            ctx.tasks().spawn(TaskKey::new("cry"), async move {
                let clip = match sounds.cry_clip(id, &name, url.as_deref()).await {
                    Ok(clip) => clip,
                    Err(error) => return Action::SoundDidError(format!("{name}: {error}")),
                };
                match audio::play(clip, sounds.volume()).await {
                    Ok(()) => Action::Tick,
                    Err(error) => Action::SoundDidError(error.to_string()),
                }
            });
        }
    }
}
