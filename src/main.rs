//! Route finder - trip search form in the terminal

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use route_finder::action::Action;
use route_finder::components::region_picker::{PICKER_HEIGHT, PICKER_WIDTH};
use route_finder::components::{
    Component, RegionPicker, RegionPickerProps, SearchFormProps, SearchFormView,
};
use route_finder::effect::{Effect, run_search};
use route_finder::logging;
use route_finder::reducer::reducer;
use route_finder::region::RegionList;
use route_finder::search::{JsonLinesSink, MemorySink, SearchHandler, write_json_lines};
use route_finder::state::{AppState, CLOCK_TICK_SECS};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Route finder - pick origin, destination, date and mode of travel
#[derive(Parser, Debug)]
#[command(name = "route-finder")]
#[command(about = "A trip search form for bus, train and flight routes")]
struct Args {
    /// JSON file with the selectable states/UTs (defaults to the built-in list)
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Append submitted searches to this JSON-lines file
    /// (without it they are printed to stdout on exit)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Quit after the first successful search
    #[arg(long)]
    exit_on_submit: bool,

    /// Pin today's date (YYYY-MM-DD); disables the clock
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum FormComponentId {
    Form,
    Picker,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum FormContext {
    Main,
    Picker,
}

impl EventRoutingState<FormComponentId, FormContext> for AppState {
    fn focused(&self) -> Option<FormComponentId> {
        if self.picker_open() {
            Some(FormComponentId::Picker)
        } else {
            Some(FormComponentId::Form)
        }
    }

    fn modal(&self) -> Option<FormComponentId> {
        if self.picker_open() {
            Some(FormComponentId::Picker)
        } else {
            None
        }
    }

    fn binding_context(&self, id: FormComponentId) -> FormContext {
        match id {
            FormComponentId::Form => FormContext::Main,
            FormComponentId::Picker => FormContext::Picker,
        }
    }

    fn default_context(&self) -> FormContext {
        FormContext::Main
    }
}

/// Where submissions go, plus the in-memory sink to flush on exit.
fn search_handler(output: Option<PathBuf>) -> (Arc<dyn SearchHandler>, Option<MemorySink>) {
    match output {
        Some(path) => {
            let sink = JsonLinesSink::new(path);
            tracing::info!(path = %sink.path().display(), "writing searches to file");
            (Arc::new(sink), None)
        }
        None => {
            let sink = MemorySink::new();
            (Arc::new(sink.clone()), Some(sink))
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        regions,
        output,
        exit_on_submit,
        today,
        log_file,
        log_level,
        debug: debug_args,
    } = Args::parse();

    logging::init(log_file.as_deref(), &log_level).map_err(io::Error::other)?;

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            let regions = match regions {
                Some(path) => RegionList::load(&path).await.map_err(io::Error::other)?,
                None => RegionList::india(),
            };
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            Ok::<AppState, io::Error>(AppState::new(regions, today))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let (handler, memory) = search_handler(output);
    let clock = today.is_none();

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let options = RunOptions {
        handler,
        clock,
        exit_on_submit,
    };
    let result = run_app(&mut terminal, &debug, store, replay_actions, options).await;

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

    // Accepted searches go out even when the run itself failed
    let printed = match memory {
        Some(memory) => print_requests(&memory).await,
        None => Ok(()),
    };

    let run_output = result?;
    printed?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// Dump searches kept in memory as JSON lines, once the terminal is restored.
async fn print_requests(memory: &MemorySink) -> io::Result<()> {
    let requests = memory.take().await;
    write_json_lines(&requests, &mut io::stdout().lock()).map_err(io::Error::other)
}

struct FormUi {
    form: SearchFormView,
    picker: RegionPicker,
}

impl FormUi {
    fn new() -> Self {
        Self {
            form: SearchFormView::new(),
            picker: RegionPicker::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<FormComponentId>,
    ) {
        event_ctx.set_component_area(FormComponentId::Form, area);

        let props =
            SearchFormProps::from_state(state, render_ctx.is_focused() && !state.picker_open());
        self.form.render(frame, area, props);

        self.picker.set_open(state.picker_open());
        if let Some(slot) = state.picker.slot {
            let modal_area = centered_rect(PICKER_WIDTH, PICKER_HEIGHT, area);
            event_ctx.set_component_area(FormComponentId::Picker, modal_area);
            let matches = state.picker_matches();
            let props = RegionPickerProps {
                title: slot.title(),
                query: &state.picker.query,
                matches: &matches,
                selected: state.picker.selected,
                is_focused: render_ctx.is_focused(),
                on_query_change: Action::PickerQueryChange,
                on_select: Action::PickerSelect,
            };
            self.picker.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&FormComponentId::Picker);
        }
    }

    fn handle_form_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = SearchFormProps::from_state(state, true);
        let actions: Vec<_> = self.form.handle_event(event, props).into_iter().collect();
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

    fn handle_picker_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.picker.set_open(state.picker_open());
        let Some(slot) = state.picker.slot else {
            return HandlerResponse::ignored();
        };
        let matches = state.picker_matches();
        let props = RegionPickerProps {
            title: slot.title(),
            query: &state.picker.query,
            matches: &matches,
            selected: state.picker.selected,
            is_focused: true,
            on_query_change: Action::PickerQueryChange,
            on_select: Action::PickerSelect,
        };
        let actions: Vec<_> = self.picker.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

struct RunOptions {
    handler: Arc<dyn SearchHandler>,
    /// Refresh `today` from the system clock
    clock: bool,
    exit_on_submit: bool,
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    options: RunOptions,
) -> io::Result<DebugRunOutput<AppState>> {
    let RunOptions {
        handler,
        clock,
        exit_on_submit,
    } = options;

    let ui = Rc::new(RefCell::new(FormUi::new()));
    let mut bus: EventBus<AppState, Action, FormComponentId, FormContext> = EventBus::new();
    let keybindings: Keybindings<FormContext> = Keybindings::new();

    let ui_form = Rc::clone(&ui);
    bus.register(FormComponentId::Form, move |event, state| {
        ui_form.borrow_mut().handle_form_event(&event.kind, state)
    });

    let ui_picker = Rc::clone(&ui);
    bus.register(FormComponentId::Picker, move |event, state| {
        ui_picker
            .borrow_mut()
            .handle_picker_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            None,
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() || !clock {
                    return;
                }

                runtime.subscriptions().interval(
                    "clock",
                    Duration::from_secs(CLOCK_TICK_SECS),
                    || Action::ClockTick(Local::now().date_naive()),
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            move |action| match action {
                Action::Quit => true,
                Action::SearchDidComplete(_) => exit_on_submit,
                _ => false,
            },
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&handler)),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, handler: Arc<dyn SearchHandler>) {
    match effect {
        Effect::Search(request) => {
            tracing::info!(search = %request.summary(), "submitting search");
            ctx.tasks()
                .spawn("search", async move { run_search(handler.as_ref(), request).await });
        }
    }
}
