//! Session controller: state, the update function and the event loop.
//!
//! All state lives in [`App`] and is mutated only by [`update`], which
//! consumes one [`Message`] at a time and returns the commands to run.
//! Commands execute on the runtime and report back through the same
//! channel, so the loop below is the single writer.

mod handlers;
mod navigation;
mod render;
mod results;
#[cfg(test)]
mod tests;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::{
    io,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};
use tokio::sync::mpsc;

use crate::{
    api::{Environment, HttpBackend, Machine, Service},
    config::Config,
    events::{Screen, UiState},
    form::Form,
    hints,
    layout,
    menu::{self, EnvAction, MainAction, MenuItem},
    message::Message,
    refresh::RefreshScheduler,
    rows::EnvRow,
    shortcuts::{Shortcuts, matches_shortcut},
    table::SelectList,
    ui::{self, TerminalLease, Tui},
    workflows::{DeleteDraft, EnvironmentDraft, MachineDraft, ServiceDraft},
    worker::{Command, Dispatcher},
};

use render::draw;

/// Everything the update function and the renderer share.
pub struct App {
    pub cfg: Config,
    pub shortcuts: Shortcuts,
    pub ui: UiState,

    pub main_menu: SelectList<MenuItem<MainAction>>,
    pub machines: SelectList<Machine>,
    pub services: SelectList<Service>,
    pub environments: SelectList<EnvRow>,
    pub env_menu: SelectList<MenuItem<EnvAction>>,

    /// Open forms; `None` whenever their screen is not active.
    pub machine_form: Option<Form<MachineDraft>>,
    pub service_form: Option<Form<ServiceDraft>>,
    pub env_form: Option<Form<EnvironmentDraft>>,
    pub delete_form: Option<Form<DeleteDraft>>,

    /// Service whose environments are listed.
    pub selected_service: Option<Service>,
    /// Environment the environment menu acts on.
    pub selected_environment: Option<Environment>,
    /// Screen the delete confirmation returns to.
    pub delete_return: Screen,

    pub refresh: RefreshScheduler,
    /// Text of a hint screen waiting to be printed on the plain terminal.
    pub pending_hint: Option<String>,
    /// Last hint shown, drawn while its screen stays active.
    pub hint_text: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(cfg: Config, shortcuts: Shortcuts, width: u16, height: u16) -> Self {
        let refresh = RefreshScheduler::new(cfg.refresh.period());
        let mut app = Self {
            cfg,
            shortcuts,
            ui: UiState::new(width, height),
            main_menu: SelectList::new(menu::main_menu()),
            machines: SelectList::default(),
            services: SelectList::default(),
            environments: SelectList::new(EnvRow::for_service(Vec::new())),
            env_menu: SelectList::new(menu::environment_menu()),
            machine_form: None,
            service_form: None,
            env_form: None,
            delete_form: None,
            selected_service: None,
            selected_environment: None,
            delete_return: Screen::MainMenu,
            refresh,
            pending_hint: None,
            hint_text: String::new(),
            should_quit: false,
        };
        app.resize(width, height);
        app
    }

    /// Re-flow lists and open forms to the cached terminal size.
    fn resize(&mut self, width: u16, height: u16) {
        self.ui.width = width;
        self.ui.height = height;
        let rows = layout::list_height(layout::body_for(width, height));
        self.main_menu.set_height(rows);
        self.machines.set_height(rows);
        self.services.set_height(rows);
        self.environments.set_height(rows);
        self.env_menu.set_height(rows);

        let body = layout::body_for(width, height);
        if let Some(f) = &mut self.machine_form {
            f.resize(body.width, body.height);
        }
        if let Some(f) = &mut self.service_form {
            f.resize(body.width, body.height);
        }
        if let Some(f) = &mut self.env_form {
            f.resize(body.width, body.height);
        }
        if let Some(f) = &mut self.delete_form {
            f.resize(body.width, body.height);
        }
    }
}

/// Apply one message and return the commands it causes.
pub fn update(app: &mut App, msg: Message) -> Vec<Command> {
    match msg {
        Message::Key(k) => handlers::handle_key(app, k),
        Message::Resize(w, h) => {
            app.resize(w, h);
            Vec::new()
        }
        Message::Tick(at) => {
            let fetch = navigation::live_fetch(app);
            if fetch.is_some() {
                tracing::debug!(at = %at.format("%H:%M:%S"), "refresh tick");
            }
            app.refresh.on_tick(fetch)
        }
        other => results::handle_result(app, other),
    }
}

/// Build the backend from config, then run until the operator quits.
pub async fn run_app(terminal: &mut Tui) -> Result<()> {
    let cfg = Config::load_or_default(&PathBuf::from("config.toml"))?;
    let shortcuts = Shortcuts::load_or_default(PathBuf::from("shortcut.toml"))?;
    let backend = Arc::new(HttpBackend::from_config(&cfg.api)?);
    tracing::info!(base_url = %cfg.api.base_url, "backend configured");

    let (tx, mut rx) = mpsc::channel::<Message>(256);
    let dispatcher = Dispatcher::new(backend, tx);

    let size = terminal.size()?;
    let mut app = App::new(cfg, shortcuts, size.width, size.height);

    loop {
        terminal.draw(|f| draw(f, &app))?;

        if let Some(text) = app.pending_hint.take() {
            let key = show_hint(terminal, &text, &app.shortcuts).await?;
            dispatcher.dispatch_all(update(&mut app, Message::Key(key)));
            continue;
        }

        // Results first, in arrival order.
        while let Ok(msg) = rx.try_recv() {
            dispatcher.dispatch_all(update(&mut app, msg));
        }

        if event::poll(Duration::from_millis(50))? {
            let msg = match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press => Some(Message::Key(k)),
                Event::Resize(w, h) => Some(Message::Resize(w, h)),
                _ => None,
            };
            if let Some(msg) = msg {
                dispatcher.dispatch_all(update(&mut app, msg));
            }
        }

        if app.should_quit {
            tracing::info!("quit requested");
            break;
        }
    }
    Ok(())
}

/// Print `text` on the plain terminal and wait for a dismiss key.
async fn show_hint(terminal: &mut Tui, text: &str, sc: &Shortcuts) -> Result<KeyEvent> {
    let _lease = TerminalLease::acquire(terminal)?;
    hints::print_hint(&mut io::stdout(), text)?;
    let dismiss = sc.hint.dismiss.clone();
    let key =
        tokio::task::spawn_blocking(move || ui::wait_for_key(|k| matches_shortcut(k, &dismiss)))
            .await??;
    Ok(key)
}
