//! Key routing.
//!
//! Order matters: quit, then an active list filter (which swallows every
//! key), then the open form, then hint dismissal, then back/quit, and
//! finally the per-screen table.

use crossterm::event::KeyEvent;

use crate::{
    events::Screen,
    form::{Form, FormOutcome},
    menu::{EnvAction, MainAction},
    rows::EnvRow,
    shortcuts::{Shortcuts, matches_shortcut},
    table::Navigable,
    workflows::DeleteTarget,
    worker::Command,
};

use super::{
    App,
    navigation::{cancel_target, go, request_delete},
};

type KeyHandler = fn(&mut App, &KeyEvent) -> Vec<Command>;

/// Handle one key press and return the commands it causes.
pub fn handle_key(app: &mut App, k: KeyEvent) -> Vec<Command> {
    if matches_shortcut(&k, &app.shortcuts.global.quit) {
        app.should_quit = true;
        return Vec::new();
    }

    let sc = app.shortcuts.clone();
    if let Some(list) = active_list(app)
        && list.is_filtering()
    {
        list.handle_filter_key(&k, &sc);
        return Vec::new();
    }

    let screen = app.ui.screen;
    if screen.is_form() {
        return handle_form_key(app, &k);
    }

    if screen.is_hint() {
        if matches_shortcut(&k, &sc.hint.dismiss) {
            return back(app);
        }
        return Vec::new();
    }

    if matches_shortcut(&k, &sc.list.back) {
        // An applied filter is cleared before leaving the screen.
        if let Some(list) = active_list(app)
            && list.has_applied_filter()
        {
            list.clear_filter();
            return Vec::new();
        }
        return back(app);
    }
    if matches_shortcut(&k, &sc.list.quit) {
        app.should_quit = true;
        return Vec::new();
    }
    if matches_shortcut(&k, &sc.list.filter) {
        if let Some(list) = active_list(app) {
            list.start_filter();
        }
        return Vec::new();
    }
    if matches_shortcut(&k, &sc.list.up) {
        if let Some(list) = active_list(app) {
            list.move_cursor(-1);
        }
        return Vec::new();
    }
    if matches_shortcut(&k, &sc.list.down) {
        if let Some(list) = active_list(app) {
            list.move_cursor(1);
        }
        return Vec::new();
    }

    screen_handler(screen)(app, &k)
}

fn back(app: &mut App) -> Vec<Command> {
    match cancel_target(app) {
        Some(to) => go(app, to),
        None => Vec::new(),
    }
}

/// The list the active screen navigates, if any.
fn active_list(app: &mut App) -> Option<&mut dyn Navigable> {
    match app.ui.screen {
        Screen::MainMenu => Some(&mut app.main_menu),
        Screen::MachineList => Some(&mut app.machines),
        Screen::ServiceList => Some(&mut app.services),
        Screen::EnvironmentList => Some(&mut app.environments),
        Screen::EnvironmentMenu => Some(&mut app.env_menu),
        _ => None,
    }
}

fn screen_handler(screen: Screen) -> KeyHandler {
    match screen {
        Screen::MainMenu => main_menu_key,
        Screen::MachineList => machine_list_key,
        Screen::ServiceList => service_list_key,
        Screen::EnvironmentList => environment_list_key,
        Screen::EnvironmentMenu => environment_menu_key,
        _ => ignore_key,
    }
}

fn ignore_key(_: &mut App, _: &KeyEvent) -> Vec<Command> {
    Vec::new()
}

fn main_menu_key(app: &mut App, k: &KeyEvent) -> Vec<Command> {
    if !matches_shortcut(k, &app.shortcuts.list.choose) {
        return Vec::new();
    }
    let Some(action) = app.main_menu.selected().map(|i| i.action) else {
        return Vec::new();
    };
    match action {
        MainAction::GettingStarted => {
            let url = app.cfg.links.getting_started.clone();
            open_url(app, url)
        }
        MainAction::Docs => {
            let url = app.cfg.links.docs.clone();
            open_url(app, url)
        }
        MainAction::AddMachine => go(app, Screen::AddMachineForm),
        MainAction::Machines => go(app, Screen::MachineList),
        MainAction::AddService => go(app, Screen::AddServiceForm),
        MainAction::Services => go(app, Screen::ServiceList),
    }
}

fn open_url(app: &mut App, url: String) -> Vec<Command> {
    app.ui.status = format!("Opening {url}");
    vec![Command::OpenUrl(url)]
}

fn machine_list_key(app: &mut App, k: &KeyEvent) -> Vec<Command> {
    let sc = &app.shortcuts.list;
    if matches_shortcut(k, &sc.new) {
        go(app, Screen::AddMachineForm)
    } else if matches_shortcut(k, &sc.delete) {
        match app.machines.selected() {
            Some(m) => {
                let target = DeleteTarget::Machine {
                    id: m.id.clone(),
                    name: m.name.clone(),
                };
                request_delete(app, target)
            }
            None => Vec::new(),
        }
    } else if matches_shortcut(k, &sc.refresh) {
        app.ui.status = "Refreshing machines...".into();
        vec![Command::FetchMachines]
    } else {
        Vec::new()
    }
}

fn service_list_key(app: &mut App, k: &KeyEvent) -> Vec<Command> {
    let sc = &app.shortcuts.list;
    if matches_shortcut(k, &sc.choose) {
        let Some(svc) = app.services.selected().cloned() else {
            return Vec::new();
        };
        let same = app.selected_service.as_ref().is_some_and(|s| s.id == svc.id);
        if !same {
            app.environments.clear_filter();
            app.environments.reload(EnvRow::for_service(Vec::new()));
            app.selected_environment = None;
        }
        tracing::info!(service_id = %svc.id, "service selected");
        app.selected_service = Some(svc);
        go(app, Screen::EnvironmentList)
    } else if matches_shortcut(k, &sc.new) {
        go(app, Screen::AddServiceForm)
    } else if matches_shortcut(k, &sc.refresh) {
        app.ui.status = "Refreshing services...".into();
        vec![Command::FetchServices]
    } else {
        Vec::new()
    }
}

fn environment_list_key(app: &mut App, k: &KeyEvent) -> Vec<Command> {
    let sc = &app.shortcuts.list;
    if matches_shortcut(k, &sc.choose) {
        match app.environments.selected().cloned() {
            Some(EnvRow::Add) => go(app, Screen::AddEnvironmentForm),
            Some(EnvRow::Env(env)) => {
                app.selected_environment = Some(env);
                go(app, Screen::EnvironmentMenu)
            }
            None => Vec::new(),
        }
    } else if matches_shortcut(k, &sc.new) {
        go(app, Screen::AddEnvironmentForm)
    } else if matches_shortcut(k, &sc.refresh) {
        app.ui.status = "Refreshing environments...".into();
        super::navigation::live_fetch(app).into_iter().collect()
    } else {
        Vec::new()
    }
}

fn environment_menu_key(app: &mut App, k: &KeyEvent) -> Vec<Command> {
    if !matches_shortcut(k, &app.shortcuts.list.choose) {
        return Vec::new();
    }
    let (Some(action), Some(env)) = (
        app.env_menu.selected().map(|i| i.action),
        app.selected_environment.clone(),
    ) else {
        return Vec::new();
    };
    match action {
        EnvAction::Deploy => {
            app.ui.status = format!("Scheduling deployment of {}...", env.name);
            vec![Command::TriggerDeployment {
                environment_id: env.id,
            }]
        }
        EnvAction::Edit => go(app, Screen::EditEnvironmentForm),
        EnvAction::Delete => request_delete(
            app,
            DeleteTarget::Environment {
                id: env.id,
                name: env.name,
            },
        ),
    }
}

/// Feed a key to `form` and drain any outcome exactly once.
fn drive<D: Clone>(form: &mut Form<D>, k: &KeyEvent, sc: &Shortcuts) -> Option<FormOutcome<D>> {
    form.handle_key(k, sc);
    let outcome = form.take_outcome();
    if matches!(outcome, Some(FormOutcome::Completed(_))) {
        form.begin_submit();
    }
    outcome
}

fn handle_form_key(app: &mut App, k: &KeyEvent) -> Vec<Command> {
    let sc = app.shortcuts.clone();
    let screen = app.ui.screen;

    // Each arm yields the submit command, or None for an abort.
    let submitted: Option<Option<Command>> = match screen {
        Screen::AddMachineForm => app.machine_form.as_mut().and_then(|f| {
            drive(f, k, &sc).map(|o| match o {
                FormOutcome::Completed(d) => Some(Command::CreateMachine(d.to_request())),
                FormOutcome::Aborted => None,
            })
        }),
        Screen::AddServiceForm => app.service_form.as_mut().and_then(|f| {
            drive(f, k, &sc).map(|o| match o {
                FormOutcome::Completed(d) => Some(Command::CreateService(d.to_request())),
                FormOutcome::Aborted => None,
            })
        }),
        Screen::AddEnvironmentForm | Screen::EditEnvironmentForm => {
            app.env_form.as_mut().and_then(|f| {
                drive(f, k, &sc).map(|o| match o {
                    FormOutcome::Completed(d) if d.is_edit() => {
                        Some(Command::UpdateEnvironment(d.to_update()))
                    }
                    FormOutcome::Completed(d) => Some(Command::CreateEnvironment(d.to_request())),
                    FormOutcome::Aborted => None,
                })
            })
        }
        Screen::DeleteConfirmation => {
            return handle_delete_key(app, k, &sc);
        }
        _ => None,
    };

    match submitted {
        None => Vec::new(),
        Some(None) => {
            tracing::info!(form = screen.name(), "form aborted");
            back(app)
        }
        Some(Some(cmd)) => {
            tracing::info!(form = screen.name(), "form submitted");
            app.ui.status = "Submitting...".into();
            app.ui.notice = None;
            vec![cmd]
        }
    }
}

/// Deleting does not wait on the form: the request goes out and the
/// operator is returned to where the deletion was asked for.
fn handle_delete_key(app: &mut App, k: &KeyEvent, sc: &Shortcuts) -> Vec<Command> {
    let Some(form) = app.delete_form.as_mut() else {
        return Vec::new();
    };
    form.handle_key(k, sc);
    let cmd = match form.take_outcome() {
        None => return Vec::new(),
        Some(FormOutcome::Aborted) => None,
        Some(FormOutcome::Completed(d)) => Some(match d.target {
            DeleteTarget::Machine { id, .. } => Command::DeleteMachine { id },
            DeleteTarget::Environment { id, .. } => Command::DeleteEnvironment { id },
        }),
    };
    let to = app.delete_return;
    let mut cmds = go(app, to);
    if let Some(cmd) = cmd {
        app.ui.status = "Deleting...".into();
        cmds.push(cmd);
    }
    cmds
}
