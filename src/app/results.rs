//! Applying completed-command results to the session.
//!
//! Loads overwrite whatever is shown (the latest arrival wins). Create and
//! update results only move the operator on if they are still looking at
//! the form that submitted them; otherwise they just update the status line.

use chrono::Local;

use crate::{
    events::Screen,
    hints,
    message::Message,
    rows::EnvRow,
    workflows::{ENV_MACHINES_FIELD, machine_choices},
    worker::{Command, CommandError, CommandKind},
};

use super::{App, navigation::go};

pub fn handle_result(app: &mut App, msg: Message) -> Vec<Command> {
    match msg {
        Message::MachinesLoaded(machines) => {
            tracing::debug!(count = machines.len(), "machines loaded");
            app.machines.reload(machines);
            if let Some(form) = &mut app.env_form {
                form.set_options(ENV_MACHINES_FIELD, machine_choices(app.machines.items()));
            }
            loaded(app, CommandKind::FetchMachines);
            if app.ui.screen == Screen::MachineList {
                app.ui.status = format!("{} machines", app.machines.items().len());
            }
            Vec::new()
        }
        Message::ServicesLoaded(services) => {
            tracing::debug!(count = services.len(), "services loaded");
            app.services.reload(services);
            loaded(app, CommandKind::FetchServices);
            if app.ui.screen == Screen::ServiceList {
                app.ui.status = format!("{} services", app.services.items().len());
            }
            Vec::new()
        }
        Message::EnvironmentsLoaded {
            service_id,
            environments,
        } => {
            let current = app.selected_service.as_ref().map(|s| s.id.as_str());
            if current != Some(service_id.as_str()) {
                tracing::debug!(%service_id, "dropping environments of another service");
                return Vec::new();
            }
            if let Some(sel) = &mut app.selected_environment
                && let Some(fresh) = environments.iter().find(|e| e.id == sel.id)
            {
                *sel = fresh.clone();
            }
            let count = environments.len();
            app.environments.reload(EnvRow::for_service(environments));
            loaded(app, CommandKind::FetchEnvironments);
            if app.ui.screen == Screen::EnvironmentList {
                app.ui.status = format!("{count} environments");
            }
            Vec::new()
        }

        Message::MachineCreated(machine) => {
            tracing::info!(id = %machine.id, name = %machine.name, "machine created");
            if submitting(app, Screen::AddMachineForm) {
                let text = hints::join_hint(&machine);
                app.hint_text = text.clone();
                app.pending_hint = Some(text);
                let cmds = go(app, Screen::MachineJoinHint);
                app.ui.status = format!("Machine {} created", machine.name);
                cmds
            } else {
                app.ui.status = format!("Machine {} created", machine.name);
                Vec::new()
            }
        }
        Message::ServiceCreated(service) => {
            tracing::info!(id = %service.id, name = %service.name, "service created");
            let cmds = if submitting(app, Screen::AddServiceForm) {
                go(app, Screen::ServiceList)
            } else {
                Vec::new()
            };
            app.ui.status = format!("Service {} created", service.name);
            cmds
        }
        Message::EnvironmentCreated(env) => {
            tracing::info!(id = %env.id, name = %env.name, "environment created");
            let cmds = if submitting(app, Screen::AddEnvironmentForm) {
                go(app, Screen::EnvironmentList)
            } else {
                Vec::new()
            };
            app.ui.status = format!("Environment {} created", env.name);
            cmds
        }
        Message::EnvironmentUpdated(env) => {
            tracing::info!(id = %env.id, "environment updated");
            let name = env.name.clone();
            if app.selected_environment.as_ref().is_some_and(|e| e.id == env.id) {
                app.selected_environment = Some(env);
            }
            let cmds = if submitting(app, Screen::EditEnvironmentForm) {
                go(app, Screen::EnvironmentList)
            } else {
                Vec::new()
            };
            app.ui.status = format!("Environment {name} saved");
            cmds
        }

        Message::MachineDeleted { id } => {
            tracing::info!(%id, "machine deleted");
            app.ui.status = "Machine deleted".into();
            if app.ui.screen == Screen::MachineList {
                vec![Command::FetchMachines]
            } else {
                Vec::new()
            }
        }
        Message::EnvironmentDeleted { id } => {
            tracing::info!(%id, "environment deleted");
            let was_selected = app.selected_environment.as_ref().is_some_and(|e| e.id == id);
            if was_selected {
                app.selected_environment = None;
            }
            let cmds = match app.ui.screen {
                Screen::EnvironmentMenu if was_selected => go(app, Screen::EnvironmentList),
                Screen::EnvironmentList => super::navigation::live_fetch(app).into_iter().collect(),
                _ => Vec::new(),
            };
            app.ui.status = "Environment deleted".into();
            cmds
        }
        Message::DeploymentTriggered { environment_id } => {
            tracing::info!(%environment_id, "deployment scheduled");
            let env = app
                .selected_environment
                .clone()
                .filter(|e| e.id == environment_id);
            match env {
                Some(env) if app.ui.screen == Screen::EnvironmentMenu => {
                    let text = hints::deployment_hint(&env);
                    app.hint_text = text.clone();
                    app.pending_hint = Some(text);
                    let cmds = go(app, Screen::DeploymentScheduled);
                    app.ui.status = format!("Deployment of {} scheduled", env.name);
                    cmds
                }
                _ => {
                    app.ui.status = "Deployment scheduled".into();
                    Vec::new()
                }
            }
        }
        Message::BrowserOpened { url } => {
            app.ui.status = format!("Opened {url}");
            Vec::new()
        }

        Message::Error { origin, cause } => {
            failed(app, origin, &cause);
            Vec::new()
        }

        Message::Key(_) | Message::Resize(..) | Message::Tick(_) => Vec::new(),
    }
}

/// True when `screen` is active with its form waiting on a submission.
fn submitting(app: &App, screen: Screen) -> bool {
    if app.ui.screen != screen {
        return false;
    }
    match screen {
        Screen::AddMachineForm => app.machine_form.as_ref().is_some_and(|f| f.is_submitting()),
        Screen::AddServiceForm => app.service_form.as_ref().is_some_and(|f| f.is_submitting()),
        Screen::AddEnvironmentForm | Screen::EditEnvironmentForm => {
            app.env_form.as_ref().is_some_and(|f| f.is_submitting())
        }
        _ => false,
    }
}

fn loaded(app: &mut App, kind: CommandKind) {
    app.ui.last_refresh = Some(Local::now());
    // Only clear an error left by the same kind of load.
    if app
        .ui
        .notice
        .as_ref()
        .is_some_and(|n| n.is_error && n.text.starts_with(describe(kind)))
    {
        app.ui.clear_error();
    }
}

/// Show the failure and reopen a form that was waiting on it.
fn failed(app: &mut App, origin: CommandKind, cause: &CommandError) {
    let retrying = matches!(cause, CommandError::Api(e) if e.is_transient())
        && matches!(
            origin,
            CommandKind::FetchMachines | CommandKind::FetchEnvironments
        );
    let text = if retrying {
        format!("{}: {cause} (retrying)", describe(origin))
    } else {
        format!("{}: {cause}", describe(origin))
    };
    tracing::warn!(?origin, "{text}");
    app.ui.error(text);

    let screen = match origin {
        CommandKind::CreateMachine => Screen::AddMachineForm,
        CommandKind::CreateService => Screen::AddServiceForm,
        CommandKind::CreateEnvironment => Screen::AddEnvironmentForm,
        CommandKind::UpdateEnvironment => Screen::EditEnvironmentForm,
        _ => return,
    };
    if !submitting(app, screen) {
        return;
    }
    if let Some(f) = &mut app.machine_form
        && screen == Screen::AddMachineForm
    {
        f.resume();
    } else if let Some(f) = &mut app.service_form
        && screen == Screen::AddServiceForm
    {
        f.resume();
    } else if let Some(f) = &mut app.env_form {
        f.resume();
    }
    app.ui.status = "Submission failed, press Enter to retry".into();
}

fn describe(kind: CommandKind) -> &'static str {
    match kind {
        CommandKind::FetchMachines => "Loading machines failed",
        CommandKind::FetchServices => "Loading services failed",
        CommandKind::FetchEnvironments => "Loading environments failed",
        CommandKind::CreateMachine => "Adding machine failed",
        CommandKind::CreateService => "Adding service failed",
        CommandKind::CreateEnvironment => "Adding environment failed",
        CommandKind::UpdateEnvironment => "Saving environment failed",
        CommandKind::DeleteMachine => "Deleting machine failed",
        CommandKind::DeleteEnvironment => "Deleting environment failed",
        CommandKind::TriggerDeployment => "Scheduling deployment failed",
        CommandKind::ScheduleTick => "Refresh timer failed",
        CommandKind::OpenUrl => "Opening browser failed",
    }
}
