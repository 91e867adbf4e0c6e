//! Screen transitions: what entering a screen sets up and where cancel leads.

use crate::{
    events::Screen,
    layout,
    workflows::{
        self, DeleteTarget, EnvironmentDraft, MachineDraft, ServiceDraft, environment_form,
        machine_form, service_form,
    },
    worker::Command,
};

use super::App;

/// Where the cancel key leads from the current screen.
pub fn cancel_target(app: &App) -> Option<Screen> {
    match app.ui.screen {
        Screen::DeleteConfirmation => Some(app.delete_return),
        s => s.parent(),
    }
}

/// The fetch that keeps the current screen fresh, if it is a live one.
pub fn live_fetch(app: &App) -> Option<Command> {
    if !app.ui.screen.is_live() {
        return None;
    }
    match app.ui.screen {
        Screen::MachineList => Some(Command::FetchMachines),
        Screen::EnvironmentList => app
            .selected_service
            .as_ref()
            .map(|s| Command::FetchEnvironments {
                service_id: s.id.clone(),
            }),
        _ => None,
    }
}

/// Make `to` the active screen and run its entry actions.
pub fn go(app: &mut App, to: Screen) -> Vec<Command> {
    let from = app.ui.screen;
    // Environment screens are meaningless without a service.
    let to = if needs_service(to) && app.selected_service.is_none() {
        tracing::warn!(?to, "no service selected, showing services");
        Screen::ServiceList
    } else {
        to
    };

    tear_down(app, from);
    app.ui.screen = to;
    app.ui.notice = None;
    app.ui.status = to.name().to_string();
    tracing::info!(from = from.name(), to = to.name(), "navigate");

    let body = layout::body_for(app.ui.width, app.ui.height);
    let mut cmds = Vec::new();
    match to {
        Screen::MachineList => {
            cmds.push(Command::FetchMachines);
            cmds.extend(app.refresh.arm());
        }
        Screen::ServiceList => cmds.push(Command::FetchServices),
        Screen::EnvironmentList => {
            cmds.extend(live_fetch(app));
            cmds.extend(app.refresh.arm());
        }
        Screen::AddMachineForm => {
            app.machine_form =
                Some(machine_form(MachineDraft::default()).with_size(body.width, body.height));
        }
        Screen::AddServiceForm => {
            app.service_form =
                Some(service_form(ServiceDraft::default()).with_size(body.width, body.height));
        }
        Screen::AddEnvironmentForm | Screen::EditEnvironmentForm => {
            let draft = match (to, &app.selected_environment, &app.selected_service) {
                (Screen::EditEnvironmentForm, Some(env), _) => EnvironmentDraft::editing(env),
                (_, _, Some(svc)) => EnvironmentDraft::new(&svc.id),
                _ => EnvironmentDraft::new(""),
            };
            app.env_form = Some(
                environment_form(draft, app.machines.items()).with_size(body.width, body.height),
            );
            // Machine options come from the latest machine load.
            cmds.push(Command::FetchMachines);
        }
        Screen::EnvironmentMenu => {
            app.env_menu.clear_filter();
        }
        Screen::DeleteConfirmation => {
            if let Some(f) = &mut app.delete_form {
                f.resize(body.width, body.height);
            }
        }
        Screen::MainMenu | Screen::MachineJoinHint | Screen::DeploymentScheduled => {}
    }
    cmds
}

/// Open the delete confirmation for `target`, returning here afterwards.
pub fn request_delete(app: &mut App, target: DeleteTarget) -> Vec<Command> {
    app.delete_return = app.ui.screen;
    app.delete_form = Some(workflows::delete_form(target));
    go(app, Screen::DeleteConfirmation)
}

/// Forms are discarded with their screen; nothing carries over.
fn tear_down(app: &mut App, from: Screen) {
    match from {
        Screen::AddMachineForm => app.machine_form = None,
        Screen::AddServiceForm => app.service_form = None,
        Screen::AddEnvironmentForm | Screen::EditEnvironmentForm => app.env_form = None,
        Screen::DeleteConfirmation => app.delete_form = None,
        _ => {}
    }
}

fn needs_service(screen: Screen) -> bool {
    matches!(
        screen,
        Screen::EnvironmentList
            | Screen::AddEnvironmentForm
            | Screen::EnvironmentMenu
            | Screen::EditEnvironmentForm
            | Screen::DeploymentScheduled
    )
}
