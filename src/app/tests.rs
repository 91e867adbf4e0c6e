use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{App, navigation::go, update};
use crate::{
    api::{ApiError, Environment, Machine, NewMachine, Service},
    config::Config,
    events::Screen,
    form::FieldValue,
    message::Message,
    rows::EnvRow,
    shortcuts::Shortcuts,
    table::Identify,
    worker::{Command, CommandError, CommandKind, execute, tests::FakeBackend},
};

fn app() -> App {
    App::new(Config::default(), Shortcuts::default(), 120, 40)
}

fn press(app: &mut App, code: KeyCode) -> Vec<Command> {
    update(app, Message::Key(KeyEvent::new(code, KeyModifiers::empty())))
}

fn typ(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn service(id: &str) -> Service {
    Service {
        id: id.into(),
        name: format!("service {id}"),
        ..Default::default()
    }
}

fn machine(id: &str) -> Machine {
    Machine {
        id: id.into(),
        name: format!("m-{id}"),
        ..Default::default()
    }
}

fn environment(id: &str, service_id: &str) -> Environment {
    Environment {
        id: id.into(),
        name: format!("env {id}"),
        service_id: service_id.into(),
        ..Default::default()
    }
}

/// App positioned on `screen` with a service and environment selected.
fn app_on(screen: Screen) -> App {
    let mut a = app();
    a.selected_service = Some(service("svc-1"));
    a.selected_environment = Some(environment("env-1", "svc-1"));
    go(&mut a, screen);
    a
}

fn is_tick(c: &Command) -> bool {
    matches!(c, Command::ScheduleTick { .. })
}

#[test]
fn cancel_leads_to_declared_parent() {
    for screen in Screen::ALL {
        let Some(parent) = screen.parent() else {
            continue;
        };
        let mut a = app_on(screen);
        assert_eq!(a.ui.screen, screen);
        press(&mut a, KeyCode::Esc);
        assert_eq!(a.ui.screen, parent, "cancel from {screen:?}");
    }
}

#[test]
fn delete_confirmation_returns_to_origin() {
    let mut a = app_on(Screen::MachineList);
    update(&mut a, Message::MachinesLoaded(vec![machine("1")]));
    press(&mut a, KeyCode::Char('d'));
    assert_eq!(a.ui.screen, Screen::DeleteConfirmation);
    press(&mut a, KeyCode::Esc);
    assert_eq!(a.ui.screen, Screen::MachineList);

    let mut a = app_on(Screen::EnvironmentMenu);
    a.env_menu.move_cursor(2);
    press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::DeleteConfirmation);
    // Default answer is Cancel.
    let cmds = press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::EnvironmentMenu);
    assert!(cmds.is_empty());
}

#[test]
fn confirmed_delete_issues_command_and_returns() {
    let mut a = app_on(Screen::MachineList);
    update(&mut a, Message::MachinesLoaded(vec![machine("1"), machine("2")]));
    press(&mut a, KeyCode::Down);
    press(&mut a, KeyCode::Char('d'));
    press(&mut a, KeyCode::Char('y'));
    let cmds = press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::MachineList);
    assert!(cmds.contains(&Command::DeleteMachine { id: "2".into() }));
    assert!(a.delete_form.is_none());
}

#[test]
fn reopened_form_starts_from_defaults() {
    let mut a = app();
    go(&mut a, Screen::AddMachineForm);
    press(&mut a, KeyCode::Down); // Load Balancer
    press(&mut a, KeyCode::Enter);
    typ(&mut a, "stale");
    press(&mut a, KeyCode::Esc);
    assert_eq!(a.ui.screen, Screen::MainMenu);
    assert!(a.machine_form.is_none());

    go(&mut a, Screen::AddMachineForm);
    let form = a.machine_form.as_ref().unwrap();
    assert_eq!(form.focus(), 0);
    assert_eq!(form.draft().name, "");
    assert_eq!(form.draft().machine_type, "workload");
    assert_eq!(form.fields()[0].widget.value(), FieldValue::Choice("workload".into()));
    assert_eq!(form.fields()[1].widget.value(), FieldValue::Text(String::new()));
}

#[test]
fn completed_form_fires_once() {
    let mut a = app();
    go(&mut a, Screen::AddServiceForm);
    typ(&mut a, "api");
    press(&mut a, KeyCode::Enter);
    typ(&mut a, "https://github.com/org/api.git");
    press(&mut a, KeyCode::Enter);

    let mut fired = press(&mut a, KeyCode::Enter);
    for _ in 0..3 {
        fired.extend(press(&mut a, KeyCode::Enter));
        fired.extend(press(&mut a, KeyCode::Char('y')));
    }
    let creates = fired
        .iter()
        .filter(|c| matches!(c, Command::CreateService(_)))
        .count();
    assert_eq!(creates, 1);
    assert!(a.service_form.as_ref().unwrap().is_submitting());
}

#[test]
fn declining_confirm_aborts_like_cancel() {
    let mut a = app_on(Screen::EnvironmentList);
    go(&mut a, Screen::AddEnvironmentForm);
    typ(&mut a, "prod");
    press(&mut a, KeyCode::Enter);
    typ(&mut a, "main");
    press(&mut a, KeyCode::Enter);
    typ(&mut a, "4008");
    press(&mut a, KeyCode::Enter);
    press(&mut a, KeyCode::Enter); // domain
    press(&mut a, KeyCode::Enter); // machines
    press(&mut a, KeyCode::Char('n'));
    let cmds = press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::EnvironmentList);
    assert!(!cmds.iter().any(|c| matches!(c, Command::CreateEnvironment(_))));
}

#[tokio::test]
async fn new_machine_shows_join_hint_then_main_menu() {
    let mut a = app();
    press(&mut a, KeyCode::Down);
    press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::AddMachineForm);

    press(&mut a, KeyCode::Enter); // Server
    typ(&mut a, "edge-1");
    press(&mut a, KeyCode::Enter);
    let cmds = press(&mut a, KeyCode::Enter);
    let expected = NewMachine {
        name: "edge-1".into(),
        types: vec!["workload".into()],
    };
    assert_eq!(cmds, vec![Command::CreateMachine(expected)]);

    let backend = FakeBackend::default();
    let msg = execute(cmds[0].clone(), &backend).await;
    update(&mut a, msg);

    assert_eq!(a.ui.screen, Screen::MachineJoinHint);
    let hint = a.pending_hint.take().unwrap();
    assert!(hint.contains("curl -sL https://cloud.example/join/edge-1"));

    press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::MainMenu);
}

#[test]
fn add_environment_row_is_scoped_to_selected_service() {
    let mut a = app();
    go(&mut a, Screen::ServiceList);
    update(
        &mut a,
        Message::ServicesLoaded(vec![service("svc-0"), service("svc-1")]),
    );
    press(&mut a, KeyCode::Down);
    let cmds = press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::EnvironmentList);
    assert!(cmds.contains(&Command::FetchEnvironments {
        service_id: "svc-1".into()
    }));

    update(
        &mut a,
        Message::EnvironmentsLoaded {
            service_id: "svc-1".into(),
            environments: vec![environment("env-1", "svc-1")],
        },
    );
    assert_eq!(a.environments.selected(), Some(&EnvRow::Add));

    press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::AddEnvironmentForm);
    let draft = a.env_form.as_ref().unwrap().draft();
    assert_eq!(draft.service_id, "svc-1");
    assert!(!draft.is_edit());
}

#[test]
fn environments_of_another_service_are_ignored() {
    let mut a = app_on(Screen::EnvironmentList);
    update(
        &mut a,
        Message::EnvironmentsLoaded {
            service_id: "svc-9".into(),
            environments: vec![environment("x", "svc-9")],
        },
    );
    assert_eq!(a.environments.items().len(), 1);
}

#[test]
fn refresh_timeout_keeps_rows_and_next_tick() {
    let mut a = app();
    let cmds = go(&mut a, Screen::MachineList);
    assert!(cmds.contains(&Command::FetchMachines));
    assert!(cmds.iter().any(is_tick));

    update(&mut a, Message::MachinesLoaded(vec![machine("1"), machine("2")]));
    press(&mut a, KeyCode::Down);

    let cmds = update(&mut a, Message::Tick(chrono::Local::now()));
    assert!(cmds.contains(&Command::FetchMachines));
    assert!(cmds.iter().any(is_tick));

    update(
        &mut a,
        Message::Error {
            origin: CommandKind::FetchMachines,
            cause: CommandError::Api(ApiError::Transport("operation timed out".into())),
        },
    );
    assert_eq!(a.machines.items().len(), 2);
    assert_eq!(a.machines.selected().map(|m| m.identity()), Some("2"));
    assert!(a.ui.notice.as_ref().is_some_and(|n| n.is_error));

    let cmds = update(&mut a, Message::Tick(chrono::Local::now()));
    assert!(cmds.iter().any(is_tick));
    assert!(cmds.contains(&Command::FetchMachines));

    // A later successful load clears the error.
    update(&mut a, Message::MachinesLoaded(vec![machine("2")]));
    assert!(a.ui.notice.is_none());
}

#[test]
fn tick_after_leaving_live_screen_only_reschedules() {
    let mut a = app();
    go(&mut a, Screen::MachineList);
    press(&mut a, KeyCode::Esc);
    assert_eq!(a.ui.screen, Screen::MainMenu);
    let cmds = update(&mut a, Message::Tick(chrono::Local::now()));
    assert_eq!(cmds.len(), 1);
    assert!(is_tick(&cmds[0]));
}

#[test]
fn refresh_chain_is_armed_once() {
    let mut a = app();
    let first = go(&mut a, Screen::MachineList);
    press(&mut a, KeyCode::Esc);
    let again = go(&mut a, Screen::MachineList);
    assert_eq!(first.iter().filter(|c| is_tick(c)).count(), 1);
    assert_eq!(again.iter().filter(|c| is_tick(c)).count(), 0);
}

#[test]
fn filter_swallows_screen_bindings() {
    let mut a = app();
    go(&mut a, Screen::MachineList);
    update(&mut a, Message::MachinesLoaded(vec![machine("1")]));
    press(&mut a, KeyCode::Char('/'));
    let cmds = press(&mut a, KeyCode::Char('n'));
    press(&mut a, KeyCode::Char('q'));
    assert!(cmds.is_empty());
    assert_eq!(a.ui.screen, Screen::MachineList);
    assert!(!a.should_quit);
    assert!(a.machines.is_filtering());

    press(&mut a, KeyCode::Enter);
    assert!(a.machines.has_applied_filter());
    // Esc clears the applied filter before leaving.
    press(&mut a, KeyCode::Esc);
    assert_eq!(a.ui.screen, Screen::MachineList);
    press(&mut a, KeyCode::Esc);
    assert_eq!(a.ui.screen, Screen::MainMenu);
}

#[test]
fn q_quits_lists_but_types_in_forms() {
    let mut a = app();
    go(&mut a, Screen::AddServiceForm);
    typ(&mut a, "q");
    assert!(!a.should_quit);
    assert_eq!(a.service_form.as_ref().unwrap().fields()[0].widget.value(), FieldValue::Text("q".into()));

    go(&mut a, Screen::ServiceList);
    press(&mut a, KeyCode::Char('q'));
    assert!(a.should_quit);

    let mut a = app();
    go(&mut a, Screen::AddMachineForm);
    update(
        &mut a,
        Message::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
    );
    assert!(a.should_quit);
}

#[test]
fn failed_submission_reopens_form_with_values() {
    let mut a = app();
    go(&mut a, Screen::AddServiceForm);
    typ(&mut a, "api");
    press(&mut a, KeyCode::Enter);
    typ(&mut a, "https://github.com/org/api.git");
    press(&mut a, KeyCode::Enter);
    press(&mut a, KeyCode::Enter);
    assert!(a.service_form.as_ref().unwrap().is_submitting());

    update(
        &mut a,
        Message::Error {
            origin: CommandKind::CreateService,
            cause: CommandError::Api(ApiError::Status {
                status: 500,
                body: "boom".into(),
            }),
        },
    );
    assert_eq!(a.ui.screen, Screen::AddServiceForm);
    let form = a.service_form.as_ref().unwrap();
    assert!(!form.is_submitting());
    assert_eq!(form.focus(), 2);
    assert_eq!(form.draft().name, "api");
    assert!(a.ui.notice.as_ref().unwrap().text.contains("boom"));

    let cmds = press(&mut a, KeyCode::Enter);
    assert!(matches!(cmds.as_slice(), [Command::CreateService(_)]));
}

#[test]
fn late_result_only_updates_status() {
    let mut a = app();
    go(&mut a, Screen::AddServiceForm);
    typ(&mut a, "api");
    press(&mut a, KeyCode::Enter);
    typ(&mut a, "https://github.com/org/api.git");
    press(&mut a, KeyCode::Enter);
    press(&mut a, KeyCode::Enter);
    press(&mut a, KeyCode::Esc);
    assert_eq!(a.ui.screen, Screen::MainMenu);

    let cmds = update(&mut a, Message::ServiceCreated(service("svc-2")));
    assert!(cmds.is_empty());
    assert_eq!(a.ui.screen, Screen::MainMenu);
    assert!(a.ui.status.contains("created"));
}

#[test]
fn created_service_returns_to_reloaded_list() {
    let mut a = app();
    go(&mut a, Screen::AddServiceForm);
    typ(&mut a, "api");
    press(&mut a, KeyCode::Enter);
    typ(&mut a, "git@github.com:org/api.git");
    press(&mut a, KeyCode::Enter);
    press(&mut a, KeyCode::Enter);
    let cmds = update(&mut a, Message::ServiceCreated(service("svc-2")));
    assert_eq!(a.ui.screen, Screen::ServiceList);
    assert!(cmds.contains(&Command::FetchServices));
}

#[test]
fn deploy_shows_scheduled_hint_then_environment_list() {
    let mut a = app_on(Screen::EnvironmentMenu);
    let cmds = press(&mut a, KeyCode::Enter);
    assert_eq!(
        cmds,
        vec![Command::TriggerDeployment {
            environment_id: "env-1".into()
        }]
    );
    assert_eq!(a.ui.screen, Screen::EnvironmentMenu);

    update(
        &mut a,
        Message::DeploymentTriggered {
            environment_id: "env-1".into(),
        },
    );
    assert_eq!(a.ui.screen, Screen::DeploymentScheduled);
    assert!(a.pending_hint.take().unwrap().contains("env env-1"));

    let cmds = press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::EnvironmentList);
    assert!(cmds.contains(&Command::FetchEnvironments {
        service_id: "svc-1".into()
    }));
}

#[test]
fn edit_environment_submits_full_update() {
    let mut a = app_on(Screen::EnvironmentMenu);
    a.selected_environment = Some(Environment {
        branch: "main".into(),
        port: "4008".into(),
        last_deployment_status: "Deployed".into(),
        ..environment("env-1", "svc-1")
    });
    press(&mut a, KeyCode::Down);
    let cmds = press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::EditEnvironmentForm);
    assert!(cmds.contains(&Command::FetchMachines));

    // Keep every value, confirm Save.
    let mut fired = Vec::new();
    for _ in 0..6 {
        fired.extend(press(&mut a, KeyCode::Enter));
    }
    let Some(Command::UpdateEnvironment(env)) = fired.first() else {
        panic!("expected an update, got {fired:?}");
    };
    assert_eq!(env.id, "env-1");
    assert_eq!(env.last_deployment_status, "Deployed");

    let env = env.clone();
    update(&mut a, Message::EnvironmentUpdated(env));
    assert_eq!(a.ui.screen, Screen::EnvironmentList);
}

/// Open Edit on an environment assigned to m-1 and m-2, then walk every field.
fn submit_unchanged_edit(a: &mut App) -> Vec<String> {
    let mut fired = Vec::new();
    for _ in 0..6 {
        fired.extend(press(a, KeyCode::Enter));
    }
    match fired.first() {
        Some(Command::UpdateEnvironment(env)) => env.machine_ids.clone(),
        other => panic!("expected an update, got {other:?}"),
    }
}

fn env_on_two_machines() -> Environment {
    Environment {
        branch: "main".into(),
        port: "4008".into(),
        machine_ids: vec!["m-1".into(), "m-2".into()],
        ..environment("env-1", "svc-1")
    }
}

#[test]
fn edit_keeps_machines_when_machine_load_failed() {
    let mut a = app_on(Screen::EnvironmentMenu);
    a.selected_environment = Some(env_on_two_machines());
    press(&mut a, KeyCode::Down);
    press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::EditEnvironmentForm);
    assert!(a.machines.items().is_empty());

    update(
        &mut a,
        Message::Error {
            origin: CommandKind::FetchMachines,
            cause: CommandError::Api(ApiError::Transport("connection refused".into())),
        },
    );
    assert_eq!(submit_unchanged_edit(&mut a), vec!["m-1", "m-2"]);
}

#[test]
fn edit_keeps_machines_once_machine_list_arrives() {
    let mut a = app_on(Screen::EnvironmentMenu);
    a.selected_environment = Some(env_on_two_machines());
    press(&mut a, KeyCode::Down);
    press(&mut a, KeyCode::Enter);
    let machines = ["m-1", "m-2", "m-3"].map(|id| Machine {
        id: id.into(),
        name: id.into(),
        ..Default::default()
    });
    update(&mut a, Message::MachinesLoaded(machines.to_vec()));
    assert_eq!(submit_unchanged_edit(&mut a), vec!["m-1", "m-2"]);
}

#[test]
fn environment_form_picks_up_machines_as_they_load() {
    let mut a = app_on(Screen::AddEnvironmentForm);
    update(&mut a, Message::MachinesLoaded(vec![machine("1"), machine("2")]));
    let form = a.env_form.as_ref().unwrap();
    let field = form.fields().iter().find(|f| f.key == "machines").unwrap();
    let crate::form::Widget::MultiSelect { options, .. } = &field.widget else {
        panic!("machines field should be a multi-select");
    };
    assert_eq!(options.len(), 2);
}

#[test]
fn resize_reflows_open_form() {
    let mut a = app();
    go(&mut a, Screen::AddMachineForm);
    let before = a.machine_form.as_ref().unwrap().size();
    update(&mut a, Message::Resize(60, 20));
    let after = a.machine_form.as_ref().unwrap().size();
    assert_ne!(before, after);
    assert_eq!(after.0, 60);
}

#[test]
fn deleted_environment_leaves_its_menu() {
    let mut a = app_on(Screen::EnvironmentMenu);
    let cmds = update(
        &mut a,
        Message::EnvironmentDeleted {
            id: "env-1".into(),
        },
    );
    assert_eq!(a.ui.screen, Screen::EnvironmentList);
    assert!(a.selected_environment.is_none());
    assert!(cmds.contains(&Command::FetchEnvironments {
        service_id: "svc-1".into()
    }));
}

#[test]
fn menu_links_open_browser_without_leaving() {
    let mut a = app();
    let cmds = press(&mut a, KeyCode::Enter);
    assert_eq!(a.ui.screen, Screen::MainMenu);
    assert_eq!(cmds, vec![Command::OpenUrl(a.cfg.links.getting_started.clone())]);
}
