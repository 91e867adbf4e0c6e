//! Deferred side effects and the dispatcher that runs them off the UI thread.

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    api::{
        ApiError, Backend, Environment, NewEnvironment, NewMachine, NewService,
        models::merge_stats,
    },
    message::Message,
};

/// Work requested by the controller. Each command yields exactly one [`Message`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    FetchMachines,
    FetchServices,
    FetchEnvironments { service_id: String },
    CreateMachine(NewMachine),
    CreateService(NewService),
    CreateEnvironment(NewEnvironment),
    UpdateEnvironment(Environment),
    DeleteMachine { id: String },
    DeleteEnvironment { id: String },
    TriggerDeployment { environment_id: String },
    /// Fire a refresh tick after the delay.
    ScheduleTick { after: Duration },
    /// Open a URL in the system browser.
    OpenUrl(String),
}

/// Which command produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    FetchMachines,
    FetchServices,
    FetchEnvironments,
    CreateMachine,
    CreateService,
    CreateEnvironment,
    UpdateEnvironment,
    DeleteMachine,
    DeleteEnvironment,
    TriggerDeployment,
    ScheduleTick,
    OpenUrl,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::FetchMachines => CommandKind::FetchMachines,
            Command::FetchServices => CommandKind::FetchServices,
            Command::FetchEnvironments { .. } => CommandKind::FetchEnvironments,
            Command::CreateMachine(_) => CommandKind::CreateMachine,
            Command::CreateService(_) => CommandKind::CreateService,
            Command::CreateEnvironment(_) => CommandKind::CreateEnvironment,
            Command::UpdateEnvironment(_) => CommandKind::UpdateEnvironment,
            Command::DeleteMachine { .. } => CommandKind::DeleteMachine,
            Command::DeleteEnvironment { .. } => CommandKind::DeleteEnvironment,
            Command::TriggerDeployment { .. } => CommandKind::TriggerDeployment,
            Command::ScheduleTick { .. } => CommandKind::ScheduleTick,
            Command::OpenUrl(_) => CommandKind::OpenUrl,
        }
    }
}

/// Why a command failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not open browser: {0}")]
    Browser(String),
}

/// Spawns commands onto the runtime and forwards their results to the UI.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    tx: mpsc::Sender<Message>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>, tx: mpsc::Sender<Message>) -> Self {
        Self { backend, tx }
    }

    /// Run `cmd` concurrently; its single result message is queued when done.
    pub fn dispatch(&self, cmd: Command) {
        let id = Uuid::new_v4();
        let kind = cmd.kind();
        tracing::debug!(%id, ?kind, "dispatch");
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let msg = execute(cmd, backend.as_ref()).await;
            if let Message::Error { cause, .. } = &msg {
                tracing::error!(%id, ?kind, "command failed: {cause}");
            } else {
                tracing::debug!(%id, ?kind, "command done");
            }
            if tx.send(msg).await.is_err() {
                tracing::warn!(%id, "ui gone, dropping result");
            }
        });
    }

    pub fn dispatch_all(&self, cmds: impl IntoIterator<Item = Command>) {
        for cmd in cmds {
            self.dispatch(cmd);
        }
    }
}

/// Perform a command and turn its outcome into exactly one message.
pub async fn execute(cmd: Command, api: &dyn Backend) -> Message {
    let origin = cmd.kind();
    run(cmd, api)
        .await
        .unwrap_or_else(|cause| Message::Error { origin, cause })
}

async fn run(cmd: Command, api: &dyn Backend) -> Result<Message, CommandError> {
    Ok(match cmd {
        Command::FetchMachines => {
            let mut machines = api.list_machines().await?;
            // Stats are decoration; a failure still shows the machines.
            match api.machine_stats().await {
                Ok(stats) => merge_stats(&mut machines, &stats),
                Err(e) => tracing::warn!("machine stats unavailable: {e}"),
            }
            Message::MachinesLoaded(machines)
        }
        Command::FetchServices => Message::ServicesLoaded(api.list_services().await?),
        Command::FetchEnvironments { service_id } => {
            let environments = api.list_environments(&service_id).await?;
            Message::EnvironmentsLoaded {
                service_id,
                environments,
            }
        }
        Command::CreateMachine(req) => Message::MachineCreated(api.create_machine(&req).await?),
        Command::CreateService(req) => Message::ServiceCreated(api.create_service(&req).await?),
        Command::CreateEnvironment(req) => {
            Message::EnvironmentCreated(api.create_environment(&req).await?)
        }
        Command::UpdateEnvironment(env) => {
            Message::EnvironmentUpdated(api.update_environment(&env).await?)
        }
        Command::DeleteMachine { id } => {
            api.delete_machine(&id).await?;
            Message::MachineDeleted { id }
        }
        Command::DeleteEnvironment { id } => {
            api.delete_environment(&id).await?;
            Message::EnvironmentDeleted { id }
        }
        Command::TriggerDeployment { environment_id } => {
            api.trigger_deployment(&environment_id).await?;
            Message::DeploymentTriggered { environment_id }
        }
        Command::ScheduleTick { after } => {
            tokio::time::sleep(after).await;
            Message::Tick(chrono::Local::now())
        }
        Command::OpenUrl(url) => {
            let target = url.clone();
            tokio::task::spawn_blocking(move || webbrowser::open(&target))
                .await
                .map_err(|e| CommandError::Browser(e.to_string()))?
                .map_err(|e| CommandError::Browser(e.to_string()))?;
            Message::BrowserOpened { url }
        }
    })
}
