//! Everything that can enter the update loop.

use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;

use crate::{
    api::{Environment, Machine, Service},
    worker::{CommandError, CommandKind},
};

/// Input events and completed-command results, consumed in arrival order.
#[derive(Clone, Debug)]
pub enum Message {
    Key(KeyEvent),
    Resize(u16, u16),
    /// A refresh-timer firing.
    Tick(DateTime<Local>),

    MachinesLoaded(Vec<Machine>),
    ServicesLoaded(Vec<Service>),
    EnvironmentsLoaded {
        service_id: String,
        environments: Vec<Environment>,
    },
    MachineCreated(Machine),
    ServiceCreated(Service),
    EnvironmentCreated(Environment),
    EnvironmentUpdated(Environment),
    MachineDeleted {
        id: String,
    },
    EnvironmentDeleted {
        id: String,
    },
    DeploymentTriggered {
        environment_id: String,
    },
    BrowserOpened {
        url: String,
    },

    /// A command failed; `origin` tells the controller which one.
    Error {
        origin: CommandKind,
        cause: CommandError,
    },
}
