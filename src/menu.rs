//! Static menu rows for the main menu and the environment menu.

use crate::table::Identify;

/// What a main menu row does when chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MainAction {
    GettingStarted,
    AddMachine,
    Machines,
    AddService,
    Services,
    Docs,
}

/// What an environment menu row does when chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvAction {
    Deploy,
    Edit,
    Delete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem<A> {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub action: A,
}

impl<A> Identify for MenuItem<A> {
    fn identity(&self) -> &str {
        self.key
    }

    fn filter_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

pub fn main_menu() -> Vec<MenuItem<MainAction>> {
    vec![
        MenuItem {
            key: "getting-started",
            title: "Getting Started",
            description: "How to deploy the first project",
            action: MainAction::GettingStarted,
        },
        MenuItem {
            key: "add-machine",
            title: "Add Machine",
            description: "Add a server, load balancer or local machine",
            action: MainAction::AddMachine,
        },
        MenuItem {
            key: "machines",
            title: "Machines",
            description: "List machines and their usage",
            action: MainAction::Machines,
        },
        MenuItem {
            key: "add-service",
            title: "Add Service",
            description: "Deploy a new service",
            action: MainAction::AddService,
        },
        MenuItem {
            key: "services",
            title: "Services",
            description: "Deploy and manage services",
            action: MainAction::Services,
        },
        MenuItem {
            key: "docs",
            title: "Docs",
            description: "Open the documentation",
            action: MainAction::Docs,
        },
    ]
}

pub fn environment_menu() -> Vec<MenuItem<EnvAction>> {
    vec![
        MenuItem {
            key: "deploy",
            title: "Deploy",
            description: "Schedule a deployment of this environment",
            action: EnvAction::Deploy,
        },
        MenuItem {
            key: "edit",
            title: "Edit",
            description: "Change branch, port, domain or servers",
            action: EnvAction::Edit,
        },
        MenuItem {
            key: "delete",
            title: "Delete",
            description: "Remove this environment",
            action: EnvAction::Delete,
        },
    ]
}
