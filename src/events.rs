//! Screen identifiers and session-wide UI state.

use chrono::{DateTime, Local};

/// The view currently owning the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    MainMenu,
    MachineList,
    AddMachineForm,
    /// Post-creation instructions with the machine's join URL.
    MachineJoinHint,
    ServiceList,
    AddServiceForm,
    EnvironmentList,
    AddEnvironmentForm,
    EnvironmentMenu,
    EditEnvironmentForm,
    DeleteConfirmation,
    DeploymentScheduled,
}

impl Screen {
    /// Every screen, for exhaustive table tests.
    #[cfg(test)]
    pub const ALL: [Screen; 12] = [
        Screen::MainMenu,
        Screen::MachineList,
        Screen::AddMachineForm,
        Screen::MachineJoinHint,
        Screen::ServiceList,
        Screen::AddServiceForm,
        Screen::EnvironmentList,
        Screen::AddEnvironmentForm,
        Screen::EnvironmentMenu,
        Screen::EditEnvironmentForm,
        Screen::DeleteConfirmation,
        Screen::DeploymentScheduled,
    ];

    /// Breadcrumb shown at the top of the screen.
    pub fn breadcrumb(self) -> &'static str {
        match self {
            Screen::MainMenu => "TurboCloud",
            Screen::MachineList => "TurboCloud > Machines",
            Screen::AddMachineForm | Screen::MachineJoinHint => "TurboCloud > Add Machine",
            Screen::ServiceList => "TurboCloud > Services",
            Screen::AddServiceForm => "TurboCloud > Add Service",
            Screen::EnvironmentList => "TurboCloud > Services > Environments",
            Screen::AddEnvironmentForm => "TurboCloud > Services > Add Environment",
            Screen::EnvironmentMenu => "TurboCloud > Services > Environment",
            Screen::EditEnvironmentForm => "TurboCloud > Services > Edit Environment",
            Screen::DeleteConfirmation => "TurboCloud > Delete",
            Screen::DeploymentScheduled => "TurboCloud > Services > Deploy",
        }
    }

    /// Short name for the status bar.
    pub fn name(self) -> &'static str {
        match self {
            Screen::MainMenu => "Menu",
            Screen::MachineList => "Machines",
            Screen::AddMachineForm => "AddMachine",
            Screen::MachineJoinHint => "JoinMachine",
            Screen::ServiceList => "Services",
            Screen::AddServiceForm => "AddService",
            Screen::EnvironmentList => "Environments",
            Screen::AddEnvironmentForm => "AddEnvironment",
            Screen::EnvironmentMenu => "Environment",
            Screen::EditEnvironmentForm => "EditEnvironment",
            Screen::DeleteConfirmation => "Delete",
            Screen::DeploymentScheduled => "Deploy",
        }
    }

    /// Where the cancel key leads. `None` for the root and for
    /// [`Screen::DeleteConfirmation`], whose target is the screen that
    /// opened it.
    pub fn parent(self) -> Option<Screen> {
        match self {
            Screen::MainMenu | Screen::DeleteConfirmation => None,
            Screen::MachineList
            | Screen::AddMachineForm
            | Screen::MachineJoinHint
            | Screen::ServiceList
            | Screen::AddServiceForm => Some(Screen::MainMenu),
            Screen::EnvironmentList => Some(Screen::ServiceList),
            Screen::AddEnvironmentForm | Screen::EnvironmentMenu | Screen::DeploymentScheduled => {
                Some(Screen::EnvironmentList)
            }
            Screen::EditEnvironmentForm => Some(Screen::EnvironmentMenu),
        }
    }

    pub fn is_form(self) -> bool {
        matches!(
            self,
            Screen::AddMachineForm
                | Screen::AddServiceForm
                | Screen::AddEnvironmentForm
                | Screen::EditEnvironmentForm
                | Screen::DeleteConfirmation
        )
    }

    /// Transient screens printed outside the managed render loop.
    pub fn is_hint(self) -> bool {
        matches!(self, Screen::MachineJoinHint | Screen::DeploymentScheduled)
    }

    /// Screens kept fresh by the refresh scheduler.
    pub fn is_live(self) -> bool {
        matches!(self, Screen::MachineList | Screen::EnvironmentList)
    }
}

/// A transient inline message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

/// UI state shared with the renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    /// The single active screen.
    pub screen: Screen,
    /// Terminal size from the last resize.
    pub width: u16,
    pub height: u16,
    /// Status bar text.
    pub status: String,
    /// Error or info notice shown above the status bar.
    pub notice: Option<Notice>,
    /// Time of the last successful live-data load.
    pub last_refresh: Option<DateTime<Local>>,
}

impl UiState {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: Screen::MainMenu,
            width,
            height,
            status: "Ready".into(),
            notice: None,
            last_refresh: None,
        }
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: true,
        });
    }

    pub fn clear_error(&mut self) {
        if self.notice.as_ref().is_some_and(|n| n.is_error) {
            self.notice = None;
        }
    }
}
