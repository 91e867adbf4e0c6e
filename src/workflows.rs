//! Per-workflow drafts, their forms and field validators.
//!
//! Each "new X" workflow starts from `Draft::default()` (or a draft staged
//! from an existing entity when editing), so nothing typed in an earlier
//! attempt can leak into the next one.

use crate::{
    api::{Environment, Machine, NewEnvironment, NewMachine, NewService},
    form::{Choice, Field, FieldValue, Form},
};

/// Machine role options as (label, backend type).
pub const MACHINE_TYPES: [(&str, &str); 3] = [
    ("Server", "workload"),
    ("Load Balancer", "lettuce"),
    ("Local Machine", "local_machine"),
];

/// Scratch values of the add-machine workflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineDraft {
    pub machine_type: String,
    pub name: String,
    pub confirmed: bool,
}

impl Default for MachineDraft {
    fn default() -> Self {
        Self {
            machine_type: MACHINE_TYPES[0].1.into(),
            name: String::new(),
            confirmed: true,
        }
    }
}

impl MachineDraft {
    pub fn to_request(&self) -> NewMachine {
        NewMachine {
            name: self.name.clone(),
            types: vec![self.machine_type.clone()],
        }
    }
}

/// Scratch values of the add-service workflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceDraft {
    pub name: String,
    pub git_url: String,
    pub confirmed: bool,
}

impl Default for ServiceDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            git_url: String::new(),
            confirmed: true,
        }
    }
}

impl ServiceDraft {
    pub fn to_request(&self) -> NewService {
        NewService {
            name: self.name.clone(),
            git_url: self.git_url.clone(),
        }
    }
}

/// Scratch values of the add/edit-environment workflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentDraft {
    /// Environment being edited; `None` when creating.
    pub original: Option<Environment>,
    pub service_id: String,
    pub name: String,
    pub branch: String,
    pub port: String,
    pub domain: String,
    pub machine_ids: Vec<String>,
    pub confirmed: bool,
}

impl EnvironmentDraft {
    /// Empty draft scoped to `service_id`.
    pub fn new(service_id: &str) -> Self {
        Self {
            original: None,
            service_id: service_id.into(),
            name: String::new(),
            branch: String::new(),
            port: String::new(),
            domain: String::new(),
            machine_ids: Vec::new(),
            confirmed: true,
        }
    }

    /// Draft pre-filled from an existing environment.
    pub fn editing(env: &Environment) -> Self {
        Self {
            original: Some(env.clone()),
            service_id: env.service_id.clone(),
            name: env.name.clone(),
            branch: env.branch.clone(),
            port: env.port.clone(),
            domain: env.domains.first().cloned().unwrap_or_default(),
            machine_ids: env.machine_ids.clone(),
            confirmed: true,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    fn domains(&self) -> Vec<String> {
        if self.domain.is_empty() {
            Vec::new()
        } else {
            vec![self.domain.clone()]
        }
    }

    pub fn to_request(&self) -> NewEnvironment {
        NewEnvironment {
            service_id: self.service_id.clone(),
            name: self.name.clone(),
            branch: self.branch.clone(),
            git_tag: String::new(),
            domains: self.domains(),
            port: self.port.clone(),
            machine_ids: self.machine_ids.clone(),
        }
    }

    /// Full environment for `PUT /environment`; untouched fields are kept.
    pub fn to_update(&self) -> Environment {
        let base = self.original.clone().unwrap_or_default();
        let mut domains = base.domains.clone();
        // Only the first domain is editable here.
        match (domains.is_empty(), self.domain.is_empty()) {
            (_, true) if domains.len() <= 1 => domains.clear(),
            (_, true) => {
                domains.remove(0);
            }
            (true, false) => domains.push(self.domain.clone()),
            (false, false) => domains[0] = self.domain.clone(),
        }
        Environment {
            name: self.name.clone(),
            branch: self.branch.clone(),
            port: self.port.clone(),
            domains,
            machine_ids: self.machine_ids.clone(),
            service_id: self.service_id.clone(),
            ..base
        }
    }
}

/// Something the operator asked to delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteTarget {
    Machine { id: String, name: String },
    Environment { id: String, name: String },
}

impl DeleteTarget {
    pub fn describe(&self) -> String {
        match self {
            DeleteTarget::Machine { name, .. } => format!("machine \"{name}\""),
            DeleteTarget::Environment { name, .. } => format!("environment \"{name}\""),
        }
    }
}

/// Scratch values of a delete confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteDraft {
    pub target: DeleteTarget,
    pub confirmed: bool,
}

fn required(v: &FieldValue) -> Result<(), String> {
    if v.as_text().is_empty() {
        Err("This field is required".into())
    } else {
        Ok(())
    }
}

fn machine_name(v: &FieldValue) -> Result<(), String> {
    required(v)?;
    if v
        .as_text()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        Ok(())
    } else {
        Err("Use letters, digits, '-', '_' or '.' only".into())
    }
}

fn git_url(v: &FieldValue) -> Result<(), String> {
    required(v)?;
    let s = v.as_text();
    let known = ["https://", "http://", "ssh://", "git://", "git@"];
    if known.iter().any(|p| s.starts_with(p)) && !s.contains(char::is_whitespace) {
        Ok(())
    } else {
        Err("Expected a git URL such as https://github.com/org/repo.git".into())
    }
}

fn port(v: &FieldValue) -> Result<(), String> {
    match v.as_text().parse::<u16>() {
        Ok(p) if p > 0 => Ok(()),
        _ => Err("Port must be a number between 1 and 65535".into()),
    }
}

fn domain(v: &FieldValue) -> Result<(), String> {
    let s = v.as_text();
    if s.is_empty() {
        return Ok(());
    }
    if s.contains("://") || s.contains('/') || s.contains(char::is_whitespace) {
        return Err("Enter a bare domain like project.com (no scheme or path)".into());
    }
    if !s.contains('.') {
        return Err("Domain needs at least one dot".into());
    }
    Ok(())
}

/// Multi-select options for the known machines, valued by machine id.
pub fn machine_choices(machines: &[Machine]) -> Vec<Choice> {
    machines
        .iter()
        .map(|m| {
            let label = if m.vpn_ip.is_empty() {
                m.name.clone()
            } else {
                format!("{} ({})", m.name, m.vpn_ip)
            };
            Choice::new(label, m.id.clone())
        })
        .collect()
}

pub fn machine_form(draft: MachineDraft) -> Form<MachineDraft> {
    let types = MACHINE_TYPES
        .iter()
        .map(|(label, value)| Choice::new(*label, *value))
        .collect();
    let fields = vec![
        Field::select(
            "type",
            "Choose Machine Type",
            types,
            &draft.machine_type,
            |d: &mut MachineDraft, v| d.machine_type = v.into_text(),
        ),
        Field::text("name", "Machine Name", &draft.name, |d: &mut MachineDraft, v| {
            d.name = v.into_text()
        })
        .placeholder("edge-1")
        .validate(machine_name),
        Field::confirm(
            "done",
            "Add a new machine?",
            "Add",
            "Cancel",
            draft.confirmed,
            |d: &mut MachineDraft, v| d.confirmed = v == FieldValue::Flag(true),
        ),
    ];
    Form::new("Add Machine", draft, fields)
}

pub fn service_form(draft: ServiceDraft) -> Form<ServiceDraft> {
    let fields = vec![
        Field::text("name", "Service Name", &draft.name, |d: &mut ServiceDraft, v| {
            d.name = v.into_text()
        })
        .validate(required),
        Field::text("git_url", "Git URL", &draft.git_url, |d: &mut ServiceDraft, v| {
            d.git_url = v.into_text()
        })
        .placeholder("https://github.com/org/repo.git")
        .validate(git_url),
        Field::confirm(
            "done",
            "Add a new service?",
            "Add",
            "Cancel",
            draft.confirmed,
            |d: &mut ServiceDraft, v| d.confirmed = v == FieldValue::Flag(true),
        ),
    ];
    Form::new("Add Service", draft, fields)
}

/// Key of the machines multi-select, for option refreshes.
pub const ENV_MACHINES_FIELD: &str = "machines";

pub fn environment_form(draft: EnvironmentDraft, machines: &[Machine]) -> Form<EnvironmentDraft> {
    let (title, question, button) = if draft.is_edit() {
        ("Edit Environment", "Save changes?", "Save")
    } else {
        ("Add Environment", "Add a new environment?", "Add")
    };
    let fields = vec![
        Field::text("name", "Environment Name", &draft.name, |d: &mut EnvironmentDraft, v| {
            d.name = v.into_text()
        })
        .validate(required),
        Field::text("branch", "Branch", &draft.branch, |d: &mut EnvironmentDraft, v| {
            d.branch = v.into_text()
        })
        .placeholder("main, master, dev, etc")
        .validate(required),
        Field::text("port", "Port", &draft.port, |d: &mut EnvironmentDraft, v| {
            d.port = v.into_text()
        })
        .placeholder("4008, 5005, etc")
        .validate(port),
        Field::text("domain", "Domain", &draft.domain, |d: &mut EnvironmentDraft, v| {
            d.domain = v.into_text()
        })
        .description(
            "Without https, e.g. project.com; its DNS A record must point at the load balancer",
        )
        .placeholder("project.com")
        .validate(domain),
        Field::multi_select(
            ENV_MACHINES_FIELD,
            "Choose Servers to Deploy",
            machine_choices(machines),
            &draft.machine_ids,
            |d: &mut EnvironmentDraft, v| d.machine_ids = v.into_choices(),
        ),
        Field::confirm(
            "done",
            question,
            button,
            "Cancel",
            draft.confirmed,
            |d: &mut EnvironmentDraft, v| d.confirmed = v == FieldValue::Flag(true),
        ),
    ];
    Form::new(title, draft, fields)
}

pub fn delete_form(target: DeleteTarget) -> Form<DeleteDraft> {
    let question = format!("Delete {}?", target.describe());
    let draft = DeleteDraft {
        target,
        confirmed: false,
    };
    let fields = vec![Field::confirm(
        "done",
        &question,
        "Delete",
        "Cancel",
        draft.confirmed,
        |d: &mut DeleteDraft, v| d.confirmed = v == FieldValue::Flag(true),
    )];
    Form::new("Confirm Deletion", draft, fields)
}
