//! List row types and their identity keys.

use crate::{
    api::{Environment, Machine, Service},
    table::Identify,
};

impl Identify for Machine {
    fn identity(&self) -> &str {
        &self.id
    }

    fn filter_text(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.name,
            self.vpn_ip,
            self.public_ip,
            self.status,
            self.types.join(" ")
        )
    }
}

impl Identify for Service {
    fn identity(&self) -> &str {
        &self.id
    }

    fn filter_text(&self) -> String {
        format!("{} {}", self.name, self.git_url)
    }
}

/// A row of the environment list: the synthetic add row, then environments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvRow {
    Add,
    Env(Environment),
}

const ADD_ROW_ID: &str = "+add-environment";

impl EnvRow {
    /// The rows shown for a service: add row first.
    pub fn for_service(environments: Vec<Environment>) -> Vec<EnvRow> {
        std::iter::once(EnvRow::Add)
            .chain(environments.into_iter().map(EnvRow::Env))
            .collect()
    }
}

impl Identify for EnvRow {
    fn identity(&self) -> &str {
        match self {
            EnvRow::Add => ADD_ROW_ID,
            EnvRow::Env(e) => &e.id,
        }
    }

    fn filter_text(&self) -> String {
        match self {
            EnvRow::Add => "Add Environment".into(),
            EnvRow::Env(e) => format!("{} {} {}", e.name, e.branch, e.domains.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SelectList;

    #[test]
    fn add_row_leads_and_survives_reload() {
        let env = |id: &str| Environment {
            id: id.into(),
            ..Default::default()
        };
        let mut l = SelectList::new(EnvRow::for_service(vec![env("e1")]));
        assert_eq!(l.selected(), Some(&EnvRow::Add));
        l.move_cursor(1);
        l.reload(EnvRow::for_service(vec![env("e0"), env("e1")]));
        assert_eq!(l.selected().map(|r| r.identity()), Some("e1"));
    }
}
