//! Plain-text instructions shown after a machine is added or a deploy is queued.

use std::io::{self, Write};

use crate::api::{Environment, Machine};

/// Setup steps for a freshly created machine.
pub fn join_hint(machine: &Machine) -> String {
    let command = if machine.join_url.is_empty() {
        "curl turbocloud.dev/setup | bash".to_string()
    } else {
        format!("curl -sL {} | bash", machine.join_url)
    };
    format!(
        "Connect machine \"{}\" to the VPN\n\n\
         • SSH into the server\n\
         • Run the command:\n\n    {command}\n\n\
         • Once provisioning finishes the machine shows status Online in Machines\n",
        machine.name
    )
}

/// Notice for a deployment that was accepted by the backend.
pub fn deployment_hint(env: &Environment) -> String {
    let mut text = format!(
        "Deployment of environment \"{}\" was scheduled\n\n",
        env.name
    );
    if !env.branch.is_empty() {
        text.push_str(&format!("  Branch:  {}\n", env.branch));
    }
    if !env.domains.is_empty() {
        text.push_str(&format!("  Domains: {}\n", env.domains.join(", ")));
    }
    text.push_str("\nFollow its status in the environment list.\n");
    text
}

/// Write a hint followed by the dismiss prompt.
pub fn print_hint<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    writeln!(out)?;
    for line in text.lines() {
        writeln!(out, "  {line}")?;
    }
    writeln!(out)?;
    write!(out, "  Press Enter or Esc to continue... ")?;
    out.flush()
}
