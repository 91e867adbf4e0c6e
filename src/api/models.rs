//! Backend entities and request bodies.
//!
//! The backend serialises Go structs without json tags, so every field is
//! renamed to its exported Go name. Nil slices arrive as `null`.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat a JSON `null` as the type's default value.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// A server or local machine attached to the VPN.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    #[serde(rename = "Id", default)]
    pub id: String,
    /// Address inside the VPN.
    #[serde(rename = "VPNIp", default)]
    pub vpn_ip: String,
    #[serde(rename = "PublicIp", default)]
    pub public_ip: String,
    /// Private address inside the data center.
    #[serde(rename = "CloudPrivateIp", default)]
    pub cloud_private_ip: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Types", default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Domains", default, deserialize_with = "null_as_default")]
    pub domains: Vec<String>,
    /// Script URL the machine runs to join the VPN.
    #[serde(rename = "JoinURL", default)]
    pub join_url: String,
    #[serde(rename = "PublicSSHKey", default)]
    pub public_ssh_key: String,
    #[serde(rename = "CPUUsage", default)]
    pub cpu_usage: String,
    #[serde(rename = "MEMUsage", default)]
    pub mem_usage: String,
    #[serde(rename = "DiskUsage", default)]
    pub disk_usage: String,
}

/// One sample from `/machine/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MachineStats {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "MachineId", default)]
    pub machine_id: String,
    #[serde(rename = "CPUUsage", default)]
    pub cpu_usage: i64,
    #[serde(rename = "AvailableMemory", default)]
    pub available_memory: i64,
    #[serde(rename = "TotalMemory", default)]
    pub total_memory: i64,
    #[serde(rename = "AvailableDisk", default)]
    pub available_disk: i64,
    #[serde(rename = "TotalDisk", default)]
    pub total_disk: i64,
}

/// A deployable project backed by a git repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "GitURL", default)]
    pub git_url: String,
    #[serde(rename = "ProjectId", default)]
    pub project_id: String,
}

/// A deployment target of a service (branch + machines + domain).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Branch", default)]
    pub branch: String,
    #[serde(rename = "GitTag", default)]
    pub git_tag: String,
    #[serde(rename = "Domains", default, deserialize_with = "null_as_default")]
    pub domains: Vec<String>,
    #[serde(rename = "MachineIds", default, deserialize_with = "null_as_default")]
    pub machine_ids: Vec<String>,
    #[serde(rename = "Port", default)]
    pub port: String,
    #[serde(rename = "ServiceId", default)]
    pub service_id: String,
    #[serde(rename = "LastDeploymentStatus", default)]
    pub last_deployment_status: String,
}

/// Body of `POST /machine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMachine {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Types")]
    pub types: Vec<String>,
}

/// Body of `POST /service`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewService {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "GitURL")]
    pub git_url: String,
}

/// Body of `POST /environment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEnvironment {
    #[serde(rename = "ServiceId")]
    pub service_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Branch")]
    pub branch: String,
    #[serde(rename = "GitTag")]
    pub git_tag: String,
    #[serde(rename = "Domains")]
    pub domains: Vec<String>,
    #[serde(rename = "Port")]
    pub port: String,
    #[serde(rename = "MachineIds")]
    pub machine_ids: Vec<String>,
}

/// Percentage of a capacity that is in use, e.g. `"37%"`.
fn usage_percent(available: i64, total: i64) -> String {
    if total <= 0 {
        return "-".into();
    }
    let used = (total - available).clamp(0, total);
    format!("{}%", used * 100 / total)
}

/// Copy the latest stats sample of each machine into its usage columns.
pub fn merge_stats(machines: &mut [Machine], stats: &[MachineStats]) {
    for s in stats {
        if let Some(m) = machines.iter_mut().find(|m| m.id == s.machine_id) {
            m.cpu_usage = format!("{}%", s.cpu_usage);
            m.mem_usage = usage_percent(s.available_memory, s.total_memory);
            m.disk_usage = usage_percent(s.available_disk, s.total_disk);
        }
    }
}
