// Invocation payloads.
//
// Both agents are triggered with a JSON document on stdin; the scheduler
// or provisioning framework owns delivery.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::AgentError;

/// Reconciliation trigger: the ordered list of trusted domains to resolve.
#[derive(Debug, Deserialize)]
pub struct SyncEvent {
    pub domains: Vec<String>,
}

/// Provisioning lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// Boundary provisioning trigger, delivered by the lifecycle hook.
#[derive(Debug, Deserialize)]
pub struct ProvisionEvent {
    pub request_type: RequestType,
    pub boundary_name: String,
}

/// Read and parse a payload from the given reader (normally stdin).
pub fn read<T: DeserializeOwned>(mut reader: impl std::io::Read) -> Result<T, AgentError> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    Ok(serde_json::from_str(&raw)?)
}
