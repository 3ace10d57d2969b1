// fwsync-provision: boundary lifecycle hook.
//
// Ensures exactly one boundary of the managed name exists in every
// segment, creating it when absent. No diffing logic lives here; rule
// reconciliation is fwsync-agent's job. Invoked with
// `{ "request_type": "Create"|"Update"|"Delete", "boundary_name": ... }`
// on stdin; Delete is a deliberate no-op (boundaries are never removed by
// this system).

use tracing::info;

use fwsync::config;
use fwsync::error::AgentError;
use fwsync::init_tracing;
use fwsync::payload::{self, ProvisionEvent, RequestType};
use fwsync_api::ProviderClient;
use fwsync_api::types::BoundaryCreate;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("fwsync-provision: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run() -> Result<(), AgentError> {
    let config = config::load()?;
    init_tracing(&config.log);

    let event: ProvisionEvent = payload::read(std::io::stdin().lock())?;

    match event.request_type {
        RequestType::Delete => {
            info!(boundary = %event.boundary_name, "delete request, nothing to do");
            return Ok(());
        }
        RequestType::Create | RequestType::Update => {}
    }

    let api_key = config.api_key()?;
    let client = ProviderClient::from_api_key(&config.provider_url, &api_key, &config.transport())?;

    let segments = client.list_segments().await?;
    info!(
        boundary = %event.boundary_name,
        segments = segments.len(),
        "ensuring boundary exists in every segment"
    );

    for segment in &segments {
        let existing = client
            .find_boundaries(&segment.id, &event.boundary_name)
            .await?;

        if existing.is_empty() {
            let boundary = client
                .create_boundary(
                    &segment.id,
                    &BoundaryCreate {
                        name: event.boundary_name.clone(),
                        description: format!("Managed security boundary for {}", segment.id),
                    },
                )
                .await?;
            info!(segment = %segment.id, boundary = %boundary.id, "boundary created");
        } else {
            info!(segment = %segment.id, "boundary already exists, skipping");
        }
    }

    Ok(())
}
