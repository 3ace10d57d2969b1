// fwsync-agent: one reconciliation run.
//
// Triggered by the scheduler with `{ "domains": [...] }` on stdin;
// configured entirely from FWSYNC_* environment variables. The process is
// stateless between invocations -- the live firewall state is the only
// persisted state.

use tracing::{debug, info};

use fwsync::config;
use fwsync::error::AgentError;
use fwsync::init_tracing;
use fwsync::payload::{self, SyncEvent};
use fwsync_api::ProviderClient;
use fwsync_core::{SegmentResult, Syncer, load_catalog};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("fwsync-agent: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run() -> Result<(), AgentError> {
    let config = config::load()?;
    init_tracing(&config.log);

    let event: SyncEvent = payload::read(std::io::stdin().lock())?;
    info!(
        boundary = %config.boundary_name,
        domains = event.domains.len(),
        "starting reconciliation run"
    );

    // Catalog and client are (re)constructed per run: catalog edits take
    // effect immediately, and the client handle is scoped to this run.
    let templates = load_catalog(&config.catalog_path)?;
    let api_key = config.api_key()?;
    let client = ProviderClient::from_api_key(&config.provider_url, &api_key, &config.transport())?;

    let syncer = Syncer::new(&client, config.boundary_name.as_str());
    let report = syncer.run(&event.domains, &templates).await?;

    debug!(
        report = %serde_json::to_string(&report).unwrap_or_default(),
        "run report"
    );
    info!(
        segments = report.segments.len(),
        added = report.total_added(),
        clean = report.is_clean(),
        "reconciliation run finished"
    );

    if report.is_clean() {
        Ok(())
    } else {
        let failed_segments = report
            .segments
            .iter()
            .filter(|s| match &s.result {
                SegmentResult::Reconciled { failures, .. } => !failures.is_empty(),
                SegmentResult::Failed { .. } => true,
            })
            .count();
        Err(AgentError::Unclean {
            failed_segments,
            total_segments: report.segments.len(),
        })
    }
}
