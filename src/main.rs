//! CampusHub
//!
//! Main application entry point: opens the configured store, reconciles it,
//! reports its state and flushes it back.

use anyhow::Context;
use tracing::{info, warn};

use campus_hub::{config::Settings, utils::helpers::format_timestamp, utils::logging, CampusHub};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load settings")?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", campus_hub::info());
    info!(backend = ?settings.storage.backend, "Opening event store...");

    let hub = CampusHub::open(settings).await.context("failed to open event store")?;

    let report = hub.reconcile_report().clone();
    info!(
        events = report.events_loaded,
        registrations = report.registrations_loaded,
        seats_corrected = report.seats_corrected,
        duplicates_demoted = report.duplicates_demoted,
        orphaned = report.orphaned_registrations,
        "Store reconciled"
    );
    if report.over_capacity_events > 0 {
        warn!(events = report.over_capacity_events, "Events hold more registrations than seats");
    }

    for event in hub.list_events_by_schedule().await {
        let registered = hub.get_registered_count(&event.id).await?;
        info!(
            event_id = %event.id,
            title = %event.title,
            date = %event.date,
            time = %event.time,
            status = %event.status,
            registered,
            remaining_seats = event.remaining_seats,
            full = event.is_full(),
            updated = %format_timestamp(event.updated_at),
            "Event"
        );
    }

    let violations = hub.manager().read(|ledger| ledger.invariant_violations()).await;
    for violation in &violations {
        warn!(%violation, "Consistency check failed");
    }

    hub.shutdown().await.context("failed to flush event store")?;
    info!("{} has been shut down.", campus_hub::NAME);

    Ok(())
}
