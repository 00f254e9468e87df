// Headless driver: load a page snapshot, run the initial render and
// derive pass, evaluate every metric against the server, and optionally
// save the assembled config.
use std::path::Path;
use std::sync::Arc;

use report::charts::TracingRenderer;
use report::config::ReportSettings;
use report::page::PageSnapshot;
use report::services::report_service::ReportService;
use report::services::transport::HttpTransport;
use tracing::info;

const USAGE: &str = "usage: report <snapshot.json> [settings.json] [--save] [--reset]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let save_requested = args.iter().any(|a| a == "--save");
    let reset_flag = args.iter().any(|a| a == "--reset").then_some(true);
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let snapshot_path = positional.first().ok_or(USAGE)?;
    let settings = match positional.get(1) {
        Some(path) => ReportSettings::load(Path::new(path.as_str()))?,
        None => ReportSettings::default(),
    };

    let snapshot = PageSnapshot::load(Path::new(snapshot_path.as_str()))?;
    let (page, fields) = snapshot.into_parts();
    info!(
        company_id = page.company_id,
        version = page.version,
        base_url = %settings.base_url,
        "page snapshot loaded"
    );

    let service = Arc::new(ReportService::new(
        settings.endpoints(),
        page,
        fields,
        Arc::new(HttpTransport::new()),
        Arc::new(TracingRenderer),
    ));

    // initial render pass mirrors what the page does on load
    service.render_donuts().await;
    service.render_sales().await;
    service.refresh_derived().await;
    service.recompute_iht().await;

    for (id, outcome) in Arc::clone(&service).evaluate_all().await {
        info!(metric = id.key(), ?outcome, "evaluation finished");
    }

    if save_requested {
        service.save(reset_flag).await?;
        info!("report config saved");
    }

    Ok(())
}
