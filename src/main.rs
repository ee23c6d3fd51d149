use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::{Value, json};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use update_router::api::HttpApiClient;
use update_router::core::config::{self, ResolvedConfig, RouterConfig};
use update_router::core::{Environment, NavigationCoordinator, Project};
use update_router::telemetry::{LogTracker, NoopTracker, Tracker};

#[derive(Parser)]
#[command(
    name = "update-router",
    about = "Routes intercepted project update navigations"
)]
struct Args {
    /// Id of the project whose updates are shown
    #[arg(long)]
    project_id: String,

    /// Updates page loaded in the embedded view
    #[arg(long)]
    updates_url: String,

    /// Intercepted URL to route (repeatable, processed in order)
    #[arg(short, long = "intercept")]
    intercept: Vec<String>,

    /// API base URL (overrides config and env)
    #[arg(long)]
    base_url: Option<String>,

    /// Stop after this many milliseconds without output
    #[arg(long, default_value_t = 5000)]
    wait_ms: u64,
}

fn init_logging(config: &ResolvedConfig) {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let level = config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Info);

    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

fn print_event(event: &str, payload: Value) {
    println!("{}", json!({ "event": event, "payload": payload }));
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Loaded before the logger exists, so problems are reported once it does
    let loaded = config::load_config();
    let file_config = loaded.as_ref().ok();
    let default_config = RouterConfig::default();
    let resolved = config::resolve(
        file_config.unwrap_or(&default_config),
        args.base_url.as_deref(),
    );
    init_logging(&resolved);

    match &loaded {
        Ok(_) => log::info!(
            "Config path: {}",
            config::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults".to_string())
        ),
        Err(e) => log::warn!("{e}; using defaults"),
    }

    log::info!("update-router starting against {}", resolved.api_base_url);

    let client = Arc::new(HttpApiClient::new(
        Some(resolved.api_base_url.clone()),
        resolved.oauth_token.clone(),
    ));
    let tracker: Arc<dyn Tracker> = if resolved.telemetry_enabled {
        Arc::new(LogTracker)
    } else {
        Arc::new(NoopTracker)
    };
    let env = Environment {
        client,
        tracker,
        output_capacity: resolved.output_capacity,
    };

    let (coordinator, mut outputs) = NavigationCoordinator::spawn(env);
    let mut web_view_url = coordinator.web_view_url();

    coordinator.startup(Project::new(args.project_id, args.updates_url));
    for url in &args.intercept {
        coordinator.intercept(url);
    }

    let idle = Duration::from_millis(args.wait_ms);
    loop {
        tokio::select! {
            changed = web_view_url.changed() => {
                if changed.is_err() {
                    break;
                }
                let url = web_view_url.borrow_and_update().clone();
                if let Some(url) = url {
                    print_event("web_view_url", json!(url));
                }
            }
            Some(update) = outputs.start_comments.recv() => {
                print_event("start_comments", json!({ "update": update }));
            }
            Some((project, update)) = outputs.start_update.recv() => {
                print_event("start_update", json!({ "project": project, "update": update }));
            }
            _ = tokio::time::sleep(idle) => break,
        }
    }

    log::info!("Session {} finished", coordinator.session_id());
    coordinator.shutdown();
    Ok(())
}
