use tracing::Level;
use tracing_forest::ForestLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub fn setup_tracing() {
    setup_tracing_with_log_level(Level::INFO);
}

pub fn setup_tracing_with_log_level(level: Level) {
    // Set up tracing:
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},p3_=warn", level)));
    let _ = Registry::default()
        .with(env_filter)
        .with(ForestLayer::default())
        .try_init();
}

/// File name of the markdown report of a zkVM: lowercase, spaces replaced by underscores.
pub fn report_file_name(zkvm_name: &str) -> String {
    format!("{}.md", zkvm_name.to_lowercase().replace(' ', "_"))
}

/// GitHub-style markdown anchor of a heading.
pub fn markdown_anchor(heading: &str) -> String {
    heading.to_lowercase().replace(' ', "-")
}
