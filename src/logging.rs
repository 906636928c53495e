/// Install the tracing subscriber for the CLI and other standalone entry
/// points. Filter comes from `MUSAEUM_LOG`, defaulting to info for this
/// crate and warnings from sqlx.
pub fn init() {
    let _ = tracing_log::LogTracer::init();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("MUSAEUM_LOG").unwrap_or_else(|_| "musaeum=info,sqlx=warn".into()),
        )
        .json()
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .try_init();
}
