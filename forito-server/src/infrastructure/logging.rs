use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

pub(crate) fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(default_level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

/// The driver logs every connection-pool event at the configured level;
/// keep it at `warn` unless `RUST_LOG` asks for more.
fn default_directives(level: &str) -> String {
    format!("{level},mongodb=warn")
}

#[cfg(test)]
mod tests {
    use super::default_directives;

    #[test]
    fn driver_noise_is_capped_by_default() {
        assert_eq!(default_directives("debug"), "debug,mongodb=warn");
    }
}
