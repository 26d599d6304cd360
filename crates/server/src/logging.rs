use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, ServerConfig};

pub fn init_tracing(config: &ServerConfig) -> Result<(), ConfigError> {
    // RUST_LOG wins over logging.level when set.
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = config.log_level();
            EnvFilter::try_new(format!("{level},sqlx=warn"))
                .map_err(|e| ConfigError::Invalid(format!("invalid logging.level: {e}")))?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
    Ok(())
}
