use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub host: String,
    pub port: u16,

    // Demo dataset
    pub seed: u32,
    pub seed_count: usize,
}

impl Config {
    /// Load configuration from environment variables. Every setting has a
    /// default; malformed numbers panic with a clear message at startup.
    pub fn from_env() -> Self {
        Self {
            host: env::var("SIGHTLINE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SIGHTLINE_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SIGHTLINE_PORT must be a number"),
            seed: env::var("SIGHTLINE_SEED")
                .unwrap_or_else(|_| "123456".to_string())
                .parse()
                .expect("SIGHTLINE_SEED must be a 32-bit unsigned integer"),
            seed_count: env::var("SIGHTLINE_SEED_COUNT")
                .unwrap_or_else(|_| "40".to_string())
                .parse()
                .expect("SIGHTLINE_SEED_COUNT must be a number"),
        }
    }
}
