use std::str::FromStr;

use tracing::level_filters::LevelFilter;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{name} has an invalid value: {value:?}")]
	Invalid { name: &'static str, value: String },
}

/// Server configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
	/// When unset, posts are kept in memory.
	pub database_url: Option<String>,
	pub database_max_connections: u32,
	pub host: String,
	pub port: u16,
	pub log_level: LevelFilter,
	/// When set, traces are exported to this OTLP collector.
	pub otlp_endpoint: Option<String>,
	pub rate_limit_per_second: u64,
	pub rate_limit_burst: u32,
}

impl Config {
	/// Reads the configuration from environment variables, after
	/// loading a `.env` file if one exists.
	pub fn from_env() -> Result<Self, Error> {
		dotenvy::dotenv().ok();

		Self::from_lookup(|name| std::env::var(name).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let config = Self {
			database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
			database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
			host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".into()),
			port: parse_or(&lookup, "PORT", 3000)?,
			log_level: parse_or(&lookup, "LOG_LEVEL", LevelFilter::INFO)?,
			otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|url| !url.is_empty()),
			rate_limit_per_second: parse_or(&lookup, "RATE_LIMIT_PER_SECOND", 10)?,
			rate_limit_burst: parse_or(&lookup, "RATE_LIMIT_BURST", 50)?,
		};

		if config.rate_limit_per_second == 0 {
			return Err(Error::Invalid {
				name: "RATE_LIMIT_PER_SECOND",
				value: "0".into(),
			});
		}

		if config.rate_limit_burst == 0 {
			return Err(Error::Invalid {
				name: "RATE_LIMIT_BURST",
				value: "0".into(),
			});
		}

		Ok(config)
	}
}

fn parse_or<T: FromStr>(
	lookup: &impl Fn(&str) -> Option<String>,
	name: &'static str,
	default: T,
) -> Result<T, Error> {
	match lookup(name) {
		None => Ok(default),
		Some(value) => value.trim().parse().map_err(|_| Error::Invalid { name, value }),
	}
}
