use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub session_secret: String,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            database_max_connections: optional_number("DATABASE_MAX_CONNECTIONS", 10)?,
            session_secret: std::env::var("SESSION_SECRET")
                .context("Cannot load SESSION_SECRET env variable")?,
            session_ttl_hours: optional_number("SESSION_TTL_HOURS", 168)?,
        })
    }
}

fn optional_number<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} must be a number", name)),
        Err(_) => Ok(default),
    }
}
