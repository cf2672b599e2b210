use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

/// Tokens live between one hour and one year.
const JWT_TTL_HOURS_RANGE: std::ops::RangeInclusive<i64> = 1..=24 * 365;

#[derive(Clone)]
pub struct Settings {
    pub port: u16,
    pub addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let port: u16 = parse_or("PORT", 3000);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let jwt_ttl_hours = jwt_ttl_hours(env::var("JWT_TTL_HOURS").ok().as_deref())?;

        Ok(Self {
            port,
            addr,
            database_url,
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5),
            jwt_secret,
            jwt_ttl_hours,
        })
    }

    /// Settings for tests that build the router without touching the environment.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: String::new(),
            max_connections: 1,
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_hours: 1,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn jwt_ttl_hours(raw: Option<&str>) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(24);
    };
    let hours: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("JWT_TTL_HOURS must be an integer, got {:?}", raw))?;
    anyhow::ensure!(
        JWT_TTL_HOURS_RANGE.contains(&hours),
        "JWT_TTL_HOURS must be between {} and {}, got {}",
        JWT_TTL_HOURS_RANGE.start(),
        JWT_TTL_HOURS_RANGE.end(),
        hours
    );
    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_to_a_day() {
        assert_eq!(jwt_ttl_hours(None).unwrap(), 24);
        assert_eq!(jwt_ttl_hours(Some("72")).unwrap(), 72);
    }

    #[test]
    fn ttl_out_of_range_fails_at_startup() {
        for raw in ["0", "-5", "9223372036854775807", "8761", "soon"] {
            let err = jwt_ttl_hours(Some(raw)).unwrap_err();
            assert!(err.to_string().contains("JWT_TTL_HOURS"), "{}: {}", raw, err);
        }
    }
}
