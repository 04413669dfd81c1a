//! Configuration for Intake
//!
//! CLI arguments and environment variable handling using clap. All secret
//! material is loaded here exactly once at startup and handed to the token
//! codec and session validator as explicit constructor inputs; nothing
//! reads configuration globally afterwards.

use clap::Parser;
use std::net::SocketAddr;

use crate::token::DEFAULT_LINK_TTL_SECS;

/// Intake - capability-link gateway for structured service submissions
#[derive(Parser, Debug, Clone)]
#[command(name = "intake")]
#[command(about = "Capability-link gateway for structured service submissions")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "intake")]
    pub mongodb_db: String,

    /// Secret for signing capability links (required in production)
    #[arg(long, env = "LINK_SECRET")]
    pub link_secret: Option<String>,

    /// Capability link TTL in seconds, enforced at verify time
    #[arg(long, env = "LINK_TTL_SECONDS", default_value_t = DEFAULT_LINK_TTL_SECS)]
    pub link_ttl_seconds: u64,

    /// Secret for signing admin session tokens (required in production)
    #[arg(long, env = "SESSION_SECRET")]
    pub session_secret: Option<String>,

    /// Admin session expiry in seconds
    #[arg(long, env = "SESSION_EXPIRY_SECONDS", default_value = "3600")]
    pub session_expiry_seconds: u64,

    /// Public base URL of this service, used to render absolute submission
    /// links (e.g., "https://intake.example.org")
    #[arg(long, env = "PUBLIC_URL")]
    pub public_url: Option<String>,

    /// Enable development mode (runs without MongoDB, uses insecure secrets)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Absolute or relative submission URL for a minted token
    pub fn submit_url(&self, token: &str) -> String {
        match &self.public_url {
            Some(base) => format!("{}/submit/{}", base.trim_end_matches('/'), token),
            None => format!("/submit/{}", token),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode {
            match &self.link_secret {
                None => return Err("LINK_SECRET is required in production mode".to_string()),
                Some(s) if s.len() < 32 => {
                    return Err("LINK_SECRET must be at least 32 characters".to_string())
                }
                _ => {}
            }
            match &self.session_secret {
                None => return Err("SESSION_SECRET is required in production mode".to_string()),
                Some(s) if s.len() < 32 => {
                    return Err("SESSION_SECRET must be at least 32 characters".to_string())
                }
                _ => {}
            }
        }

        if self.link_ttl_seconds == 0 {
            return Err("LINK_TTL_SECONDS must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["intake"])
    }

    #[test]
    fn test_production_requires_secrets() {
        let args = base_args();
        assert!(args.validate().is_err());

        let mut args = base_args();
        args.dev_mode = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_short_secrets_rejected() {
        let mut args = base_args();
        args.link_secret = Some("short".into());
        args.session_secret = Some("also-short".into());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_valid_production_config() {
        let mut args = base_args();
        args.link_secret = Some("link-secret-that-is-at-least-32-chars".into());
        args.session_secret = Some("session-secret-that-is-at-least-32-ch".into());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_submit_url() {
        let mut args = base_args();
        assert_eq!(args.submit_url("tok"), "/submit/tok");

        args.public_url = Some("https://intake.example.org/".into());
        assert_eq!(
            args.submit_url("tok"),
            "https://intake.example.org/submit/tok"
        );
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut args = base_args();
        args.dev_mode = true;
        args.link_ttl_seconds = 0;
        assert!(args.validate().is_err());
    }
}
