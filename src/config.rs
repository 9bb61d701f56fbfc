//! Client configuration, loaded from TOML.
//!
//! ```toml
//! [server]
//! host = "irc.libera.chat"
//! port = 6667
//!
//! [identity]
//! nick = "terminaltest"
//! user = "terminaltest"
//! realname = "terminal test"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server to connect to.
    pub server: ServerConfig,
    /// Who to register as.
    pub identity: IdentityConfig,
    /// Local line relay.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Diagnostic log.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host is empty".into()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".into()));
        }
        if self.server.max_line_len < 512 {
            return Err(ConfigError::Invalid(format!(
                "server.max_line_len must be at least 512, got {}",
                self.server.max_line_len
            )));
        }
        for (name, value) in [("nick", &self.identity.nick), ("user", &self.identity.user)] {
            if value.is_empty() || value.contains([' ', '\r', '\n', '\0']) {
                return Err(ConfigError::Invalid(format!(
                    "identity.{name} must be a single non-empty word"
                )));
            }
        }
        Ok(())
    }
}

/// Upstream server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Character encoding label, as understood by `encoding_rs`.
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Longest accepted line in bytes, terminator included.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

/// Registration identity.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub nick: String,
    pub user: String,
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Channels joined right after registration.
    #[serde(default)]
    pub channels: Vec<String>,
}

impl IdentityConfig {
    /// Lines sent once when the session starts.
    pub fn login_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("NICK {}", self.nick),
            format!("USER {} 0 * :{}", self.user, self.realname),
        ];
        lines.extend(self.channels.iter().map(|c| format!("JOIN {}", c)));
        lines
    }
}

/// Local relay that forwards typed lines to the server.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_relay_listen")]
    pub listen: SocketAddr,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            listen: default_relay_listen(),
        }
    }
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Append-only file receiving diagnostic records.
    #[serde(default = "default_diagnostics_path")]
    pub diagnostics: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            diagnostics: default_diagnostics_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    6667
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_max_line_len() -> usize {
    8191
}

fn default_realname() -> String {
    "terminal test".to_string()
}

fn default_relay_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8081))
}

fn default_diagnostics_path() -> PathBuf {
    PathBuf::from("ircpipe-diagnostics.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
        [server]
        host = "irc.example.com"

        [identity]
        nick = "terminaltest"
        user = "terminaltest"
    "#;

    #[test]
    fn test_defaults() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.server.port, 6667);
        assert_eq!(config.server.encoding, "utf-8");
        assert_eq!(config.server.max_line_len, 8191);
        assert_eq!(config.identity.realname, "terminal test");
        assert!(config.identity.channels.is_empty());
        assert!(config.relay.enabled);
        assert_eq!(config.relay.listen, "127.0.0.1:8081".parse().unwrap());
        assert_eq!(config.log.diagnostics, PathBuf::from("ircpipe-diagnostics.log"));
    }

    #[test]
    fn test_full() {
        let config = Config::parse(
            r##"
            [server]
            host = "irc.libera.chat"
            port = 6697
            encoding = "latin1"
            max_line_len = 1024

            [identity]
            nick = "amy"
            user = "amy"
            realname = "Amy Pond"
            channels = ["#rust", "#irc"]

            [relay]
            enabled = false
            listen = "127.0.0.1:9000"

            [log]
            diagnostics = "/tmp/diag.log"
            "##,
        )
        .unwrap();
        assert_eq!(config.server.port, 6697);
        assert!(!config.relay.enabled);
        assert_eq!(config.relay.listen.port(), 9000);
        assert_eq!(
            config.identity.login_lines(),
            vec!["NICK amy", "USER amy 0 * :Amy Pond", "JOIN #rust", "JOIN #irc"]
        );
    }

    #[test]
    fn test_invalid() {
        let empty_nick = "[server]\nhost = \"x\"\n[identity]\nnick = \"\"\nuser = \"u\"\n";
        assert!(matches!(Config::parse(empty_nick), Err(ConfigError::Invalid(_))));

        let spaced_user = "[server]\nhost = \"x\"\n[identity]\nnick = \"n\"\nuser = \"a b\"\n";
        assert!(matches!(Config::parse(spaced_user), Err(ConfigError::Invalid(_))));

        let zero_port = "[server]\nhost = \"x\"\nport = 0\n[identity]\nnick = \"n\"\nuser = \"u\"\n";
        assert!(matches!(Config::parse(zero_port), Err(ConfigError::Invalid(_))));

        let empty_host = "[server]\nhost = \" \"\n[identity]\nnick = \"n\"\nuser = \"u\"\n";
        assert!(matches!(Config::parse(empty_host), Err(ConfigError::Invalid(_))));

        let err = Config::parse("[server]\nhost = \"x\"\n");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.host, "irc.example.com");

        assert!(matches!(
            Config::load("/nonexistent/ircpipe.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
