//! Runtime configuration resolved from flags and the environment.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

/// API root used when neither `--api-url` nor `TICKIT_API_URL` is given.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Refresh period of `watch` when `--interval-ms` is not given.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Environment variable naming a directory to record cassettes into.
pub const RECORD_ENV: &str = "TICKIT_RECORD";

/// Environment variable naming a cassette file or directory to replay.
pub const REPLAY_ENV: &str = "TICKIT_REPLAY";

/// Where port calls go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Talk to the real server.
    Live,
    /// Talk to the real server and record every call under this directory.
    Record(PathBuf),
    /// Serve every call from the cassettes at this path.
    Replay(PathBuf),
}

/// Resolved configuration for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API root without a trailing slash.
    pub api_url: String,
    /// Adapter selection.
    pub mode: Mode,
}

impl Config {
    /// Validates `api_url` and reads the record/replay variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute http(s) URL or if both
    /// `TICKIT_RECORD` and `TICKIT_REPLAY` are set.
    pub fn resolve(api_url: &str) -> Result<Self, String> {
        Self::from_parts(
            api_url,
            std::env::var_os(RECORD_ENV).map(PathBuf::from),
            std::env::var_os(REPLAY_ENV).map(PathBuf::from),
        )
    }

    fn from_parts(
        api_url: &str,
        record: Option<PathBuf>,
        replay: Option<PathBuf>,
    ) -> Result<Self, String> {
        let parsed = Url::parse(api_url).map_err(|e| format!("Invalid API URL {api_url:?}: {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("Invalid API URL {api_url:?}: scheme must be http or https"));
        }
        let mode = match (record, replay) {
            (Some(_), Some(_)) => {
                return Err(format!("{RECORD_ENV} and {REPLAY_ENV} cannot both be set"));
            }
            (Some(dir), None) => Mode::Record(dir),
            (None, Some(path)) => Mode::Replay(path),
            (None, None) => Mode::Live,
        };
        Ok(Self { api_url: api_url.trim_end_matches('/').to_string(), mode })
    }
}
