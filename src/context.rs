//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::clock::SystemClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::http::HttpTaskService;
use crate::adapters::recording::clock::RecordingClock;
use crate::adapters::recording::filesystem::RecordingFileSystem;
use crate::adapters::recording::remote::RecordingTaskService;
use crate::adapters::replaying::{ReplayingClock, ReplayingFileSystem, ReplayingTaskService};
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::Config;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::remote::TaskService;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// The to-do server.
    pub remote: Box<dyn TaskService>,
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Filesystem for import and export files.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a live context talking to the server at `config.api_url`.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self {
            remote: Box::new(HttpTaskService::new(config.api_url.as_str())),
            clock: Box::new(SystemClock),
            fs: Box::new(LiveFileSystem),
        }
    }

    /// Creates a live context that records every port call under `root`.
    ///
    /// The returned session must be finished after the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(config: &Config, root: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(root, &config.api_url)?;
        let live = Self::live(config);
        let ctx = Self {
            remote: Box::new(RecordingTaskService::new(live.remote, Arc::clone(&session.remote))),
            clock: Box::new(RecordingClock::new(live.clock, Arc::clone(&session.clock))),
            fs: Box::new(RecordingFileSystem::new(live.fs, Arc::clone(&session.fs))),
        };
        Ok((ctx, session))
    }

    /// Creates a context that serves every call from the cassettes at `path`.
    ///
    /// `path` is a single cassette file or a directory written by a recording
    /// session. Each port gets its own cursor over the same interactions.
    ///
    /// # Errors
    ///
    /// Returns an error if a cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        Ok(Self {
            remote: Box::new(ReplayingTaskService::new(CassetteReplayer::from_path(path)?)),
            clock: Box::new(ReplayingClock::new(CassetteReplayer::from_path(path)?)),
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::from_path(path)?)),
        })
    }
}
