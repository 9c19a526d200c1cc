//! Cassettes: YAML files of recorded port interactions, replayed for
//! deterministic runs against a fixed server conversation.

pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
