//! Replays recorded interactions from cassettes.

use std::collections::HashMap;
use std::path::Path;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Serves recorded interactions back in order, one queue per port/method pair.
#[derive(Debug, Default)]
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Creates a replayer over one cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut replayer = Self::default();
        replayer.extend(cassette);
        replayer
    }

    /// Loads a cassette file, or every `*.cassette.yaml` file in a directory
    /// (the layout a recording session writes).
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let mut replayer = Self::default();
        if path.is_dir() {
            let entries = std::fs::read_dir(path)
                .map_err(|e| format!("Failed to list cassette directory {}: {e}", path.display()))?;
            let mut files: Vec<_> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|p| p.to_string_lossy().ends_with(".cassette.yaml"))
                .collect();
            files.sort();
            for file in files {
                replayer.extend(&load_cassette(&file)?);
            }
        } else {
            replayer.extend(&load_cassette(path)?);
        }
        Ok(replayer)
    }

    fn extend(&mut self, cassette: &Cassette) {
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            self.cursors.entry(key.clone()).or_insert(0);
            self.queues.entry(key).or_default().push(interaction.clone());
        }
    }

    /// Returns the next unserved interaction for `port`/`method`.
    ///
    /// # Errors
    ///
    /// Returns a message listing what the cassette does hold when nothing
    /// (more) was recorded for this pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<&Interaction, String> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            return Err(format!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            ));
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        if *cursor >= queue.len() {
            return Err(format!(
                "Cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
                 have been consumed",
                count = queue.len(),
            ));
        }

        let interaction = &queue[*cursor];
        *cursor += 1;
        Ok(interaction)
    }
}

fn load_cassette(path: &Path) -> Result<Cassette, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input: json!({}), output }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            server: "http://localhost:5000/api".into(),
            interactions,
        }
    }

    #[test]
    fn serves_each_port_method_queue_in_order() {
        let cassette = make_cassette(vec![
            interaction(0, "remote", "list_tasks", json!({"ok": []})),
            interaction(1, "clock", "now", json!("2025-01-01T00:00:00Z")),
            interaction(2, "remote", "list_tasks", json!({"ok": [{"id": 1}]})),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction("remote", "list_tasks").unwrap().seq, 0);
        assert_eq!(replayer.next_interaction("clock", "now").unwrap().seq, 1);
        assert_eq!(replayer.next_interaction("remote", "list_tasks").unwrap().seq, 2);
    }

    #[test]
    fn exhausted_queue_is_an_error() {
        let cassette = make_cassette(vec![interaction(0, "remote", "delete_task", json!({"ok": null}))]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert!(replayer.next_interaction("remote", "delete_task").is_ok());
        let err = replayer.next_interaction("remote", "delete_task").unwrap_err();
        assert!(err.contains("have been consumed"));
    }

    #[test]
    fn unknown_pair_lists_available_pairs() {
        let cassette = make_cassette(vec![interaction(0, "clock", "now", json!("x"))]);
        let mut replayer = CassetteReplayer::new(&cassette);

        let err = replayer.next_interaction("remote", "list_tasks").unwrap_err();
        assert!(err.contains("no interactions recorded"));
        assert!(err.contains("clock::now"));
    }

    #[test]
    fn loads_every_cassette_in_a_directory() {
        let dir = std::env::temp_dir().join("tickit_replayer_dir_test");
        std::fs::create_dir_all(&dir).unwrap();
        let remote = make_cassette(vec![interaction(0, "remote", "list_tasks", json!({"ok": []}))]);
        let clock = make_cassette(vec![interaction(0, "clock", "now", json!("2025-01-01T00:00:00Z"))]);
        std::fs::write(dir.join("remote.cassette.yaml"), serde_yaml::to_string(&remote).unwrap())
            .unwrap();
        std::fs::write(dir.join("clock.cassette.yaml"), serde_yaml::to_string(&clock).unwrap())
            .unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let mut replayer = CassetteReplayer::from_path(&dir).unwrap();
        assert!(replayer.next_interaction("remote", "list_tasks").is_ok());
        assert!(replayer.next_interaction("clock", "now").is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
