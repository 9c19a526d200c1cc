//! Recording adapter for the `FileSystem` port.

use std::path::Path;

use serde::Serialize;

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::ports::FileSystem;

/// Records filesystem calls while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: SharedRecorder,
}

impl RecordingFileSystem {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn FileSystem>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PathInput<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct WriteInput<'a> {
    path: &'a str,
    contents: &'a str,
}

impl FileSystem for RecordingFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.read_to_string(path);
        let input = PathInput { path: &path.display().to_string() };
        record_result(&self.recorder, "fs", "read_to_string", &input, &result);
        result
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.write(path, contents);
        let input = WriteInput { path: &path.display().to_string(), contents };
        record_result(&self.recorder, "fs", "write", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use crate::testing::MemFileSystem;

    #[test]
    fn records_reads_and_failed_reads() {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new("unused.yaml", "test", "none")));
        let inner = MemFileSystem::new();
        inner.insert("/lists/a.json", "[]");
        let fs = RecordingFileSystem::new(Box::new(inner), Arc::clone(&recorder));

        assert_eq!(fs.read_to_string(Path::new("/lists/a.json")).unwrap(), "[]");
        assert!(fs.read_to_string(Path::new("/lists/missing.json")).is_err());
        fs.write(Path::new("/lists/b.json"), "[1]").unwrap();

        assert_eq!(recorder.lock().unwrap().len(), 3);
    }
}
