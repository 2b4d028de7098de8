//! Shared test doubles for builder integration tests

#![allow(dead_code)]

use bytes::Bytes;
use odl_builder::bundler::{BundleOptions, Bundler, BundlerError};
use odl_builder::fs::FileSystem;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// A recorded filesystem or bundler call, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Write(PathBuf, Vec<u8>),
    Remove(PathBuf),
}

/// Filesystem that records calls instead of touching disk.
#[derive(Debug, Default)]
pub struct RecordingFileSystem {
    ops: Mutex<Vec<Op>>,
    fail_writes_to: Option<PathBuf>,
    fail_removes: bool,
}

impl RecordingFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes to `path` fail with PermissionDenied.
    pub fn failing_writes_to(path: impl Into<PathBuf>) -> Self {
        Self {
            fail_writes_to: Some(path.into()),
            ..Self::default()
        }
    }

    /// Every remove fails with PermissionDenied.
    pub fn failing_removes() -> Self {
        Self {
            fail_removes: true,
            ..Self::default()
        }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<PathBuf> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Write(path, _) => Some(path),
                Op::Remove(_) => None,
            })
            .collect()
    }

    pub fn removes(&self) -> Vec<PathBuf> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Remove(path) => Some(path),
                Op::Write(..) => None,
            })
            .collect()
    }

    /// Contents of the last write to `path`.
    pub fn written(&self, path: &Path) -> Option<Vec<u8>> {
        self.ops().into_iter().rev().find_map(|op| match op {
            Op::Write(p, contents) if p == path => Some(contents),
            _ => None,
        })
    }
}

impl FileSystem for RecordingFileSystem {
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if self.fail_writes_to.as_deref() == Some(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.ops
            .lock()
            .unwrap()
            .push(Op::Write(path.to_path_buf(), contents.to_vec()));
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if self.fail_removes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "busy"));
        }
        self.ops.lock().unwrap().push(Op::Remove(path.to_path_buf()));
        Ok(())
    }
}

/// What the scripted bundler does when called.
#[derive(Debug, Clone)]
pub enum Outcome {
    Succeed(&'static str),
    Fail(&'static str),
    Hang,
}

/// Bundler returning a scripted outcome and recording its calls.
#[derive(Debug)]
pub struct ScriptedBundler {
    outcome: Outcome,
    calls: Mutex<Vec<(PathBuf, BundleOptions)>>,
}

impl ScriptedBundler {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(payload: &'static str) -> Self {
        Self::new(Outcome::Succeed(payload))
    }

    pub fn failing(message: &'static str) -> Self {
        Self::new(Outcome::Fail(message))
    }

    pub fn calls(&self) -> Vec<(PathBuf, BundleOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Bundler for ScriptedBundler {
    async fn bundle(&self, entry: &Path, options: &BundleOptions) -> Result<Bytes, BundlerError> {
        self.calls
            .lock()
            .unwrap()
            .push((entry.to_path_buf(), options.clone()));

        match self.outcome {
            Outcome::Succeed(payload) => Ok(Bytes::from_static(payload.as_bytes())),
            Outcome::Fail(message) => Err(BundlerError::Other(message.to_string())),
            Outcome::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Bytes::new())
            }
        }
    }
}
