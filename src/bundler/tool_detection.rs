//! Bundler availability checking.

use std::sync::LazyLock;

use super::BundlerKind;

/// First bundler found on `PATH`, in [`BundlerKind::ALL`] order.
///
/// Cached result to avoid repeated lookups.
pub static DETECTED_BUNDLER: LazyLock<Option<BundlerKind>> = LazyLock::new(|| {
    let found = BundlerKind::ALL.into_iter().find(|kind| match which::which(kind.program()) {
        Ok(path) => {
            log::debug!("Found {} at: {}", kind.program(), path.display());
            true
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", kind.program(), e);
            false
        }
    });

    if found.is_none() {
        log::warn!("No bundler found in PATH (tried browserify, esbuild)");
    }
    found
});

/// Returns the first installed bundler, if any.
pub fn detect_bundler() -> Option<BundlerKind> {
    *DETECTED_BUNDLER
}
