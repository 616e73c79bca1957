//! Settings that are captured into codecs when they are built.

use serde::Deserialize;

/// Codec settings shared by every codec in one cache.
///
/// This can be deserialized, f.e. as a section in an application's TOML
/// configuration. Missing keys use their default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Largest byte sequence length accepted while decoding.
    ///
    /// Length prefixes above this are rejected before any storage is
    /// allocated.
    pub max_bytes_len: usize,
}

impl Config {
    /// Default for [`Config::max_bytes_len`], 256 MiB.
    pub const DEFAULT_MAX_BYTES_LEN: usize = 256 << 20;

    /// Creates a new config with default settings.
    pub const fn new() -> Self {
        Self {
            max_bytes_len: Self::DEFAULT_MAX_BYTES_LEN,
        }
    }

    /// Sets the largest accepted byte sequence length.
    #[must_use]
    pub const fn with_max_bytes_len(mut self, max_bytes_len: usize) -> Self {
        self.max_bytes_len = max_bytes_len;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
