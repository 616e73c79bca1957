//! Type-keyed storage for built codecs.
//!
//! Every [`Pack`] type is resolved to exactly one codec per cache. Codecs of
//! nested types are resolved through the same cache while the outer codec is
//! being built, so a record that appears in many places still only has one
//! codec.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::codec::Pack;
use crate::config::Config;
use crate::error::{Error, Result};

type AnyCodec = Arc<dyn Any + Send + Sync>;

/// Maps types to their built codecs.
///
/// Entries are added on first use and never removed. Population requires
/// `&mut self`, so a cache can't be filled from several threads at once.
pub struct CodecCache {
    config: Config,
    codecs: HashMap<TypeId, AnyCodec>,
}

impl CodecCache {
    /// Creates an empty cache with default settings.
    pub fn new() -> Self {
        Self::with_config(Config::new())
    }

    /// Creates an empty cache whose codecs are built with `config`.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            codecs: HashMap::new(),
        }
    }

    /// The settings used to build codecs.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gets the codec for `T`, building it first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecursiveType`] if `T` contains itself.
    pub fn get<T: Pack>(&mut self) -> Result<Arc<T::Codec>> {
        Builder {
            cache: self,
            pending: Vec::new(),
        }
        .resolve::<T>()
    }

    /// Whether a codec for `T` has been built already.
    pub fn contains<T: Pack>(&self) -> bool {
        self.codecs.contains_key(&TypeId::of::<T>())
    }

    /// The number of cached codecs.
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Whether no codec has been built yet.
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl Default for CodecCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CodecCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecCache")
            .field("config", &self.config)
            .field("len", &self.codecs.len())
            .finish()
    }
}

/// Resolves codecs while another codec is being built.
///
/// Passed to [`Pack::build_codec`]. Keeps track of the types currently being
/// built to reject types that contain themselves.
pub struct Builder<'a> {
    cache: &'a mut CodecCache,
    pending: Vec<(TypeId, &'static str)>,
}

impl Builder<'_> {
    /// The settings to build codecs with.
    pub fn config(&self) -> &Config {
        &self.cache.config
    }

    /// Gets the codec for `T`, building it first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecursiveType`] if `T` is already being built further
    /// up, i.e. it contains itself.
    pub fn resolve<T: Pack>(&mut self) -> Result<Arc<T::Codec>> {
        let id = TypeId::of::<T>();
        if let Some(codec) = self.cache.codecs.get(&id) {
            return Ok(downcast::<T>(codec));
        }

        if self.pending.iter().any(|&(p, _)| p == id) {
            log::debug!(
                "Rejected recursive type `{}` via {}.",
                type_name::<T>(),
                self.pending_path(),
            );
            return Err(Error::RecursiveType(type_name::<T>()));
        }

        self.pending.push((id, type_name::<T>()));
        let codec = T::build_codec(self);
        self.pending.pop();

        let codec = Arc::new(codec?);
        self.cache.codecs.insert(id, Arc::clone(&codec) as AnyCodec);
        log::trace!("Built codec for `{}`.", type_name::<T>());
        Ok(codec)
    }

    fn pending_path(&self) -> String {
        let names: Vec<_> = self.pending.iter().map(|&(_, name)| name).collect();
        names.join(" -> ")
    }
}

fn downcast<T: Pack>(codec: &AnyCodec) -> Arc<T::Codec> {
    Arc::clone(codec)
        .downcast::<T::Codec>()
        .unwrap_or_else(|_| unreachable!("cached codec for `{}` has the wrong type", type_name::<T>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_codec_per_type() {
        let mut cache = CodecCache::new();
        assert!(cache.is_empty(), "new cache must be empty");

        let a = cache.get::<i64>().expect("i64 is supported");
        let b = cache.get::<i64>().expect("i64 is supported");
        assert!(Arc::ptr_eq(&a, &b), "must reuse the cached codec");
        assert_eq!(cache.len(), 1);

        cache.get::<Vec<u8>>().expect("bytes are supported");
        assert_eq!(cache.len(), 2);
        assert!(cache.contains::<Vec<u8>>(), "bytes codec must be cached");
        assert!(!cache.contains::<String>(), "string codec was never built");
    }

    #[test]
    fn nested_types_share_the_cache() {
        let mut cache = CodecCache::new();
        cache.get::<Option<Box<i64>>>().expect("supported");

        assert!(cache.contains::<i64>(), "inner codec must be cached too");
        assert!(cache.contains::<Option<Box<i64>>>(), "outer codec must be cached");
    }

    #[test]
    fn builds_with_its_config() {
        use crate::codec::Codec as _;

        assert_eq!(CodecCache::new().config().max_bytes_len, Config::new().max_bytes_len);

        let mut cache = CodecCache::with_config(Config::new().with_max_bytes_len(2));
        assert_eq!(cache.config().max_bytes_len, 2);

        let codec = cache.get::<Vec<u8>>().expect("bytes are supported");
        let mut dst = Vec::new();
        let err = codec
            .read(&mut [0x03u8, 1, 2, 3].as_slice(), &mut dst)
            .expect_err("over the limit");
        assert!(
            matches!(err.error(), Error::LengthLimit { len: 3, limit: 2 }),
            "got {err:?}"
        );
    }
}
