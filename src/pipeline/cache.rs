//! Traced outlines keyed by signal
//!
//! Every outline traced during a run is kept in memory and written to the
//! variant's output directory. Outlines already on disk are only picked up
//! again when reuse is switched on; a changed configuration would otherwise
//! silently keep serving stale shapes.

use crate::core::errors::{GenerationError, Result};
use crate::signal::{FramingSpec, SignalKey};
use crate::trace::{svg, TracedOutline};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub traced: usize,
    pub from_memory: usize,
    pub from_disk: usize,
}

pub struct OutlineCache {
    dir: PathBuf,
    reuse_disk: bool,
    memory: HashMap<SignalKey, TracedOutline>,
    stats: CacheStats,
}

impl OutlineCache {
    pub fn new(dir: impl Into<PathBuf>, reuse_disk: bool) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| GenerationError::resource(&dir, e))?;
        Ok(Self {
            dir,
            reuse_disk,
            memory: HashMap::new(),
            stats: CacheStats::default(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// `<value>.svg` for the default framing, `<value>-<tag>.svg` otherwise
    pub fn path_for(&self, key: &SignalKey) -> PathBuf {
        let framing = &key.framing;
        let name = if *framing == FramingSpec::default() {
            format!("{}.svg", key.value)
        } else {
            format!("{}-{}.svg", key.value, framing.tag())
        };
        self.dir.join(name)
    }

    /// Return the outline for `key`, tracing it with `trace` on a miss.
    pub fn get_or_trace(
        &mut self,
        key: SignalKey,
        trace: impl FnOnce() -> Result<TracedOutline>,
    ) -> Result<TracedOutline> {
        if let Some(outline) = self.memory.get(&key) {
            self.stats.from_memory += 1;
            return Ok(outline.clone());
        }

        let path = self.path_for(&key);
        if self.reuse_disk && path.is_file() {
            match svg::read_outline(&path) {
                Ok(outline) => {
                    debug!("Reusing cached outline {}", path.display());
                    self.stats.from_disk += 1;
                    self.memory.insert(key, outline.clone());
                    return Ok(outline);
                }
                Err(err) => warn!("Ignoring unreadable cache entry: {}", err),
            }
        }

        let outline = trace()?;
        svg::write_outline(&outline, &path)?;
        self.stats.traced += 1;
        self.memory.insert(key, outline.clone());
        Ok(outline)
    }
}
