//! UFO file I/O operations

use crate::core::errors::{GenerationError, Result};
use norad::Font;
use std::path::Path;

/// Write a UFO to disk, replacing any previous copy
pub fn save_ufo(font: &Font, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| GenerationError::resource(path, e))?;
    }
    font.save(path)
        .map_err(|e| GenerationError::interop("UFO write", format!("{}: {e}", path.display())))
}

/// Load a UFO font file from disk
pub fn load_ufo_from_path(path: impl AsRef<Path>) -> Result<Font> {
    let path = path.as_ref();
    Font::load(path)
        .map_err(|e| GenerationError::interop("UFO read", format!("{}: {e}", path.display())))
}
