//! WOFF2 web fonts
//!
//! The TrueType file written by `fontc` is repacked with Google's WOFF2
//! encoder, glyf and loca transforms included.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Brotli quality, 0 to 11
const QUALITY: usize = 11;

/// Encode an sfnt font as WOFF2
pub fn encode(ttf: &[u8]) -> Result<Vec<u8>> {
    woff::version2::compress(ttf, String::new(), QUALITY, true)
        .ok_or_else(|| anyhow!("WOFF2 encoder rejected the font"))
}

/// Read `ttf_path` and write its WOFF2 encoding to `woff2_path`
pub async fn write_woff2(ttf_path: &Path, woff2_path: &Path) -> Result<PathBuf> {
    let ttf = fs::read(ttf_path)
        .await
        .with_context(|| format!("reading {}", ttf_path.display()))?;
    let woff2 = tokio::task::spawn_blocking(move || encode(&ttf))
        .await?
        .with_context(|| format!("encoding {}", ttf_path.display()))?;
    if let Some(parent) = woff2_path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(woff2_path, woff2)
        .await
        .with_context(|| format!("writing {}", woff2_path.display()))?;

    info!("Wrote {}", woff2_path.display());
    Ok(woff2_path.to_path_buf())
}
