//! Generator configuration file handling
//!
//! Settings come from a JSON file given with `--config`, or from
//! ~/.config/scopin/settings.json when present. Missing fields fall back to
//! the built-in family.

use crate::core::errors::{GenerationError, Result};
use crate::font_source::FontInfo;
use crate::pipeline::FontVariant;
use crate::scene::SceneParams;
use crate::trace::TraceParams;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Highest code point plus one
const CODEPOINT_LIMIT: u32 = 0x11_0000;

/// Half-open range of primary code points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodepointRange {
    pub start: u32,
    pub end: u32,
}

impl Default for CodepointRange {
    fn default() -> Self {
        Self { start: 0, end: 128 }
    }
}

impl CodepointRange {
    /// Every valid scalar value in the range; surrogates are skipped
    pub fn chars(&self) -> impl Iterator<Item = char> {
        (self.start..self.end).filter_map(char::from_u32)
    }

    pub fn contains(&self, c: char) -> bool {
        (self.start..self.end).contains(&u32::from(c))
    }
}

/// Glyphs drawn from a single unframed signal at the family's widest scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityGlyphs {
    pub chars: Vec<char>,
    pub value: u64,
}

impl Default for UtilityGlyphs {
    fn default() -> Self {
        Self {
            chars: vec!['¡', '£', '¢'],
            value: 0xFF,
        }
    }
}

/// Generator configuration, usually read from settings.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub family_name: String,
    /// `major.minor`
    pub version: String,
    pub copyright: Option<String>,
    pub units_per_em: u32,
    /// Left shift and advance reduction shared by every glyph
    pub overlap: f64,
    pub codepoints: CodepointRange,
    pub utility: UtilityGlyphs,
    pub scene: SceneParams,
    pub trace: TraceParams,
    pub variants: Vec<FontVariant>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            family_name: "ScopinSans".to_string(),
            version: "0.1".to_string(),
            copyright: None,
            units_per_em: 512,
            overlap: 4.0,
            codepoints: CodepointRange::default(),
            utility: UtilityGlyphs::default(),
            scene: SceneParams::default(),
            trace: TraceParams::default(),
            variants: FontVariant::defaults(),
        }
    }
}

impl ConfigFile {
    /// Get the path to the scopin config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("scopin")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        debug!("Loaded settings from {:?}", path);
        Ok(config)
    }

    /// Load from `path` when given, else from the user config file, else
    /// fall back to the defaults.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load(&user_path)
        } else {
            debug!("No settings at {:?}, using defaults", user_path);
            Ok(Self::default())
        }
    }

    /// Save configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Write a settings file with default values unless one already exists.
    ///
    /// Returns whether a new file was created.
    pub fn initialize(path: &Path) -> anyhow::Result<bool> {
        if path.exists() {
            println!("Settings file already exists: {:?}", path);
            return Ok(false);
        }
        Self::default().save(path)?;
        println!("Created settings file: {:?}", path);
        Ok(true)
    }

    /// Check the whole configuration before anything is generated
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(GenerationError::InvalidInput(reason));

        if self.family_name.trim().is_empty() {
            return invalid("family name must not be empty".to_string());
        }
        if FontInfo::parse_version(&self.version).is_none() {
            return invalid(format!("version '{}' is not major.minor", self.version));
        }
        if self.units_per_em == 0 {
            return invalid("units per em must be positive".to_string());
        }
        if !self.overlap.is_finite() || self.overlap < 0.0 {
            return invalid(format!("overlap must be >= 0, got {}", self.overlap));
        }
        let CodepointRange { start, end } = self.codepoints;
        if start >= end || end > CODEPOINT_LIMIT {
            return invalid(format!("code point range {start}..{end} is empty or out of range"));
        }
        let mut seen = HashSet::new();
        for &c in &self.utility.chars {
            if self.codepoints.contains(c) || !seen.insert(c) {
                return invalid(format!("utility glyph U+{:04X} is defined twice", u32::from(c)));
            }
        }
        if self.trace.raster_scale <= 0.0 || self.scene.half_height <= 0.0 {
            return invalid("raster scale and half height must be positive".to_string());
        }
        if !(self.scene.stroke_width > 0.0 && self.scene.stroke_width.is_finite()) {
            return invalid(format!(
                "stroke width must be positive, got {}",
                self.scene.stroke_width
            ));
        }
        if !(self.trace.ink_threshold > 0.0 && self.trace.ink_threshold <= 1.0) {
            return invalid(format!(
                "ink threshold must be in (0, 1], got {}",
                self.trace.ink_threshold
            ));
        }
        if !(self.trace.tolerance >= 0.0 && self.trace.tolerance.is_finite()) {
            return invalid(format!(
                "trace tolerance must be >= 0, got {}",
                self.trace.tolerance
            ));
        }

        if self.variants.is_empty() {
            return invalid("no variants configured".to_string());
        }
        let mut names = HashSet::new();
        for variant in &self.variants {
            if !names.insert(variant.name.as_str()) {
                return invalid(format!("variant '{}' is defined twice", variant.name));
            }
            self.check_variant(variant)?;
        }
        Ok(())
    }

    /// Check one variant against the shared character set
    pub fn check_variant(&self, variant: &FontVariant) -> Result<()> {
        variant.validate()?;
        // a non-positive amplitude would flip or flatten the trace
        if self.scene.amplitude_scale(variant.noise_amount) <= 0.0 {
            return Err(GenerationError::InvalidInput(format!(
                "variant '{}': noise {} leaves no headroom for the signal",
                variant.name, variant.noise_amount
            )));
        }
        let framing = variant.primary_framing()?;
        let highest = u64::from(self.codepoints.end.saturating_sub(1));
        if !framing.fits(highest) || !framing.fits(self.utility.value) {
            return Err(GenerationError::InvalidInput(format!(
                "variant '{}': {} bits cannot carry code point {} or utility value {}",
                variant.name,
                framing.bit_width(),
                highest,
                self.utility.value
            )));
        }
        Ok(())
    }

    /// Variants to build: all of them, or only the named ones.
    ///
    /// A name given more than once selects its variant once, in the position
    /// of its first mention.
    pub fn select_variants(&self, names: &[String]) -> Result<Vec<FontVariant>> {
        if names.is_empty() {
            return Ok(self.variants.clone());
        }
        let mut seen = HashSet::new();
        names
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .map(|name| {
                self.variants
                    .iter()
                    .find(|v| &v.name == name)
                    .cloned()
                    .ok_or_else(|| {
                        GenerationError::InvalidInput(format!("unknown variant '{name}'"))
                    })
            })
            .collect()
    }
}
