//! Collecting finished glyphs into a font

use super::metrics::FontInfo;
use crate::core::errors::{GenerationError, Result};
use crate::data::{conversions, ufo};
use kurbo::BezPath;
use norad::Font;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A glyph ready for the font
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub codepoint: char,
    /// Outline in font units
    pub outline: BezPath,
    pub advance_width: u32,
}

impl Glyph {
    /// `uniXXXX` name; every glyph in the font is named by its codepoint
    pub fn name(&self) -> String {
        format!("uni{:04X}", self.codepoint as u32)
    }
}

/// Receives glyphs one at a time; nothing is written until `finish`.
pub trait FontAssembler {
    fn collect(&mut self, glyph: Glyph) -> Result<()>;

    fn glyph_count(&self) -> usize;

    /// Serialize the collected font into `dir`, returning the written path
    fn finish(self, info: &FontInfo, dir: &Path) -> Result<PathBuf>;
}

/// Builds a UFO source with norad
#[derive(Default)]
pub struct UfoAssembler {
    font: Font,
    count: usize,
}

impl UfoAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(&self) -> &Font {
        &self.font
    }
}

impl FontAssembler for UfoAssembler {
    fn collect(&mut self, glyph: Glyph) -> Result<()> {
        let name = glyph.name();
        let mut norad_glyph = norad::Glyph::new(&name);
        norad_glyph.width = f64::from(glyph.advance_width);
        norad_glyph.codepoints.insert(glyph.codepoint);
        norad_glyph.contours = conversions::bezpath_to_norad_contours(&glyph.outline);
        debug!(
            "Collected {} with {} contours, advance {}",
            name,
            norad_glyph.contours.len(),
            glyph.advance_width
        );

        let layer = self.font.default_layer_mut();
        if layer.contains_glyph(&name) {
            return Err(GenerationError::InvalidInput(format!(
                "glyph {name} collected twice"
            )));
        }
        layer.insert_glyph(norad_glyph);
        self.count += 1;
        Ok(())
    }

    fn glyph_count(&self) -> usize {
        self.count
    }

    fn finish(mut self, info: &FontInfo, dir: &Path) -> Result<PathBuf> {
        self.font.font_info = info.to_norad_font_info();
        std::fs::create_dir_all(dir).map_err(|e| GenerationError::resource(dir, e))?;
        let path = dir.join(format!("{}.ufo", info.postscript_name()));
        ufo::save_ufo(&self.font, &path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> FontInfo {
        FontInfo {
            family_name: "Scopin Sans".to_string(),
            style_name: "Test".to_string(),
            version_major: 0,
            version_minor: 1,
            copyright: Some("test".to_string()),
            units_per_em: 512,
            ascender: 384.0,
            descender: -128.0,
        }
    }

    fn triangle() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((100.0, 0.0));
        path.line_to((50.0, 80.0));
        path.close_path();
        path
    }

    #[test]
    fn test_glyph_names() {
        let glyph = Glyph {
            codepoint: 'A',
            outline: BezPath::new(),
            advance_width: 10,
        };
        assert_eq!(glyph.name(), "uni0041");
    }

    #[test]
    fn test_collect_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut assembler = UfoAssembler::new();
        assembler
            .collect(Glyph {
                codepoint: 'A',
                outline: triangle(),
                advance_width: 120,
            })
            .unwrap();
        assembler
            .collect(Glyph {
                codepoint: ' ',
                outline: BezPath::new(),
                advance_width: 0,
            })
            .unwrap();
        assert_eq!(assembler.glyph_count(), 2);

        let path = assembler.finish(&info(), dir.path()).unwrap();
        assert!(path.ends_with("ScopinSans-Test.ufo"));

        let font = ufo::load_ufo_from_path(&path).unwrap();
        assert_eq!(font.font_info.family_name.as_deref(), Some("Scopin Sans"));
        let glyph = font.default_layer().get_glyph("uni0041").unwrap();
        assert_eq!(glyph.width, 120.0);
        assert_eq!(glyph.contours.len(), 1);
        assert!(glyph.codepoints.contains('A'));
    }

    #[test]
    fn test_duplicate_codepoint_is_rejected() {
        let mut assembler = UfoAssembler::new();
        let glyph = Glyph {
            codepoint: 'x',
            outline: triangle(),
            advance_width: 1,
        };
        assembler.collect(glyph.clone()).unwrap();
        assert!(assembler.collect(glyph).is_err());
    }
}
