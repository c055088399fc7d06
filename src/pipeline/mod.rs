//! Variant generation
//!
//! One variant is generated in two passes over its character set:
//!
//! 1. Every primary code point is synthesized, traced and fitted at its
//!    natural proportions while the largest applied scale is tracked.
//! 2. The utility glyphs are then fitted with that family-wide scale so
//!    they line up with the widest character.
//!
//! Glyphs go to a [`FontAssembler`] one at a time; the variant's outline
//! cache and scratch directory live next to each other in
//! `<output>/<variant>/`.

pub mod cache;
pub mod variant;

pub use cache::{CacheStats, OutlineCache};
pub use variant::{FontVariant, FramingDefaults};

use crate::core::config_file::ConfigFile;
use crate::core::errors::{GenerationError, Result};
use crate::font_source::{
    FittedGlyph, FontAssembler, FontInfo, Glyph, GlyphFitter, MaxScale, UfoAssembler,
};
use crate::signal::{self, GaussianNoise, SignalKey};
use crate::trace::{RasterTracer, ScratchFiles};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What one variant run produced
#[derive(Debug, Clone, PartialEq)]
pub struct VariantReport {
    pub variant: String,
    pub glyph_count: usize,
    /// Characters whose signal traced to nothing
    pub degenerate: Vec<char>,
    pub max_scale: f64,
    pub cache: CacheStats,
}

/// Output of a variant that was written as a UFO source
#[derive(Debug, Clone)]
pub struct VariantOutput {
    pub report: VariantReport,
    pub info: FontInfo,
    pub ufo_path: PathBuf,
}

pub struct VariantGenerator<'a> {
    config: &'a ConfigFile,
    variant: &'a FontVariant,
    output_dir: PathBuf,
    reuse_cache: bool,
}

impl<'a> VariantGenerator<'a> {
    pub fn new(config: &'a ConfigFile, variant: &'a FontVariant, output_dir: &Path) -> Self {
        Self {
            config,
            variant,
            output_dir: output_dir.to_path_buf(),
            reuse_cache: false,
        }
    }

    /// Pick up outlines cached by an earlier run
    pub fn reuse_cache(mut self, reuse: bool) -> Self {
        self.reuse_cache = reuse;
        self
    }

    pub fn variant_dir(&self) -> PathBuf {
        self.output_dir.join(&self.variant.name)
    }

    pub fn font_info(&self) -> Result<FontInfo> {
        let (version_major, version_minor) = FontInfo::parse_version(&self.config.version)
            .ok_or_else(|| {
                GenerationError::InvalidInput(format!(
                    "version '{}' is not major.minor",
                    self.config.version
                ))
            })?;
        let offset = self.variant.vertical_offset();
        Ok(FontInfo {
            family_name: self.config.family_name.clone(),
            style_name: self.variant.name.clone(),
            version_major,
            version_minor,
            copyright: self.config.copyright.clone(),
            units_per_em: self.config.units_per_em,
            ascender: f64::from(self.config.units_per_em) + offset,
            descender: offset,
        })
    }

    /// Generate every glyph of the variant into `assembler`
    pub fn generate<A: FontAssembler>(&self, assembler: &mut A) -> Result<VariantReport> {
        self.config.check_variant(self.variant)?;
        let framing = self.variant.primary_framing()?;
        let name = self.variant.name.as_str();

        let variant_dir = self.variant_dir();
        let mut cache = OutlineCache::new(&variant_dir, self.reuse_cache)?;
        let scratch = tempfile::Builder::new()
            .prefix(".scratch-")
            .tempdir_in(&variant_dir)
            .map_err(|e| GenerationError::resource(&variant_dir, e))?;
        let tracer =
            RasterTracer::new(self.config.trace).with_scratch(ScratchFiles::in_dir(scratch.path()));
        let fitter = GlyphFitter::new(self.config.units_per_em, self.config.overlap);

        let mut max_scale = MaxScale::default();
        let mut degenerate = Vec::new();

        info!("Generating variant '{}'", name);
        for codepoint in self.config.codepoints.chars() {
            let key = SignalKey::new(u64::from(u32::from(codepoint)), framing);
            let fitted = self
                .glyph(&mut cache, &tracer, &fitter, key, None)
                .map_err(|e| e.at_glyph(name, codepoint))?;
            if fitted.outline.elements().is_empty() {
                degenerate.push(codepoint);
            }
            max_scale.observe(fitted.applied_scale);
            collect(assembler, codepoint, fitted).map_err(|e| e.at_glyph(name, codepoint))?;
        }
        debug!("'{}' pass 1 done, max scale {:.4}", name, max_scale.get());

        let utility_key = SignalKey::new(self.config.utility.value, framing.unframed());
        for &codepoint in &self.config.utility.chars {
            let fitted = self
                .glyph(&mut cache, &tracer, &fitter, utility_key, Some(max_scale.get()))
                .map_err(|e| e.at_glyph(name, codepoint))?;
            if fitted.outline.elements().is_empty() {
                degenerate.push(codepoint);
            }
            collect(assembler, codepoint, fitted).map_err(|e| e.at_glyph(name, codepoint))?;
        }

        let report = VariantReport {
            variant: name.to_string(),
            glyph_count: assembler.glyph_count(),
            degenerate,
            max_scale: max_scale.get(),
            cache: cache.stats(),
        };
        info!(
            "Variant '{}': {} glyphs, {} traced, {} reused",
            name,
            report.glyph_count,
            report.cache.traced,
            report.cache.from_memory + report.cache.from_disk
        );
        Ok(report)
    }

    /// Generate the variant and write it as `<output>/ufo/<Family>-<Style>.ufo`
    pub fn generate_ufo(&self) -> Result<VariantOutput> {
        let info = self.font_info()?;
        let mut assembler = UfoAssembler::new();
        let report = self.generate(&mut assembler)?;
        let ufo_path = assembler.finish(&info, &self.output_dir.join("ufo"))?;
        info!("Wrote {}", ufo_path.display());
        Ok(VariantOutput {
            report,
            info,
            ufo_path,
        })
    }

    fn glyph(
        &self,
        cache: &mut OutlineCache,
        tracer: &RasterTracer,
        fitter: &GlyphFitter,
        key: SignalKey,
        forced_scale: Option<f64>,
    ) -> Result<FittedGlyph> {
        let outline = cache.get_or_trace(key, || {
            let scene_params = &self.config.scene;
            let mut noise = GaussianNoise::seeded(key.noise_seed(self.variant.seed));
            let waveform = signal::synthesize(
                key.value,
                &key.framing,
                self.variant.samples_per_bit,
                self.variant.noise_amount,
                &mut noise,
            );
            let scene = scene_params.builder().build(
                &waveform,
                scene_params.amplitude_scale(self.variant.noise_amount),
                key.framing.starts_high(),
                key.framing.include_end_bit(),
                scene_params.stroke_width,
            );
            tracer.trace(&scene)
        })?;

        if outline.is_empty() {
            warn!("{}", GenerationError::TraceDegenerate { value: key.value });
        }
        Ok(fitter.fit(&outline, self.variant.vertical_offset(), forced_scale))
    }
}

fn collect<A: FontAssembler>(assembler: &mut A, codepoint: char, fitted: FittedGlyph) -> Result<()> {
    assembler.collect(Glyph {
        codepoint,
        outline: fitted.outline,
        advance_width: fitted.advance_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config_file::CodepointRange;

    /// Glyphs held in memory for inspection
    #[derive(Default)]
    struct Collected(Vec<Glyph>);

    impl FontAssembler for Collected {
        fn collect(&mut self, glyph: Glyph) -> Result<()> {
            self.0.push(glyph);
            Ok(())
        }

        fn glyph_count(&self) -> usize {
            self.0.len()
        }

        fn finish(self, _info: &FontInfo, dir: &Path) -> Result<PathBuf> {
            Ok(dir.to_path_buf())
        }
    }

    fn small_config() -> ConfigFile {
        let mut config = ConfigFile::default();
        config.codepoints = CodepointRange { start: 0x41, end: 0x44 };
        config
    }

    #[test]
    fn test_utility_glyphs_use_the_family_scale() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config();
        let variant = FontVariant::new("Test", 10, 0.0, 5);
        let mut collected = Collected::default();

        let report = VariantGenerator::new(&config, &variant, dir.path())
            .generate(&mut collected)
            .unwrap();

        assert_eq!(report.glyph_count, 3 + config.utility.chars.len());
        assert!(report.degenerate.is_empty());
        assert!(report.max_scale > 0.0);

        let utility: Vec<_> = collected
            .0
            .iter()
            .filter(|g| config.utility.chars.contains(&g.codepoint))
            .collect();
        assert_eq!(utility.len(), 3);
        // all utility glyphs share one traced signal
        assert!(utility.iter().all(|g| g.outline == utility[0].outline));
        assert_eq!(report.cache.traced, 4);
        assert_eq!(report.cache.from_memory, 2);

        let widest = collected.0.iter().map(|g| g.advance_width).max().unwrap();
        assert!(utility[0].advance_width <= widest);
    }

    #[test]
    fn test_blank_utility_glyphs_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config();
        // every traced region falls under the speckle size
        config.trace.min_area = f64::MAX;
        let variant = FontVariant::new("Blank", 10, 0.0, 5);

        let report = VariantGenerator::new(&config, &variant, dir.path())
            .generate(&mut Collected::default())
            .unwrap();

        let mut expected: Vec<char> = config.codepoints.chars().collect();
        expected.extend(config.utility.chars.iter().copied());
        assert_eq!(report.degenerate, expected);
        assert_eq!(report.glyph_count, expected.len());
    }

    #[test]
    fn test_generation_is_reproducible() {
        let config = small_config();
        let variant = FontVariant::new("Noisy", 8, 0.04, 77);

        let run = || {
            let dir = tempfile::tempdir().unwrap();
            let mut collected = Collected::default();
            VariantGenerator::new(&config, &variant, dir.path())
                .generate(&mut collected)
                .unwrap();
            collected.0
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_scratch_directory_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config();
        let variant = FontVariant::new("Scratch", 6, 0.0, 1);
        let generator = VariantGenerator::new(&config, &variant, dir.path());
        generator.generate(&mut Collected::default()).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(generator.variant_dir())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(".scratch"))
            .collect();
        assert!(leftovers.is_empty());
        assert!(generator.variant_dir().join("65.svg").is_file());
        assert!(generator.variant_dir().join("255-8h.svg").is_file());
    }

    #[test]
    fn test_invalid_variant_fails_before_generation() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config();
        let variant = FontVariant::new("Bad", 0, 0.0, 1);
        let result =
            VariantGenerator::new(&config, &variant, dir.path()).generate(&mut Collected::default());
        assert!(matches!(result, Err(GenerationError::InvalidInput(_))));
        assert!(!dir.path().join("Bad").exists());
    }

    #[test]
    fn test_font_info_follows_the_variant() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::default();
        let variant = FontVariant::new("Regular", 100, 0.04, 2);
        let info = VariantGenerator::new(&config, &variant, dir.path())
            .font_info()
            .unwrap();
        assert_eq!(info.style_name, "Regular");
        assert_eq!(info.version_major, 0);
        assert_eq!(info.version_minor, 1);
        assert_eq!(info.descender, -128.0);
        assert_eq!(info.ascender, 384.0);
    }
}
