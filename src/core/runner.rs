//! Application runner logic
//!
//! Loads the configuration, generates every selected variant on its own
//! blocking worker and compiles the resulting UFO sources.

use crate::core::cli::CliArgs;
use crate::core::config_file::ConfigFile;
use crate::data::compiler::FontCompiler;
use crate::data::woff2;
use crate::pipeline::{FontVariant, VariantGenerator, VariantOutput};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Everything one variant produced
#[derive(Debug)]
pub struct VariantSummary {
    pub output: VariantOutput,
    /// Compiled binary font, unless compilation was skipped
    pub font_path: Option<PathBuf>,
    /// WOFF2 encoding of the binary font
    pub web_font_path: Option<PathBuf>,
}

/// Create and run the generator with the given CLI arguments.
pub async fn run_app(cli_args: CliArgs) -> Result<Vec<VariantSummary>> {
    if cli_args.new_config {
        ConfigFile::initialize(&cli_args.config_path())?;
        return Ok(Vec::new());
    }

    let config = ConfigFile::resolve(cli_args.config.as_deref())?;
    config.validate()?;
    let variants = config.select_variants(&cli_args.variants)?;
    let options = RunOptions {
        output_dir: cli_args.output.clone(),
        reuse_cache: cli_args.reuse_cache,
        compile: !cli_args.skip_compile,
    };
    run_variants(Arc::new(config), variants, options).await
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub reuse_cache: bool,
    pub compile: bool,
}

/// Generate variants concurrently. A failed variant is reported and the
/// others keep going; the run fails if any of them failed.
pub async fn run_variants(
    config: Arc<ConfigFile>,
    variants: Vec<FontVariant>,
    options: RunOptions,
) -> Result<Vec<VariantSummary>> {
    std::fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("creating {}", options.output_dir.display()))?;

    let total = variants.len();
    let mut tasks = JoinSet::new();
    for variant in variants {
        let config = Arc::clone(&config);
        let options = options.clone();
        tasks.spawn(async move {
            let name = variant.name.clone();
            (name, build_variant(config, variant, options).await)
        });
    }

    let mut summaries = Vec::new();
    let mut failed = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(summary))) => summaries.push(summary),
            Ok((name, Err(err))) => {
                error!("Variant '{}' failed: {:#}", name, err);
                failed.push(name);
            }
            Err(err) => {
                error!("Variant worker panicked: {}", err);
                failed.push("<unknown>".to_string());
            }
        }
    }

    if !failed.is_empty() {
        bail!(
            "{} of {} variants failed: {}",
            failed.len(),
            total,
            failed.join(", ")
        );
    }
    summaries.sort_by(|a, b| a.output.report.variant.cmp(&b.output.report.variant));
    Ok(summaries)
}

async fn build_variant(
    config: Arc<ConfigFile>,
    variant: FontVariant,
    options: RunOptions,
) -> Result<VariantSummary> {
    let output_dir = options.output_dir.clone();
    let reuse_cache = options.reuse_cache;
    let output = tokio::task::spawn_blocking(move || {
        VariantGenerator::new(&config, &variant, &output_dir)
            .reuse_cache(reuse_cache)
            .generate_ufo()
    })
    .await??;

    if !output.report.degenerate.is_empty() {
        warn!(
            "'{}' has {} blank glyphs",
            output.report.variant,
            output.report.degenerate.len()
        );
    }

    if !options.compile {
        info!("Skipping compilation of {}", output.ufo_path.display());
        return Ok(VariantSummary {
            output,
            font_path: None,
            web_font_path: None,
        });
    }

    let font_path = compile(&options.output_dir, &output).await?;
    let web_font_path = woff2::write_woff2(&font_path, &font_path.with_extension("woff2"))
        .await
        .with_context(|| format!("writing WOFF2 for variant '{}'", output.report.variant))?;
    Ok(VariantSummary {
        output,
        font_path: Some(font_path),
        web_font_path: Some(web_font_path),
    })
}

/// Compile to `<output>/fonts/<Family>-<Style>.ttf`
async fn compile(output_dir: &Path, output: &VariantOutput) -> Result<PathBuf> {
    let build_dir = output_dir.join("build").join(&output.report.variant);
    let font_path = output_dir
        .join("fonts")
        .join(format!("{}.ttf", output.info.postscript_name()));
    FontCompiler::new(build_dir)
        .compile(&output.ufo_path, &font_path)
        .await
        .with_context(|| format!("compiling variant '{}'", output.report.variant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config_file::CodepointRange;

    fn options(dir: &Path) -> RunOptions {
        RunOptions {
            output_dir: dir.to_path_buf(),
            reuse_cache: false,
            compile: false,
        }
    }

    fn tiny_config() -> ConfigFile {
        ConfigFile {
            codepoints: CodepointRange {
                start: 0x30,
                end: 0x33,
            },
            variants: vec![
                FontVariant::new("Quiet", 6, 0.0, 1),
                FontVariant::new("Noisy", 6, 0.04, 2),
            ],
            ..ConfigFile::default()
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_variants_run_side_by_side() {
        let dir = tempfile::tempdir().unwrap();
        let config = tiny_config();
        let variants = config.variants.clone();

        let summaries = run_variants(Arc::new(config), variants, options(dir.path()))
            .await
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].output.report.variant, "Noisy");
        for summary in &summaries {
            assert!(summary.output.ufo_path.is_dir());
            assert!(summary.font_path.is_none());
            assert!(summary.web_font_path.is_none());
            assert_eq!(summary.output.report.glyph_count, 6);
        }
        assert!(dir.path().join("ufo/ScopinSans-Quiet.ufo").is_dir());
        assert!(dir.path().join("Noisy/48.svg").is_file());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_variant_does_not_stop_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let config = tiny_config();
        let mut variants = config.variants.clone();
        variants[1].samples_per_bit = 0;

        let result = run_variants(Arc::new(config), variants, options(dir.path())).await;

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("1 of 2"));
        assert!(message.contains("Noisy"));
        assert!(dir.path().join("ufo/ScopinSans-Quiet.ufo").is_dir());
        assert!(!dir.path().join("ufo/ScopinSans-Noisy.ufo").exists());
    }
}
