//! Command line interface for the scopin generator
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs before any glyph is generated.

use crate::core::config_file::ConfigFile;
use clap::Parser;
use std::path::PathBuf;

/// Scopin CLI arguments
///
/// Examples:
///   scopin                                # Build every variant into ./outputs
///   scopin --variant Regular              # Build one variant
///   scopin --config family.json -o build  # Custom settings and output folder
///   scopin --reuse-cache --skip-compile   # Re-assemble UFOs from cached outlines
///   scopin --new-config                   # Write default settings to edit
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "scopin",
    version,
    about = "Generates a typeface whose glyphs are oscilloscope traces of their own serial encoding",
    long_about = "Scopin draws every character as the square-wave signal a serial line carries for its code point, traces the drawing into outlines and assembles them into a UFO source that is then compiled to a TrueType font with fontc."
)]
pub struct CliArgs {
    /// Settings file to use instead of ~/.config/scopin/settings.json
    #[clap(
        long = "config",
        short = 'c',
        help = "JSON settings file",
        long_help = "Path to a JSON settings file. When omitted, ~/.config/scopin/settings.json is used if it exists, otherwise the built-in ScopinSans family is generated."
    )]
    pub config: Option<PathBuf>,

    /// Directory receiving outline caches, UFO sources, fonts and logs
    #[clap(
        long = "output",
        short = 'o',
        default_value = "outputs",
        help = "Output directory"
    )]
    pub output: PathBuf,

    /// Restrict the run to the named variants
    #[clap(
        long = "variant",
        short = 'v',
        help = "Only build this variant (repeatable)",
        long_help = "Only build the named variant. May be given several times; every configured variant is built when omitted."
    )]
    pub variants: Vec<String>,

    #[clap(
        long = "reuse-cache",
        help = "Reuse outlines traced by an earlier run",
        long_help = "Reuse traced outlines found in the output directory instead of tracing them again. Only safe when the scene and trace settings have not changed since they were written."
    )]
    pub reuse_cache: bool,

    #[clap(long = "skip-compile", help = "Write UFO sources without running fontc")]
    pub skip_compile: bool,

    /// Initialize the settings file with the built-in defaults
    #[clap(
        long = "new-config",
        help = "Write a settings file with default values",
        long_help = "Write the built-in configuration to the --config path, or to ~/.config/scopin/settings.json, and exit. An existing file is left untouched."
    )]
    pub new_config: bool,

    #[clap(long = "verbose", help = "Log debug output")]
    pub verbose: bool,

    #[clap(long = "no-log-file", help = "Only log to the terminal")]
    pub no_log_file: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.config {
            if !self.new_config && !path.is_file() {
                return Err(format!(
                    "Settings file does not exist: {}\nRun with --new-config to create one.",
                    path.display()
                ));
            }
        }

        if self.output.exists() && !self.output.is_dir() {
            return Err(format!(
                "Output path is not a directory: {}",
                self.output.display()
            ));
        }

        if let Some(empty) = self.variants.iter().find(|v| v.trim().is_empty()) {
            return Err(format!("Invalid variant name: '{empty}'"));
        }

        Ok(())
    }

    /// Settings file path, explicit or the user default
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(ConfigFile::config_path)
    }

    /// Where the log file goes, if file logging is enabled
    pub fn log_dir(&self) -> Option<PathBuf> {
        (!self.no_log_file && !self.new_config).then(|| self.output.join("logs"))
    }
}
