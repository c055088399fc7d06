//! Binary font compilation with fontc
//!
//! The UFO written by the assembler is handed to the `fontc` compiler,
//! which produces the TrueType file.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

pub struct FontCompiler {
    program: PathBuf,
    build_dir: PathBuf,
}

impl FontCompiler {
    /// Use the `fontc` on `PATH`, keeping its intermediate files in `build_dir`
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self::with_program("fontc", build_dir)
    }

    pub fn with_program(program: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            build_dir: build_dir.into(),
        }
    }

    /// Compile `ufo_path` into `output_path`
    pub async fn compile(&self, ufo_path: &Path, output_path: &Path) -> Result<PathBuf> {
        fs::create_dir_all(&self.build_dir)
            .await
            .with_context(|| format!("creating {}", self.build_dir.display()))?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let mut cmd = Command::new(&self.program);
        cmd.arg(ufo_path)
            .arg("--build-dir")
            .arg(&self.build_dir)
            .arg("--output-file")
            .arg(output_path);
        debug!("Running {:?}", cmd);

        let output = cmd
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("fontc compilation failed: {}", stderr));
        }

        info!("Compiled {}", output_path.display());
        Ok(output_path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_compiler_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = FontCompiler::with_program(
            dir.path().join("no-such-fontc"),
            dir.path().join("build"),
        );
        let result = compiler
            .compile(&dir.path().join("in.ufo"), &dir.path().join("out/in.ttf"))
            .await;
        assert!(result.is_err());
        assert!(dir.path().join("build").exists());
    }
}
