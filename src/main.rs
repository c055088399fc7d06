//! Oscilloscope traces of serial data, set as a typeface.

use anyhow::Result;
use scopin::{core, logging};
use tracing::info;

async fn run(cli_args: core::CliArgs) -> Result<()> {
    let summaries = core::run_app(cli_args).await?;
    for summary in &summaries {
        let report = &summary.output.report;
        let written = summary
            .font_path
            .iter()
            .chain(&summary.web_font_path)
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>();
        if written.is_empty() {
            info!(
                "{}: {} glyphs -> {}",
                report.variant,
                report.glyph_count,
                summary.output.ufo_path.display()
            );
        } else {
            info!(
                "{}: {} glyphs -> {}",
                report.variant,
                report.glyph_count,
                written.join(", ")
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli_args = match core::platform::get_cli_args() {
        Ok(args) => args,
        Err(error) => core::platform::handle_error(error),
    };
    let _log_guard = match logging::init(cli_args.log_dir().as_deref(), cli_args.verbose) {
        Ok(guard) => guard,
        Err(error) => core::platform::handle_error(error),
    };

    if let Err(error) = run(cli_args).await {
        core::platform::handle_error(error);
    }
}
