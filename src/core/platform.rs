//! Process-level error handling.

/// Report a fatal error on stderr and exit with code 1.
pub fn handle_error(error: anyhow::Error) -> ! {
    eprintln!();
    eprintln!("Error running scopin:");
    eprintln!("{error:#}");
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse and validate the command line.
pub fn get_cli_args() -> anyhow::Result<crate::core::cli::CliArgs> {
    use clap::Parser;
    let args = crate::core::cli::CliArgs::parse();
    args.validate().map_err(anyhow::Error::msg)?;
    Ok(args)
}
