//! `stagehand` CLI entrypoint.
//!
//! Provisions tool releases, builds native installers and writes SHA-256
//! manifests. Progress goes to stderr; results requested with flags such as
//! `--print-path` go to stdout.

use clap::Parser;
use stagehand_common::Platform;
use stagehand_installer::artefact::download::HttpDownloader;
use stagehand_installer::artefact::extraction::ArchiveExtractor;
use stagehand_installer::cli::{Cli, Command};
use stagehand_installer::commands::{
    Console, InstallContext, run_hash_manifest, run_install, run_package,
};
use stagehand_installer::dirs::SystemBaseDirs;
use stagehand_installer::error::CliError;
use stagehand_installer::output::write_stderr_line;
use stagehand_installer::packaging::SystemProcessRunner;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = {
        let mut console = Console {
            stdout: &mut stdout,
            stderr: &mut stderr,
            quiet: cli.quiet,
        };
        run(&cli, &mut console)
    };
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging(cli: &Cli) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level().as_str()),
    )
    .format_timestamp(None)
    .init();
}

fn run(cli: &Cli, console: &mut Console<'_>) -> Result<(), CliError> {
    match &cli.command {
        Command::Install(args) => {
            let context = InstallContext {
                dirs: &SystemBaseDirs,
                downloader: &HttpDownloader,
                extractor: &ArchiveExtractor,
            };
            run_install(args, Platform::detect(), &context, console)?;
        }
        Command::Package(args) => {
            run_package(args, &SystemProcessRunner, console)?;
        }
        Command::HashManifest(args) => {
            run_hash_manifest(args, Platform::detect(), console)?;
        }
    }
    Ok(())
}

fn exit_code_for_run_result(result: Result<(), CliError>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format_args!("error: {err}"));
            1
        }
    }
}
