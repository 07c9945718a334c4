//! Plugin dist builder CLI entrypoint.
//!
//! This binary builds a WebAssembly plugin with cargo and assembles its
//! `dist/` directory, optionally packaging it as an `.abp` archive.

use plugin_dist::cli::Cli;
use plugin_dist::config::DistConfig;
use plugin_dist::error::Result;
use plugin_dist::executor::SystemCommandExecutor;
use plugin_dist::output::write_stderr_line;
use plugin_dist::pipeline::{PipelineContext, run_dry, run_pipeline};
use std::io::Write;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse_args(std::env::args_os());
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let config = DistConfig::from_cli(cli)?;
    let plan = cli.build_plan();
    let context = PipelineContext {
        config: &config,
        plan: &plan,
    };

    // Dry-run mode: show what would be done without side effects
    if cli.dry_run {
        run_dry(&context, stderr);
        return Ok(());
    }

    run_pipeline(&context, &SystemCommandExecutor, stderr)?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, &err);
            err.exit_code()
        }
    }
}
