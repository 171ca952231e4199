mod pipelines;
mod utils;
mod config;
mod cli;

use std::time::Instant;
use std::{env, fs};
use std::path::PathBuf;
use std::sync::Arc;
use std::io::Write;

use anyhow::Result;
use log::{self, LevelFilter, debug, info, error};
use env_logger::Builder;

use crate::cli::parse;
use crate::cli::args::Module;
use crate::config::defs::{RunConfig, PipelineError};
use crate::pipelines::read_filter;
use crate::pipelines::read_filter::{FilterOutputs, OutputPackaging};
use crate::utils::system::detect_cores_and_load;

#[tokio::main]
async fn main() -> Result<()> {
    let run_start = Instant::now();

    let args = parse();

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    println!("\n-------------\n HighComplexity\n-------------\n");

    let dir = env::current_dir()?;
    info!("The current directory is {:?}\n", dir);

    let (max_cores, cpu_load) = detect_cores_and_load(args.threads).await?;
    debug!("Detected {} usable cores; CPU load {}%", max_cores, cpu_load);

    let out_dir = setup_output_dir(&args, &dir)?;
    let module = args.module.clone();
    let run_config = Arc::new(RunConfig {
        cwd: dir,
        out_dir,
        threads: max_cores,
        args,
    });

    if let Err(e) = match module {
        Module::ReadFilter => read_filter_run(run_config, OutputPackaging::Flat).await,
        Module::ReadFilterDir => read_filter_run(run_config, OutputPackaging::Directory).await,
    } {
        error!("Pipeline failed: {} at {} milliseconds.", e, run_start.elapsed().as_millis());
        std::process::exit(1);
    }

    println!("Run complete: {} milliseconds.", run_start.elapsed().as_millis());
    Ok(())
}

async fn read_filter_run(
    run_config: Arc<RunConfig>,
    packaging: OutputPackaging,
) -> Result<(), PipelineError> {
    match read_filter::run(run_config, packaging).await? {
        FilterOutputs::Files(files) => {
            for file in files {
                info!("Output: {}", file.display());
            }
        }
        FilterOutputs::Directory(dir) => {
            info!("Output directory: {}", dir.display());
        }
    }
    Ok(())
}

/// Sets up output directory
/// If `out_dir` is specified from args, uses it;
/// otherwise, creates a directory named `<sample_name>_YYYYMMDD`.
/// Ensures the directory exists.
///
/// # Arguments
/// * `args` - The parsed command-line arguments.
/// * `cwd` - The current working directory.
/// # Returns
/// path to the output directory.
fn setup_output_dir(args: &cli::args::Arguments, cwd: &PathBuf) -> Result<PathBuf> {
    let out_dir = match &args.out_dir {
        Some(out) => {
            let path = PathBuf::from(out);
            if path.is_absolute() {
                path
            } else {
                cwd.join(path)
            }
        }
        None => {
            let timestamp = chrono::Local::now().format("%Y%m%d").to_string();
            cwd.join(format!("{}_{}", args.sample_name, timestamp))
        }
    };
    fs::create_dir_all(&out_dir)?;
    Ok(out_dir)
}
