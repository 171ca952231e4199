use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use log::{debug, error, info};
use tokio::process::Command;
use crate::config::defs::{PipelineError, RunConfig, BBDUK_TAG, FILTERED_GLOB};
use crate::utils::command::{bbduk, check_versions, generate_cli};
use crate::utils::command::bbduk::BbdukConfig;
use crate::utils::file::{collect_filtered_outputs, ensure_populated_dir, validate_file_inputs};
use crate::utils::streams::{capture_child_output, CapturedOutput};

/// How successful outputs are handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputPackaging {
    /// Flat listing of files matching the filtered-read glob in the run dir.
    Flat,
    /// Per-sample output directory returned as a single handle.
    Directory,
}

#[derive(Debug)]
pub enum FilterOutputs {
    Files(Vec<PathBuf>),
    Directory(PathBuf),
}

/// Run function for the bbduk read-filtering pipeline.
///
/// # Arguments
///
/// * `config` - RunConfig struct from main.
/// * `packaging` - Output packaging mode.
///
/// # Returns
/// FilterOutputs on success.
pub async fn run(
    config: Arc<RunConfig>,
    packaging: OutputPackaging,
) -> Result<FilterOutputs, PipelineError> {
    println!("\n-------------\n Read Filter\n-------------\n");

    // External tools check
    check_versions(vec![BBDUK_TAG]).await.map_err(PipelineError::Other)?;

    let (read1_path, read2_path, contaminants_path) = validate_file_inputs(&config)?;

    let sample_name = config.args.sample_name.clone();
    let run_dir = match packaging {
        OutputPackaging::Flat => config.out_dir.clone(),
        OutputPackaging::Directory => {
            let dir = config.out_dir.join(&sample_name);
            fs::create_dir_all(&dir).map_err(|e| PipelineError::IOError(e.to_string()))?;
            dir
        }
    };

    let bbduk_config = BbdukConfig {
        read1: read1_path,
        read2: read2_path,
        out1: run_dir.join(format!("{}_1_filtered.fastq", sample_name)),
        out2: run_dir.join(format!("{}_2_filtered.fastq", sample_name)),
        contaminants: contaminants_path,
    };
    let bbduk_args = generate_cli(BBDUK_TAG, &config, Some(&bbduk_config))
        .map_err(|e| PipelineError::ToolExecution {
            tool: BBDUK_TAG.to_string(),
            error: e.to_string(),
        })?;
    debug!("{} args: {:?}", BBDUK_TAG, bbduk_args);

    run_filter_tool(BBDUK_TAG, &bbduk_args).await?;

    package_outputs(&packaging, &run_dir)
}

/// Spawns the filtering tool and supervises it to completion. Output lines
/// are echoed as they arrive and kept for banner and diagnostics scanning.
/// Success is decided by the exit status alone; on a non-zero exit each
/// exception line from the output is reported before the task fails.
///
/// # Arguments
///
/// * `tool` - Tool command name or path.
/// * `args` - Fully-built argv.
///
/// # Returns
/// CapturedOutput from the finished child.
pub async fn run_filter_tool(tool: &str, args: &[String]) -> Result<CapturedOutput, PipelineError> {
    let child = Command::new(tool)
        .args(args)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .map_err(|e| PipelineError::ToolExecution {
            tool: tool.to_string(),
            error: format!("Failed to spawn: {}. Is bbduk installed?", e),
        })?;

    let captured = capture_child_output(child, tool)
        .await
        .map_err(|e| PipelineError::ToolExecution {
            tool: tool.to_string(),
            error: e.to_string(),
        })?;

    if let Some(version) = bbduk::extract_version(&captured.text) {
        info!("{} version {}", tool, version);
    }
    if let Some(command) = bbduk::extract_exec_command(&captured.text) {
        info!("{} executing {}", tool, command);
    }

    if !captured.status.success() {
        // One report per exception line; incidental exception text on a zero
        // exit never reaches this path.
        for line in bbduk::extract_exception_lines(&captured.text) {
            error!("{}: {}", tool, line);
        }
        return Err(PipelineError::ToolExecution {
            tool: tool.to_string(),
            error: format!("exited with {}", captured.status),
        });
    }

    Ok(captured)
}

/// Packages the outputs of a successful run.
///
/// # Arguments
///
/// * `packaging` - Output packaging mode.
/// * `run_dir` - Directory the tool wrote into.
///
/// # Returns
/// FilterOutputs, or MissingOutput when nothing was produced.
pub fn package_outputs(
    packaging: &OutputPackaging,
    run_dir: &Path,
) -> Result<FilterOutputs, PipelineError> {
    match packaging {
        OutputPackaging::Flat => {
            let files = collect_filtered_outputs(run_dir, FILTERED_GLOB)
                .map_err(|e| PipelineError::MissingOutput(e.to_string()))?;
            info!("Collected {} filtered read files", files.len());
            Ok(FilterOutputs::Files(files))
        }
        OutputPackaging::Directory => {
            let dir = ensure_populated_dir(run_dir)
                .map_err(|e| PipelineError::MissingOutput(e.to_string()))?;
            info!("Filtered reads written to {}", dir.display());
            Ok(FilterOutputs::Directory(dir))
        }
    }
}
