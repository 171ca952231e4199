use std::path::{Path, PathBuf};
use anyhow::{anyhow, Result};
use glob::glob;
use crate::config::defs::{PipelineError, RunConfig};

/// Rebuilds a file path: resolves relative paths against `base_dir` and
/// decorates the file name with an optional prefix/suffix joined by
/// `separator`.
///
/// # Arguments
/// * `path` - Input path, absolute or relative.
/// * `base_dir` - Directory to resolve relative paths against.
/// * `prefix` - Optional string prepended to the file name.
/// * `suffix` - Optional string appended to the file name.
/// * `separator` - Joiner between name and prefix/suffix.
///
/// # Returns
/// The manipulated path.
pub fn file_path_manipulator(
    path: &PathBuf,
    base_dir: Option<&PathBuf>,
    prefix: Option<&str>,
    suffix: Option<&str>,
    separator: &str,
) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(prefix) = prefix {
        name = format!("{}{}{}", prefix, separator, name);
    }
    if let Some(suffix) = suffix {
        name = format!("{}{}{}", name, separator, suffix);
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::new(),
    };
    let dir = if path.is_absolute() {
        parent
    } else {
        match base_dir {
            Some(base) => base.join(parent),
            None => parent,
        }
    };
    dir.join(name)
}

/// Resolves and existence-checks the pipeline inputs before anything is
/// spawned: both reads are required, the contaminants FASTA is optional.
///
/// # Arguments
/// * `config` - RunConfig struct from main.
///
/// # Returns
/// Absolute paths to read1, read2, and the contaminants file when given.
pub fn validate_file_inputs(
    config: &RunConfig,
) -> Result<(PathBuf, PathBuf, Option<PathBuf>), PipelineError> {
    let read1 = resolve_existing(config.args.file1.as_deref(), "read 1 (-i)", &config.cwd)?;
    let read2 = resolve_existing(config.args.file2.as_deref(), "read 2 (-I)", &config.cwd)?;
    let contaminants = match config.args.contaminants.as_deref() {
        Some(file) => Some(resolve_existing(Some(file), "contaminants (-c)", &config.cwd)?),
        None => None,
    };
    Ok((read1, read2, contaminants))
}

fn resolve_existing(
    file: Option<&str>,
    label: &str,
    cwd: &PathBuf,
) -> Result<PathBuf, PipelineError> {
    let file = file.ok_or_else(|| PipelineError::InvalidConfig(format!("{} path required", label)))?;
    let path = file_path_manipulator(&PathBuf::from(file), Some(cwd), None, None, "");
    if !path.exists() {
        return Err(PipelineError::InvalidConfig(format!(
            "Cannot find {}: {}",
            label,
            path.display()
        )));
    }
    Ok(path)
}

/// Collects tool outputs under `out_dir` matching `pattern`, sorted by name.
/// A successful exit with no matching files is an error.
pub fn collect_filtered_outputs(out_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = out_dir.join(pattern);
    let mut files = Vec::new();
    for entry in glob(&full_pattern.to_string_lossy())? {
        files.push(entry?);
    }
    files.sort();
    if files.is_empty() {
        return Err(anyhow!(
            "No files matching {} under {}",
            pattern,
            out_dir.display()
        ));
    }
    Ok(files)
}

/// Verifies a tool-written output directory exists and holds at least one
/// entry, returning it as the output handle.
pub fn ensure_populated_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(anyhow!("Output directory {} was not created", dir.display()));
    }
    let mut entries = std::fs::read_dir(dir)?;
    if entries.next().is_none() {
        return Err(anyhow!("Output directory {} is empty", dir.display()));
    }
    Ok(dir.to_path_buf())
}
