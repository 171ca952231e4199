use std::collections::HashMap;
use std::path::PathBuf;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use crate::cli::Arguments;

// External software
pub const BBDUK_TAG: &str = "bbduk.sh";

lazy_static! {
    pub static ref TOOL_VERSIONS: HashMap<&'static str, f32> = {
        let mut m = HashMap::new();
        m.insert(BBDUK_TAG, 38.9);

        m
    };
}

lazy_static! {
    // BBTools prints either "Version 38.96" or "BBDuk version 38.96" in its banner.
    pub static ref BBDUK_VERSION_RE: Regex =
        Regex::new(r"(?m)^(?:BBDuk\s+)?[Vv]ersion:?\s+([0-9][0-9.]*)").unwrap();
    // e.g. "Executing jgi.BBDuk [in1=..., in2=..., threads=31]"
    pub static ref BBDUK_EXEC_RE: Regex =
        Regex::new(r"(?m)^Executing\s+(.+?)\s*$").unwrap();
    // Substring match: Java exception class names embed "Exception" without a
    // word boundary (e.g. RuntimeException, FileNotFoundException).
    pub static ref EXCEPTION_RE: Regex = Regex::new(r"Exception").unwrap();
}

// Static Filenames
pub const FILTERED_GLOB: &str = "*filtered.fastq";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{tool} failed: {error}")]
    ToolExecution { tool: String, error: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing output: {0}")]
    MissingOutput(String),

    #[error("I/O error: {0}")]
    IOError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub struct RunConfig {
    pub cwd: PathBuf,
    pub out_dir: PathBuf,
    pub threads: usize,
    pub args: Arguments,
}
