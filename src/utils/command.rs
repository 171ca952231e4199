/// Functions and structs for working with creating command-line arguments

use anyhow::{anyhow, Result};
use log::{info, warn};
use crate::config::defs::{RunConfig, BBDUK_TAG, TOOL_VERSIONS};

pub mod bbduk {
    use std::path::PathBuf;
    use anyhow::{anyhow, Result};
    use tokio::process::Command;
    use crate::config::defs::{BBDUK_TAG, BBDUK_EXEC_RE, BBDUK_VERSION_RE, EXCEPTION_RE};
    use crate::utils::streams::{read_child_output_to_vec, ChildStream};

    /// Paths fed to a single bbduk invocation. All paths are local and
    /// absolute by the time this is built.
    pub struct BbdukConfig {
        pub read1: PathBuf,
        pub read2: PathBuf,
        pub out1: PathBuf,
        pub out2: PathBuf,
        pub contaminants: Option<PathBuf>,
    }

    pub async fn bbduk_presence_check() -> Result<String> {
        presence_check_at(BBDUK_TAG).await
    }

    /// Spawns `<tool> --version` and parses the version out of its banner.
    /// Takes the command name or path so stand-ins can be checked too.
    /// Only stderr is piped; the other stdio is nulled so a chatty stream
    /// cannot back up and stall the child.
    pub async fn presence_check_at(tool: &str) -> Result<String> {
        let args: Vec<&str> = vec!["--version"];

        let cmd_tag_owned = tool.to_string();
        let mut child = Command::new(tool)
            .args(&args)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| anyhow!("Failed to spawn {}: {}. Is bbduk installed?", cmd_tag_owned, e))?;

        // BBTools prints its banner, version included, on stderr.
        let lines = read_child_output_to_vec(&mut child, ChildStream::Stderr).await?;
        let version = lines
            .iter()
            .find_map(|line| extract_version(line))
            .ok_or_else(|| anyhow!("No version in {} --version output", tool))?;
        Ok(version)
    }

    /// bbduk takes single-token key=value arguments.
    pub fn arg_generator(config: &BbdukConfig, threads: usize) -> Vec<String> {
        let mut args_vec: Vec<String> = Vec::new();
        args_vec.push(format!("in1={}", config.read1.display()));
        args_vec.push(format!("in2={}", config.read2.display()));
        args_vec.push(format!("out1={}", config.out1.display()));
        args_vec.push(format!("out2={}", config.out2.display()));
        args_vec.push(format!("threads={}", threads));

        if let Some(reference) = &config.contaminants {
            args_vec.push(format!("ref={}", reference.display()));
        }

        args_vec
    }

    /// Pulls the version number out of bbduk banner text, if present.
    pub fn extract_version(text: &str) -> Option<String> {
        BBDUK_VERSION_RE
            .captures(text)
            .map(|caps| caps[1].to_string())
    }

    /// Pulls the executed-command string out of bbduk banner text,
    /// e.g. "jgi.BBDuk [in1=..., in2=..., threads=31]".
    pub fn extract_exec_command(text: &str) -> Option<String> {
        BBDUK_EXEC_RE
            .captures(text)
            .map(|caps| caps[1].to_string())
    }

    /// Collects every output line carrying a Java exception.
    pub fn extract_exception_lines(text: &str) -> Vec<String> {
        text.lines()
            .filter(|line| EXCEPTION_RE.is_match(line))
            .map(|line| line.trim().to_string())
            .collect()
    }
}

pub fn generate_cli(tool: &str, config: &RunConfig, bbduk_config: Option<&bbduk::BbdukConfig>) -> Result<Vec<String>> {
    let cmd = match tool {
        BBDUK_TAG => {
            let view = bbduk_config.ok_or_else(|| anyhow!("Missing bbduk config view"))?;
            bbduk::arg_generator(view, config.threads)
        }
        _ => return Err(anyhow!("Unknown tool: {}", tool)),
    };

    Ok(cmd)
}

pub async fn check_version(tool: &str) -> Result<String> {
    let version = match tool {
        BBDUK_TAG => bbduk::bbduk_presence_check().await,
        _ => return Err(anyhow!("Unknown tool: {}", tool)),
    };
    Ok(version?)
}

/// Returns the supported minimum from TOOL_VERSIONS when `version` falls
/// below it.
pub fn version_below_minimum(tool: &str, version: &str) -> Option<f32> {
    let min_version = TOOL_VERSIONS.get(tool)?;
    let major_minor: f32 = version
        .split('.')
        .take(2)
        .collect::<Vec<_>>()
        .join(".")
        .parse()
        .unwrap_or(0.0);
    (major_minor < *min_version).then_some(*min_version)
}

/// Presence-checks each tool and warns when one is older than the supported
/// minimum in TOOL_VERSIONS.
pub async fn check_versions(tools: Vec<&str>) -> Result<()> {
    for tool in tools {
        let version = check_version(tool).await?;
        info!("{} version {}", tool, version);
        if let Some(min_version) = version_below_minimum(tool, &version) {
            warn!(
                "{} version {} is older than supported minimum {}",
                tool, version, min_version
            );
        }
    }
    Ok(())
}
