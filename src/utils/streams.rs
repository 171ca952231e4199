// src/utils/streams.rs
use std::process::ExitStatus;
use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Child;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChildStream {
    Stdout,
    Stderr,
}

/// Exit status and concatenated output text of a finished child process.
#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub text: String,
}

/// Reads one output stream of a child process to completion and reaps it.
///
/// # Arguments
///
/// * `child` - Spawned child with piped stdio.
/// * `stream` - Which stream to drain.
///
/// # Returns
/// Vector of output lines.
pub async fn read_child_output_to_vec(child: &mut Child, stream: ChildStream) -> Result<Vec<String>> {
    let mut lines_out = Vec::new();
    match stream {
        ChildStream::Stdout => {
            let stdout = child
                .stdout
                .take()
                .ok_or_else(|| anyhow!("Child stdout was not piped"))?;
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                lines_out.push(line);
            }
        }
        ChildStream::Stderr => {
            let stderr = child
                .stderr
                .take()
                .ok_or_else(|| anyhow!("Child stderr was not piped"))?;
            let mut lines = BufReader::new(stderr).lines();
            while let Some(line) = lines.next_line().await? {
                lines_out.push(line);
            }
        }
    }
    child.wait().await?;
    Ok(lines_out)
}

/// Supervises a child to completion: stdout and stderr line streams are
/// merged, echoed to this process's stderr as they arrive, and accumulated
/// into one buffer.
///
/// # Arguments
///
/// * `child` - Spawned child with piped stdout and stderr.
/// * `tag` - Tool tag used to prefix echoed lines.
///
/// # Returns
/// CapturedOutput with the exit status and the concatenated text.
pub async fn capture_child_output(mut child: Child, tag: &str) -> Result<CapturedOutput> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("Child stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("Child stderr was not piped"))?;

    let stdout_lines = LinesStream::new(BufReader::new(stdout).lines());
    let stderr_lines = LinesStream::new(BufReader::new(stderr).lines());
    let mut merged = stdout_lines.merge(stderr_lines);

    let mut buffer = String::new();
    while let Some(line) = merged.next().await {
        let line = line?;
        eprintln!("[{}] {}", tag, line);
        buffer.push_str(&line);
        buffer.push('\n');
    }

    let status = child.wait().await?;
    Ok(CapturedOutput { status, text: buffer })
}
