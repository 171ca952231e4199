use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use highcomplex_pipelines::config::defs::PipelineError;
use highcomplex_pipelines::pipelines::read_filter::{
    package_outputs, run_filter_tool, FilterOutputs, OutputPackaging,
};
use highcomplex_pipelines::utils::command::bbduk::{arg_generator, BbdukConfig};

/// Drops an executable sh script standing in for bbduk into `dir`.
fn write_stub_tool(dir: &Path, body: &str) -> Result<PathBuf> {
    let path = dir.join("bbduk.sh");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body))?;
    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms)?;
    Ok(path)
}

fn paired_inputs(dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let read1 = dir.join("SRR579292_1.fastq");
    let read2 = dir.join("SRR579292_2.fastq");
    fs::write(&read1, "@r1\nACGT\n+\nIIII\n")?;
    fs::write(&read2, "@r1\nTGCA\n+\nIIII\n")?;
    Ok((read1, read2))
}

// Stand-in that prints a bbduk-like banner and touches out1=/out2= targets.
const SUCCESS_BODY: &str = r#"echo "Executing jgi.BBDuk [$*]" >&2
echo "Version 38.96" >&2
for a in "$@"; do
  case "$a" in
    out1=*) : > "${a#out1=}" ;;
    out2=*) : > "${a#out2=}" ;;
  esac
done
echo "Input is being processed as paired" >&2"#;

#[tokio::test]
async fn successful_run_collects_flat_outputs() -> Result<()> {
    let tmp = TempDir::new()?;
    let out_dir = tmp.path().join("out");
    fs::create_dir_all(&out_dir)?;
    let (read1, read2) = paired_inputs(tmp.path())?;
    let stub = write_stub_tool(tmp.path(), SUCCESS_BODY)?;

    let config = BbdukConfig {
        read1,
        read2,
        out1: out_dir.join("SRR579292_1_filtered.fastq"),
        out2: out_dir.join("SRR579292_2_filtered.fastq"),
        contaminants: None,
    };
    let args = arg_generator(&config, 4);

    let captured = run_filter_tool(&stub.to_string_lossy(), &args).await?;
    assert!(captured.status.success());
    assert!(captured.text.contains("Version 38.96"));
    assert!(captured.text.contains("Executing jgi.BBDuk"));

    match package_outputs(&OutputPackaging::Flat, &out_dir)? {
        FilterOutputs::Files(files) => {
            assert_eq!(files.len(), 2);
            assert_eq!(
                files[0].file_name().unwrap().to_string_lossy(),
                "SRR579292_1_filtered.fastq"
            );
            assert_eq!(
                files[1].file_name().unwrap().to_string_lossy(),
                "SRR579292_2_filtered.fastq"
            );
        }
        other => panic!("expected flat file listing, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn successful_run_returns_directory_handle() -> Result<()> {
    let tmp = TempDir::new()?;
    let sample_dir = tmp.path().join("SRR579292");
    fs::create_dir_all(&sample_dir)?;
    let (read1, read2) = paired_inputs(tmp.path())?;
    let stub = write_stub_tool(tmp.path(), SUCCESS_BODY)?;

    let config = BbdukConfig {
        read1,
        read2,
        out1: sample_dir.join("SRR579292_1_filtered.fastq"),
        out2: sample_dir.join("SRR579292_2_filtered.fastq"),
        contaminants: None,
    };
    let args = arg_generator(&config, 4);
    run_filter_tool(&stub.to_string_lossy(), &args).await?;

    match package_outputs(&OutputPackaging::Directory, &sample_dir)? {
        FilterOutputs::Directory(dir) => assert_eq!(dir, sample_dir),
        other => panic!("expected directory handle, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn failing_run_reports_exceptions_and_raises() -> Result<()> {
    let tmp = TempDir::new()?;
    let stub = write_stub_tool(
        tmp.path(),
        r#"echo "Executing jgi.BBDuk [$*]" >&2
echo "Exception in thread \"main\" java.lang.RuntimeException: Can't read file 'missing_R1.fastq'" >&2
echo "Caused by: java.io.FileNotFoundException: missing_R1.fastq" >&2
exit 1"#,
    )?;

    let args = vec!["in1=missing_R1.fastq".to_string(), "in2=missing_R2.fastq".to_string()];
    let err = run_filter_tool(&stub.to_string_lossy(), &args)
        .await
        .expect_err("non-zero exit must fail the task");
    match err {
        PipelineError::ToolExecution { tool, error } => {
            assert_eq!(tool, stub.to_string_lossy());
            assert!(error.contains("exit status"), "unexpected error text: {}", error);
        }
        other => panic!("expected ToolExecution, got {}", other),
    }
    Ok(())
}

#[tokio::test]
async fn zero_exit_with_incidental_exception_text_succeeds() -> Result<()> {
    let tmp = TempDir::new()?;
    let stub = write_stub_tool(
        tmp.path(),
        r#"echo "Version 38.96" >&2
echo "Note: java.lang.Exception classes are preloaded" >&2"#,
    )?;

    let captured = run_filter_tool(&stub.to_string_lossy(), &[]).await?;
    assert!(captured.status.success());
    Ok(())
}

#[tokio::test]
async fn zero_exit_without_outputs_is_missing_output() -> Result<()> {
    let tmp = TempDir::new()?;
    let out_dir = tmp.path().join("out");
    fs::create_dir_all(&out_dir)?;

    match package_outputs(&OutputPackaging::Flat, &out_dir) {
        Err(PipelineError::MissingOutput(msg)) => {
            assert!(msg.contains("filtered.fastq"), "unexpected message: {}", msg)
        }
        other => panic!("expected MissingOutput, got {:?}", other.map(|_| ())),
    }

    let missing_dir = tmp.path().join("never_created");
    match package_outputs(&OutputPackaging::Directory, &missing_dir) {
        Err(PipelineError::MissingOutput(_)) => {}
        other => panic!("expected MissingOutput, got {:?}", other.map(|_| ())),
    }

    // An existing but empty sample directory is also an error.
    match package_outputs(&OutputPackaging::Directory, &out_dir) {
        Err(PipelineError::MissingOutput(msg)) => {
            assert!(msg.contains("empty"), "unexpected message: {}", msg)
        }
        other => panic!("expected MissingOutput, got {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[tokio::test]
async fn missing_tool_fails_to_spawn() -> Result<()> {
    let err = run_filter_tool("definitely-not-bbduk.sh", &[])
        .await
        .expect_err("spawn must fail");
    match err {
        PipelineError::ToolExecution { error, .. } => {
            assert!(error.contains("Failed to spawn"), "unexpected error text: {}", error)
        }
        other => panic!("expected ToolExecution, got {}", other),
    }
    Ok(())
}
