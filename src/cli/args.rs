use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, ValueEnum, Default, PartialEq)]
pub enum Module {
    /// Flat listing of the filtered read files
    #[default]
    #[value(name = "read_filter")]
    ReadFilter,
    /// Per-sample output directory handle
    #[value(name = "read_filter_dir")]
    ReadFilterDir,
}

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "highcomplex-pipelines", version)]
pub struct Arguments {

    #[arg(short, long, value_enum, help = "Pipeline module to run")]
    pub module: Module,

    #[arg(short = 'v', long = "verbose", action)]
    pub verbose: bool,

    #[arg(short = 'i', long = "file1", help = "Paired-end read 1 FASTQ")]
    pub file1: Option<String>,

    #[arg(short = 'I', long = "file2", help = "Paired-end read 2 FASTQ")]
    pub file2: Option<String>,

    #[arg(short = 's', long = "sample-name", default_value = "BBDuk_Sample", help = "Sample name (will define output file names)")]
    pub sample_name: String,

    #[arg(short = 'c', long = "contaminants", help = "FASTA file with contaminant sequences; the ref= flag is omitted when not given")]
    pub contaminants: Option<String>,

    #[arg(short = 'o', long = "out", help = "Output directory for all generated files. If not specified, a directory named '<sample_name>_YYYYMMDD' will be created in the current working directory.")]
    pub out_dir: Option<String>,

    #[arg(long, default_value_t = 31)]
    pub threads: usize,
}
