use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use clap::{Parser, Subcommand};
use crossbeam::channel::unbounded;
use log::LevelFilter;
use rlehuff::codec::batch::default_output_path;
use rlehuff::{
    BatchJob, BatchMode, BatchProcessor, CodecConfig, HufCodec, NoProgress, ProgressEvent,
    DEFAULT_MARKER_BYTES,
};

#[derive(Parser, Debug)]
#[command(name = "rlehuff")]
#[command(about = "Compress files with run-length + Huffman coding into .huf containers")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Show verbose statistics and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress files into .huf containers
    Compress {
        #[command(flatten)]
        io: IoArgs,

        /// Bytes that receive the frequency boost (default: markup structure bytes)
        #[arg(long)]
        marker_bytes: Option<String>,
    },
    /// Restore files from .huf containers
    Decompress {
        #[command(flatten)]
        io: IoArgs,

        /// Skip the CRC32 check after decoding
        #[arg(long)]
        no_verify: bool,
    },
    /// Print the metadata block of a container
    Inspect {
        /// Container file
        input: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct IoArgs {
    /// Input files (use - for stdin with a single input)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (single input only; use - for stdout, the default for stdin input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of threads (0 = auto, 1 = single-threaded)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,
}

const EXIT_OK: u8 = 0;
const EXIT_JOB_FAILED: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new().filter_level(default).parse_env("RUST_LOG").init();
}

fn run(args: Args) -> Result<u8, Box<dyn std::error::Error>> {
    match args.command {
        Command::Compress { io, marker_bytes } => {
            let config = CodecConfig {
                marker_bytes: marker_bytes
                    .map(String::into_bytes)
                    .unwrap_or_else(|| DEFAULT_MARKER_BYTES.to_vec()),
                ..Default::default()
            };
            run_mode(BatchMode::Compress, io, config, args.verbose, args.quiet)
        }
        Command::Decompress { io, no_verify } => {
            let config = CodecConfig { verify_checksum: !no_verify, ..Default::default() };
            run_mode(BatchMode::Decompress, io, config, args.verbose, args.quiet)
        }
        Command::Inspect { input } => run_inspect(input),
    }
}

fn run_mode(
    mode: BatchMode,
    io: IoArgs,
    config: CodecConfig,
    verbose: bool,
    quiet: bool,
) -> Result<u8, Box<dyn std::error::Error>> {
    if io.output.is_some() && io.inputs.len() > 1 {
        return Err("--output can only be used with a single input".into());
    }

    // Stdin/stdout go through the in-memory path; files go through the batch processor
    let is_stdin = io.inputs.len() == 1 && io.inputs[0].to_str() == Some("-");
    let is_stdout = io.output.as_ref().and_then(|p| p.to_str()) == Some("-");
    if is_stdin || is_stdout {
        return run_streams(mode, io, config, verbose);
    }

    let jobs: Vec<BatchJob> = match io.output {
        Some(output) => {
            let input = io.inputs.into_iter().next().ok_or("no input given")?;
            vec![BatchJob { mode, input, output }]
        }
        None => {
            io.inputs.into_iter().map(|input| BatchJob::with_default_output(mode, input)).collect()
        }
    };

    // Progress printer thread; unbounded so the final 100% event is never dropped
    let names: Vec<String> = jobs.iter().map(|j| j.input.display().to_string()).collect();
    let (progress_tx, progress_rx) = unbounded::<ProgressEvent>();
    let printer = thread::spawn(move || {
        for event in progress_rx {
            if !quiet {
                eprint!("\r{:>3}% {:<24} {}", event.percent, event.stage, names[event.job]);
                if event.percent == 100 {
                    eprintln!();
                }
            }
        }
    });

    let start = std::time::Instant::now();
    let processor = BatchProcessor::new(config, io.threads);
    let outcomes = processor.run(jobs, Some(progress_tx))?;
    let elapsed = start.elapsed();
    let _ = printer.join();

    let mut code = EXIT_OK;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => {
                if verbose {
                    eprintln!("{}:", outcome.job.input.display());
                    eprintln!("  Output:           {}", outcome.job.output.display());
                    eprintln!("  Input bytes:      {}", report.input_bytes);
                    eprintln!("  Output bytes:     {}", report.output_bytes);
                    if let Some(stats) = &report.stats {
                        eprintln!("  After RLE:        {}", stats.transformed_size);
                        eprintln!("  Distinct bytes:   {}", stats.distinct_bytes);
                        eprintln!("  Entropy:          {:.4} bits/symbol", stats.entropy);
                        eprintln!("  Ratio:            {:.2}%", stats.compression_ratio);
                        eprintln!("  Efficiency:       {:.2}%", stats.efficiency);
                        eprintln!("  Tree depth:       {}", stats.tree_depth);
                    }
                }
            }
            Err(e) => {
                eprintln!("Error: {}: {}", outcome.job.input.display(), e);
                code = EXIT_JOB_FAILED;
            }
        }
    }

    if verbose {
        eprintln!("Processed {} file(s) in {:.2?}", outcomes.len(), elapsed);
    }

    Ok(code)
}

fn run_streams(
    mode: BatchMode,
    io: IoArgs,
    config: CodecConfig,
    verbose: bool,
) -> Result<u8, Box<dyn std::error::Error>> {
    let input_path = io.inputs.into_iter().next().ok_or("no input given")?;
    let from_stdin = input_path.to_str() == Some("-");
    let input = if from_stdin {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        buffer
    } else {
        fs::read(&input_path)?
    };

    let output_path = match io.output {
        Some(path) => path,
        None if from_stdin => PathBuf::from("-"),
        None => default_output_path(mode, &input_path),
    };

    let file_name = if from_stdin {
        String::new()
    } else {
        input_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    };
    let codec = HufCodec::new(CodecConfig { file_name, ..config });
    let output = match mode {
        BatchMode::Compress => codec.compress_to_container(&input, &mut NoProgress)?,
        BatchMode::Decompress => codec.decompress(&input, &mut NoProgress)?.data,
    };

    if output_path.to_str() == Some("-") {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&output)?;
        stdout.flush()?;
    } else {
        fs::write(&output_path, &output)?;
    }

    if verbose {
        eprintln!("  Input bytes:      {}", input.len());
        eprintln!("  Output bytes:     {}", output.len());
    }

    Ok(EXIT_OK)
}

fn run_inspect(input: PathBuf) -> Result<u8, Box<dyn std::error::Error>> {
    let bytes = fs::read(&input)?;
    let metadata = HufCodec::inspect(&bytes)?;

    println!("File name:        {}", metadata.file_name);
    println!("Version:          {}", metadata.version);
    println!("Original size:    {}", metadata.original_size);
    println!("Container size:   {}", bytes.len());
    println!("Padding bits:     {}", metadata.padding);
    println!("Distinct bytes:   {}", metadata.distinct_bytes);
    println!("Entropy:          {:.4} bits/symbol", metadata.entropy);
    println!("Ratio:            {:.2}%", metadata.compression_ratio);
    println!("Efficiency:       {:.2}%", metadata.efficiency);
    match metadata.crc32 {
        Some(crc) => println!("CRC32:            0x{:08x}", crc),
        None => println!("CRC32:            (none)"),
    }

    Ok(EXIT_OK)
}
