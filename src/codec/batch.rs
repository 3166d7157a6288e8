//! Parallel file batch processing.
//!
//! Architecture:
//! - Main thread: send one job per file into a bounded channel
//! - Worker pool: read, compress or decompress, write output
//! - Main thread: collect results and return them in job order
//!
//! Each job runs the single-threaded pipeline; nothing is shared between jobs
//! except the read-only configuration.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crossbeam::channel::{bounded, unbounded, Receiver, Sender};
use log::debug;

use super::progress::{ChannelProgress, NoProgress, ProgressEvent, ProgressSink};
use super::{compress, decompress};
use crate::container::{Container, CONTAINER_EXTENSION};
use crate::error::{Error, Result};
use crate::{CodecConfig, CompressionStats};

/// Direction of a batch job
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchMode {
    Compress,
    Decompress,
}

/// One file to process
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchJob {
    pub mode: BatchMode,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl BatchJob {
    /// Job writing next to the input: `x` -> `x.huf`, `x.huf` -> `x`
    pub fn with_default_output(mode: BatchMode, input: PathBuf) -> Self {
        let output = default_output_path(mode, &input);
        Self { mode, input, output }
    }
}

/// Default output path for `input` in `mode`
pub fn default_output_path(mode: BatchMode, input: &Path) -> PathBuf {
    match mode {
        BatchMode::Compress => {
            let mut name = input.as_os_str().to_os_string();
            name.push(".");
            name.push(CONTAINER_EXTENSION);
            PathBuf::from(name)
        }
        BatchMode::Decompress => {
            if input.extension().is_some_and(|ext| ext == CONTAINER_EXTENSION) {
                input.with_extension("")
            } else {
                let mut name = input.as_os_str().to_os_string();
                name.push(".out");
                PathBuf::from(name)
            }
        }
    }
}

/// Summary of a finished job
#[derive(Clone, Debug, PartialEq)]
pub struct JobReport {
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// Present for compression jobs
    pub stats: Option<CompressionStats>,
}

/// A job together with its result
#[derive(Debug)]
pub struct JobOutcome {
    pub job: BatchJob,
    pub result: Result<JobReport>,
}

/// Runs batch jobs on a worker pool
pub struct BatchProcessor {
    config: CodecConfig,
    /// Number of worker threads (0 = auto, 1 = run on the calling thread)
    num_threads: usize,
}

impl BatchProcessor {
    pub fn new(config: CodecConfig, num_threads: usize) -> Self {
        Self { config, num_threads }
    }

    fn effective_threads(&self, num_jobs: usize) -> usize {
        let threads = match self.num_threads {
            0 => num_cpus::get().clamp(1, 32),
            n => n.clamp(1, 32),
        };
        threads.min(num_jobs.max(1))
    }

    /// Run every job. Per-job failures are reported in the outcome, not as an `Err`.
    pub fn run(
        &self,
        jobs: Vec<BatchJob>,
        progress: Option<Sender<ProgressEvent>>,
    ) -> Result<Vec<JobOutcome>> {
        let num_threads = self.effective_threads(jobs.len());
        debug!("Running {} jobs on {} threads", jobs.len(), num_threads);

        if num_threads == 1 {
            return Ok(jobs
                .into_iter()
                .enumerate()
                .map(|(index, job)| {
                    let result = self.run_job(index, &job, progress.clone());
                    JobOutcome { job, result }
                })
                .collect());
        }

        self.run_parallel(jobs, progress, num_threads)
    }

    fn run_parallel(
        &self,
        jobs: Vec<BatchJob>,
        progress: Option<Sender<ProgressEvent>>,
        num_threads: usize,
    ) -> Result<Vec<JobOutcome>> {
        let total = jobs.len();

        // Results are unbounded so dispatch never waits on collection
        let (job_tx, job_rx): (Sender<(usize, BatchJob)>, Receiver<(usize, BatchJob)>) =
            bounded(num_threads * 2);
        let (result_tx, result_rx): (Sender<(usize, JobOutcome)>, Receiver<(usize, JobOutcome)>) =
            unbounded();

        let result = crossbeam::scope(|scope| {
            for _ in 0..num_threads {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let progress = progress.clone();

                scope.spawn(move |_| {
                    while let Ok((index, job)) = job_rx.recv() {
                        let result = self.run_job(index, &job, progress.clone());
                        if result_tx.send((index, JobOutcome { job, result })).is_err() {
                            break;
                        }
                    }
                });
            }

            // Drop our copies of the channels that workers use
            drop(job_rx);
            drop(result_tx);

            for (index, job) in jobs.into_iter().enumerate() {
                if job_tx.send((index, job)).is_err() {
                    break;
                }
            }
            drop(job_tx);

            // Reorder by job index
            let ordered: BTreeMap<usize, JobOutcome> = result_rx.iter().collect();
            ordered.into_values().collect::<Vec<_>>()
        });

        let outcomes = result.map_err(|_| Error::Internal("Worker thread panicked".to_string()))?;
        if outcomes.len() != total {
            return Err(Error::Internal(format!(
                "expected {} job results, got {}",
                total,
                outcomes.len()
            )));
        }
        Ok(outcomes)
    }

    fn run_job(
        &self,
        index: usize,
        job: &BatchJob,
        progress: Option<Sender<ProgressEvent>>,
    ) -> Result<JobReport> {
        let mut sink: Box<dyn ProgressSink> = match progress {
            Some(tx) => Box::new(ChannelProgress::new(index, tx)),
            None => Box::new(NoProgress),
        };

        let input = fs::read(&job.input)?;
        debug!("Job {}: {:?} {} ({} bytes)", index, job.mode, job.input.display(), input.len());

        match job.mode {
            BatchMode::Compress => {
                let config = CodecConfig { file_name: file_name_of(&job.input), ..self.config.clone() };
                let result = compress(&input, &config, sink.as_mut())?;

                let mut writer = BufWriter::new(File::create(&job.output)?);
                let written = Container::from_result(&result, &config.file_name).write(&mut writer)?;
                writer.flush()?;

                Ok(JobReport {
                    input_bytes: input.len() as u64,
                    output_bytes: written as u64,
                    stats: Some(result.stats),
                })
            }
            BatchMode::Decompress => {
                let decompressed = decompress(&input, &self.config, sink.as_mut())?;
                fs::write(&job.output, &decompressed.data)?;

                Ok(JobReport {
                    input_bytes: input.len() as u64,
                    output_bytes: decompressed.data.len() as u64,
                    stats: None,
                })
            }
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}
