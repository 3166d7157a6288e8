//! Progress reporting for long-running pipeline stages.
//!
//! A [`ProgressSink`] is passed explicitly into every compress or decompress
//! call. Sinks are observational: they must return promptly and cannot
//! influence the pipeline.

use crossbeam::channel::Sender;

/// Receiver of (percentage, stage label) progress reports
pub trait ProgressSink {
    fn report(&mut self, percent: u8, stage: &str);
}

impl<F: FnMut(u8, &str)> ProgressSink for F {
    fn report(&mut self, percent: u8, stage: &str) {
        self(percent, stage)
    }
}

/// Sink that discards every report
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: u8, _stage: &str) {}
}

/// A single progress report sent through a channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Identifies the job when several share one channel
    pub job: usize,
    pub percent: u8,
    pub stage: String,
}

/// Sink forwarding reports to a channel without ever blocking.
///
/// Reports are dropped when the channel is full or disconnected.
pub struct ChannelProgress {
    job: usize,
    tx: Sender<ProgressEvent>,
}

impl ChannelProgress {
    pub fn new(job: usize, tx: Sender<ProgressEvent>) -> Self {
        Self { job, tx }
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&mut self, percent: u8, stage: &str) {
        let _ = self.tx.try_send(ProgressEvent { job: self.job, percent, stage: stage.to_string() });
    }
}

/// Stage labels
pub mod stage {
    pub const PREPROCESSING: &str = "Preprocessing (RLE)";
    pub const ANALYZING: &str = "Analyzing frequencies";
    pub const BUILDING_TREE: &str = "Building Huffman tree";
    pub const ENCODING: &str = "Encoding";
    pub const PACKING: &str = "Packing bits";
    pub const READING: &str = "Reading container";
    pub const DECODING: &str = "Decoding";
    pub const EXPANDING: &str = "Expanding runs";
    pub const VERIFYING: &str = "Verifying";
    pub const COMPLETE: &str = "Complete";
}

/// Wraps a sink and keeps reported percentages non-decreasing and within 0-100
pub(crate) struct ProgressTracker<'a> {
    sink: &'a mut dyn ProgressSink,
    last: u8,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self { sink, last: 0 }
    }

    pub(crate) fn report(&mut self, percent: u8, stage: &str) {
        let percent = percent.min(100).max(self.last);
        self.last = percent;
        self.sink.report(percent, stage);
    }

    /// Report position `done` of `total` mapped into the `[from, to]` percentage band
    pub(crate) fn report_fraction(&mut self, from: u8, to: u8, done: usize, total: usize, stage: &str) {
        let span = to.saturating_sub(from) as usize;
        let offset = if total == 0 { span } else { span * done.min(total) / total };
        self.report(from + offset as u8, stage);
    }
}
