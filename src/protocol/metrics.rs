use std::sync::atomic::{AtomicU64, Ordering};

use super::Command;

/// Track protocol engine counters without external dependencies.
pub(crate) struct Metrics;

static BYTES_PROCESSED: AtomicU64 = AtomicU64::new(0);
static BYTES_IGNORED: AtomicU64 = AtomicU64::new(0);
static PARAMETERS: AtomicU64 = AtomicU64::new(0);
static PROTOCOL_ERRORS: AtomicU64 = AtomicU64::new(0);
static STOP_RECOVERIES: AtomicU64 = AtomicU64::new(0);
static STATUS_REPORTS: AtomicU64 = AtomicU64::new(0);
static SUPERSTATUS_REPORTS: AtomicU64 = AtomicU64::new(0);

struct CommandCounters {
    motion: AtomicU64,
    reference: AtomicU64,
    offset: AtomicU64,
    assist: AtomicU64,
    none: AtomicU64,
}

static COMMAND_COUNTERS: CommandCounters = CommandCounters::new();

impl CommandCounters {
    const fn new() -> Self {
        Self {
            motion: AtomicU64::new(0),
            reference: AtomicU64::new(0),
            offset: AtomicU64::new(0),
            assist: AtomicU64::new(0),
            none: AtomicU64::new(0),
        }
    }

    fn increment(&self, command: Command) {
        let counter = if command.is_motion() {
            &self.motion
        } else {
            match command {
                Command::RefRelative
                | Command::RefAbsolute
                | Command::RefStore
                | Command::RefRestore => &self.reference,
                Command::OffsetStore | Command::OffsetRestore => &self.offset,
                Command::AirEnable
                | Command::AirDisable
                | Command::AuxEnable
                | Command::AuxDisable => &self.assist,
                _ => &self.none,
            }
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Kind of telegram emitted.
#[derive(Clone, Copy)]
pub(crate) enum ReportKind {
    Status,
    Superstatus,
}

impl Metrics {
    #[inline]
    pub(crate) fn record_byte() {
        BYTES_PROCESSED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_ignored_byte() {
        BYTES_IGNORED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_command(command: Command) {
        COMMAND_COUNTERS.increment(command);
    }

    #[inline]
    pub(crate) fn record_parameter() {
        PARAMETERS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_error() {
        PROTOCOL_ERRORS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_stop_recovery() {
        STOP_RECOVERIES.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_report(kind: ReportKind) {
        match kind {
            ReportKind::Status => STATUS_REPORTS.fetch_add(1, Ordering::Relaxed),
            ReportKind::Superstatus => SUPERSTATUS_REPORTS.fetch_add(1, Ordering::Relaxed),
        };
    }

    #[inline]
    pub(crate) fn totals() -> MetricsSnapshot {
        MetricsSnapshot {
            bytes_processed: BYTES_PROCESSED.load(Ordering::Relaxed),
            bytes_ignored: BYTES_IGNORED.load(Ordering::Relaxed),
            parameters: PARAMETERS.load(Ordering::Relaxed),
            motion_commands: COMMAND_COUNTERS.motion.load(Ordering::Relaxed),
            reference_commands: COMMAND_COUNTERS.reference.load(Ordering::Relaxed),
            offset_commands: COMMAND_COUNTERS.offset.load(Ordering::Relaxed),
            assist_commands: COMMAND_COUNTERS.assist.load(Ordering::Relaxed),
            noop_commands: COMMAND_COUNTERS.none.load(Ordering::Relaxed),
            protocol_errors: PROTOCOL_ERRORS.load(Ordering::Relaxed),
            stop_recoveries: STOP_RECOVERIES.load(Ordering::Relaxed),
            status_reports: STATUS_REPORTS.load(Ordering::Relaxed),
            superstatus_reports: SUPERSTATUS_REPORTS.load(Ordering::Relaxed),
        }
    }
}

/// Lightweight snapshot of process-wide engine counters.
#[derive(Default, Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub bytes_processed: u64,
    pub bytes_ignored: u64,
    pub parameters: u64,
    pub motion_commands: u64,
    pub reference_commands: u64,
    pub offset_commands: u64,
    pub assist_commands: u64,
    pub noop_commands: u64,
    pub protocol_errors: u64,
    pub stop_recoveries: u64,
    pub status_reports: u64,
    pub superstatus_reports: u64,
}

impl MetricsSnapshot {
    /// Total commands dispatched.
    #[must_use]
    pub fn commands(&self) -> u64 {
        self.motion_commands
            + self.reference_commands
            + self.offset_commands
            + self.assist_commands
            + self.noop_commands
    }

    /// Share of processed bytes that were protocol errors, if any bytes were seen.
    #[must_use]
    pub fn error_rate(&self) -> Option<f64> {
        if self.bytes_processed == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.protocol_errors as f64 / self.bytes_processed as f64;
        Some(rate)
    }
}
