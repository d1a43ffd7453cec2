//! Debugger console output for on-target runs.
//!
//! Both the log records and the samples go through `hprintln!`, which halts
//! the core for every line; expect far lower throughput than a UART sink.

use crate::sample::AccelerationSample;
use crate::stream::SampleSink;
use cortex_m_semihosting::hprintln;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct HostLogger;

static LOGGER: HostLogger = HostLogger;

impl Log for HostLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      hprintln!("{} {}", record.level(), record.args()).ok();
    }
  }

  fn flush(&self) {}
}

/// Installs [`HostLogger`] as the global logger.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER)?;
  log::set_max_level(level);
  Ok(())
}

/// Emits `x y z` lines on the debugger console.
pub struct HostSink;

impl SampleSink for HostSink {
  type Error = ();

  fn emit(&mut self, sample: &AccelerationSample) -> Result<(), ()> {
    hprintln!("{}", sample)
  }
}
