//! Poll-and-emit loop.
//!
//! Samples are read back to back with no pacing. A failed read is logged and
//! counted, and polling carries on; only the sink can end the stream early.

use crate::bus::RegisterBus;
use crate::i2c::Mpu9225;
use crate::sample::AccelerationSample;
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use log::{info, warn};

/// Destination for streamed samples.
pub trait SampleSink {
  type Error: fmt::Debug;

  fn emit(&mut self, sample: &AccelerationSample) -> Result<(), Self::Error>;
}

/// Writes one `x y z` line per sample to any `core::fmt::Write`.
pub struct FmtSink<W> {
  out: W,
}

impl<W: fmt::Write> FmtSink<W> {
  pub fn new(out: W) -> Self {
    FmtSink { out }
  }

  pub fn into_inner(self) -> W {
    self.out
  }
}

impl<W: fmt::Write> SampleSink for FmtSink<W> {
  type Error = fmt::Error;

  fn emit(&mut self, sample: &AccelerationSample) -> Result<(), fmt::Error> {
    writeln!(self.out, "{}", sample)
  }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
  pub samples: u64,
  pub errors: u64,
}

/// Reads one sample and hands it to the sink. Read failures are logged and
/// counted in `stats`; a sink failure is returned.
pub fn poll_once<B, Delay, S>(
  sensor: &mut Mpu9225<B, Delay>,
  sink: &mut S,
  stats: &mut StreamStats,
) -> Result<(), S::Error>
where
  B: RegisterBus,
  Delay: DelayMs<u32> + DelayUs<u32>,
  S: SampleSink,
{
  match sensor.read_acceleration() {
    Ok(sample) => {
      sink.emit(&sample)?;
      stats.samples += 1;
    }
    Err(e) => {
      stats.errors += 1;
      warn!("MPU9225: Sample dropped: {}", e);
    }
  }
  Ok(())
}

/// Polls until `stop` is raised.
pub fn stream<B, Delay, S>(
  sensor: &mut Mpu9225<B, Delay>,
  sink: &mut S,
  stop: &AtomicBool,
) -> Result<StreamStats, S::Error>
where
  B: RegisterBus,
  Delay: DelayMs<u32> + DelayUs<u32>,
  S: SampleSink,
{
  let mut stats = StreamStats::default();
  info!("MPU9225: Streaming");
  while !stop.load(Ordering::Relaxed) {
    poll_once(sensor, sink, &mut stats)?;
  }
  info!(
    "MPU9225: Stopped after {} samples, {} errors",
    stats.samples, stats.errors
  );
  Ok(stats)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bus::scripted::{RecordingDelay, ScriptedBus};
  use crate::config::{Mpu9225Config, RetryPolicy};
  use std::string::String;
  use std::vec::Vec;

  const DATA: [u8; 6] = [0x04, 0x00, 0xFF, 0xFC, 0x00, 0x01];

  fn sensor(bus: ScriptedBus) -> Mpu9225<ScriptedBus, RecordingDelay> {
    let config = Mpu9225Config {
      retry: RetryPolicy::once(),
      ..Mpu9225Config::default()
    };
    Mpu9225::uninitialized(bus, RecordingDelay::default(), config)
  }

  /// Collects samples and raises the stop flag once `limit` have arrived.
  struct Collect<'a> {
    samples: Vec<AccelerationSample>,
    limit: usize,
    stop: &'a AtomicBool,
  }

  impl<'a> SampleSink for Collect<'a> {
    type Error = ();

    fn emit(&mut self, sample: &AccelerationSample) -> Result<(), ()> {
      self.samples.push(*sample);
      if self.samples.len() >= self.limit {
        self.stop.store(true, Ordering::Relaxed);
      }
      Ok(())
    }
  }

  struct Broken;

  impl SampleSink for Broken {
    type Error = &'static str;

    fn emit(&mut self, _: &AccelerationSample) -> Result<(), &'static str> {
      Err("closed")
    }
  }

  #[test]
  fn streams_until_stopped() {
    let bus = ScriptedBus::new()
      .read(0x3B, 6, &DATA)
      .read(0x3B, 6, &DATA)
      .read(0x3B, 6, &DATA);
    let mut sensor = sensor(bus);
    let stop = AtomicBool::new(false);
    let mut sink = Collect {
      samples: Vec::new(),
      limit: 3,
      stop: &stop,
    };
    let stats = stream(&mut sensor, &mut sink, &stop).unwrap();
    assert_eq!(
      stats,
      StreamStats {
        samples: 3,
        errors: 0
      }
    );
    let expected = AccelerationSample {
      x: 1024,
      y: -4,
      z: 1,
    };
    assert_eq!(sink.samples, vec![expected; 3]);
    sensor.release().0.done();
  }

  #[test]
  fn raised_stop_reads_nothing() {
    let mut sensor = sensor(ScriptedBus::new());
    let stop = AtomicBool::new(true);
    let mut sink = FmtSink::new(String::new());
    let stats = stream(&mut sensor, &mut sink, &stop).unwrap();
    assert_eq!(stats, StreamStats::default());
    assert!(sink.into_inner().is_empty());
  }

  #[test]
  fn transient_nack_is_counted_and_skipped() {
    let bus = ScriptedBus::new().read_nack(0x3B, 6).read(0x3B, 6, &DATA);
    let mut sensor = sensor(bus);
    let stop = AtomicBool::new(false);
    let mut sink = Collect {
      samples: Vec::new(),
      limit: 1,
      stop: &stop,
    };
    let stats = stream(&mut sensor, &mut sink, &stop).unwrap();
    assert_eq!(
      stats,
      StreamStats {
        samples: 1,
        errors: 1
      }
    );
    assert_eq!(sink.samples.len(), 1);
    assert_eq!(sink.samples[0].x, 1024);
    sensor.release().0.done();
  }

  #[test]
  fn short_read_emits_nothing() {
    let bus = ScriptedBus::new().read(0x3B, 6, &DATA[..4]);
    let mut sensor = sensor(bus);
    let mut sink = FmtSink::new(String::new());
    let mut stats = StreamStats::default();
    poll_once(&mut sensor, &mut sink, &mut stats).unwrap();
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.samples, 0);
    assert_eq!(sink.into_inner(), "");
  }

  #[test]
  fn fmt_sink_writes_lines() {
    let bus = ScriptedBus::new()
      .read(0x3B, 6, &DATA)
      .read(0x3B, 6, &[0x7F, 0xFF, 0x80, 0x00, 0x00, 0x00]);
    let mut sensor = sensor(bus);
    let mut sink = FmtSink::new(String::new());
    let mut stats = StreamStats::default();
    poll_once(&mut sensor, &mut sink, &mut stats).unwrap();
    poll_once(&mut sensor, &mut sink, &mut stats).unwrap();
    assert_eq!(sink.into_inner(), "1024 -4 1\n32767 -32768 0\n");
  }

  #[test]
  fn sink_failure_ends_stream() {
    let bus = ScriptedBus::new().read(0x3B, 6, &DATA);
    let mut sensor = sensor(bus);
    let stop = AtomicBool::new(false);
    assert_eq!(stream(&mut sensor, &mut Broken, &stop), Err("closed"));
    sensor.release().0.done();
  }
}
