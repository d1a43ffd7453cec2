//! Streams accelerometer samples from an MPU9225 on a Linux i2c-dev bus to
//! stdout, one `t x y z` line per sample, until interrupted.

use std::io::{self, LineWriter, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use linux_embedded_hal::{Delay, I2cdev};
use log::{error, info};
use mpu9225::{
  stream, AccelerationSample, Address, FullScale, I2cBus, Mpu9225, Mpu9225Config, SampleSink,
};

#[derive(Parser, Debug)]
#[command(about = "Stream MPU9225 accelerometer samples as fast as the bus allows")]
struct Args {
  /// I2C bus device node
  #[arg(short, long, default_value = "/dev/i2c-1")]
  device: String,

  /// Device address, 0x68 (AD0 low) or 0x69 (AD0 high)
  #[arg(short, long, default_value = "0x68", value_parser = parse_address)]
  address: Address,

  /// Full-scale range in g: 2, 4, 8 or 16
  #[arg(short, long, default_value = "2", value_parser = parse_full_scale)]
  full_scale: FullScale,

  /// Keep probing for the device this many seconds before giving up
  #[arg(short, long, default_value_t = 0)]
  wait_secs: u32,

  /// Print acceleration in g instead of raw counts
  #[arg(short, long)]
  scaled: bool,
}

fn parse_address(s: &str) -> Result<Address, String> {
  let digits = s.trim_start_matches("0x").trim_start_matches("0X");
  let addr = u8::from_str_radix(digits, 16).map_err(|e| format!("{}: {}", s, e))?;
  Address::from_addr(addr).ok_or_else(|| format!("{:#04x} is not an MPU9225 address", addr))
}

fn parse_full_scale(s: &str) -> Result<FullScale, String> {
  let g: u8 = s.parse().map_err(|e| format!("{}: {}", s, e))?;
  FullScale::from_g(g).ok_or_else(|| format!("unsupported full-scale range {}g", g))
}

/// Stdout lines prefixed with microseconds since the stream started.
struct StdoutSink {
  out: LineWriter<Stdout>,
  start: Instant,
  scale: Option<FullScale>,
}

impl SampleSink for StdoutSink {
  type Error = io::Error;

  fn emit(&mut self, sample: &AccelerationSample) -> Result<(), io::Error> {
    let t = self.start.elapsed().as_micros();
    match self.scale {
      Some(full_scale) => writeln!(self.out, "{} {}", t, sample.to_g(full_scale)),
      None => writeln!(self.out, "{} {}", t, sample),
    }
  }
}

fn run(args: &Args) -> Result<(), String> {
  let stop = Arc::new(AtomicBool::new(false));
  let stop2 = stop.clone();
  ctrlc::set_handler(move || {
    info!("Got control-c");
    stop2.store(true, Ordering::Relaxed);
  })
  .map_err(|e| format!("Failed to install signal handler: {}", e))?;

  let i2c =
    I2cdev::new(&args.device).map_err(|e| format!("Failed to open {}: {}", args.device, e))?;
  let config = Mpu9225Config {
    address: args.address,
    full_scale: args.full_scale,
    ..Mpu9225Config::default()
  };
  info!(
    "Opened {}, device at {:#04x}",
    args.device,
    config.address.addr()
  );

  let mut sensor = Mpu9225::uninitialized(I2cBus::new(i2c, config.address), Delay, config);
  let ready = sensor
    .wait_until_ready(args.wait_secs.saturating_add(1), &stop)
    .map_err(|e| format!("MPU9225 not found: {}", e))?;
  if ready.is_none() || stop.load(Ordering::Relaxed) {
    info!("Interrupted before streaming");
    return Ok(());
  }
  sensor
    .configure()
    .map_err(|e| format!("MPU9225 initialization failed: {}", e))?;

  let mut sink = StdoutSink {
    out: LineWriter::new(io::stdout()),
    start: Instant::now(),
    scale: if args.scaled {
      Some(config.full_scale)
    } else {
      None
    },
  };
  let stats = stream(&mut sensor, &mut sink, &stop)
    .map_err(|e| format!("Output closed: {}", e))?;
  info!(
    "Streamed {} samples, {} read errors",
    stats.samples, stats.errors
  );
  sink.out.flush().map_err(|e| e.to_string())?;
  Ok(())
}

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
  let args = Args::parse();
  if let Err(message) = run(&args) {
    error!("{}", message);
    std::process::exit(1);
  }
}
