//! Configuration settings for the MPU9225

// Mask definitions
const PWR_MGMT_1_CLKSEL_MASK: u8 = 0x07;
const PWR_MGMT_1_SLEEP_MASK: u8 = 0x40;
const ACCEL_FS_SEL_MASK: u8 = 0x18;
const ACCEL_FS_SEL_SHIFT: u8 = 3;

/// 7-bit bus address, selected by the AD0 pin strapping
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Address {
  /// AD0 tied low
  Primary = 0x68,
  /// AD0 tied high
  Secondary = 0x69,
}

impl Address {
  pub fn addr(&self) -> u8 {
    *self as u8
  }

  pub fn from_addr(addr: u8) -> Option<Address> {
    match addr {
      0x68 => Some(Address::Primary),
      0x69 => Some(Address::Secondary),
      _ => None,
    }
  }
}

/// Accelerometer full-scale range (ACCEL_CONFIG FS_SEL)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FullScale {
  Range2G = 0x00,
  Range4G = 0x01,
  Range8G = 0x02,
  Range16G = 0x03,
}

impl FullScale {
  pub fn from_g(g: u8) -> Option<FullScale> {
    match g {
      2 => Some(FullScale::Range2G),
      4 => Some(FullScale::Range4G),
      8 => Some(FullScale::Range8G),
      16 => Some(FullScale::Range16G),
      _ => None,
    }
  }

  /// Upper bound of the range in g
  pub fn g(&self) -> u8 {
    2 << (*self as u8)
  }

  /// Counts per g
  pub fn sensitivity(&self) -> f32 {
    match self {
      FullScale::Range2G => 16384.0,
      FullScale::Range4G => 8192.0,
      FullScale::Range8G => 4096.0,
      FullScale::Range16G => 2048.0,
    }
  }

  fn bits(&self) -> u8 {
    (*self as u8) << ACCEL_FS_SEL_SHIFT
  }
}

/// PWR_MGMT_1 CLKSEL
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockSource {
  Internal20MHz = 0x00,
  /// Gyro PLL when ready, internal oscillator otherwise
  AutoSelect = 0x01,
  Stopped = 0x07,
}

/// How often a configuration write is attempted before giving up.
/// Attempt `n` (0-based) is followed by a `base_delay_us << n` pause.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_attempts: u8,
  pub base_delay_us: u32,
}

impl RetryPolicy {
  pub fn once() -> RetryPolicy {
    RetryPolicy {
      max_attempts: 1,
      base_delay_us: 0,
    }
  }

  /// Saturates at `u32::MAX` once the doubling no longer fits.
  pub fn backoff_us(&self, attempt: u8) -> u32 {
    let pause = (self.base_delay_us as u64) << core::cmp::min(attempt, 32);
    if pause > u32::MAX as u64 {
      u32::MAX
    } else {
      pause as u32
    }
  }
}

impl Default for RetryPolicy {
  fn default() -> Self {
    RetryPolicy {
      max_attempts: 10,
      base_delay_us: 500,
    }
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mpu9225Config {
  pub address: Address,
  pub full_scale: FullScale,
  pub clock_source: ClockSource,
  pub retry: RetryPolicy,
}

impl Default for Mpu9225Config {
  fn default() -> Self {
    Mpu9225Config {
      address: Address::Primary,
      full_scale: FullScale::Range2G,
      clock_source: ClockSource::AutoSelect,
      retry: RetryPolicy::default(),
    }
  }
}

impl Mpu9225Config {
  pub fn apply_clock_source(&self, pwr_mgmt_1: u8) -> u8 {
    let clksel = self.clock_source as u8;
    (pwr_mgmt_1 & !PWR_MGMT_1_CLKSEL_MASK) | (clksel & PWR_MGMT_1_CLKSEL_MASK)
  }

  pub fn apply_full_scale(&self, accel_config: u8) -> u8 {
    (accel_config & !ACCEL_FS_SEL_MASK) | (self.full_scale.bits() & ACCEL_FS_SEL_MASK)
  }

  /// Clears SLEEP, leaving every other bit alone
  pub fn apply_wake(&self, pwr_mgmt_1: u8) -> u8 {
    pwr_mgmt_1 & !PWR_MGMT_1_SLEEP_MASK
  }
}
