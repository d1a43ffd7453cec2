//! # InvenSense MPU9225 Accelerometer Library
//!
//! Reads the accelerometer of an MPU9225 (MPU9250 family) breakout over I2C
//! and streams raw samples as fast as the bus allows. The gyroscope and the
//! AK8963 magnetometer are left untouched.
//! This crate utilizes the embedded_hal constructs to provide a device
//! neutral implementation.
//!
//! See the register map for this sensor family [Register Map](https://invensense.tdk.com/wp-content/uploads/2015/02/RM-MPU-9250A-00-v1.6.pdf)
//!

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod config;
pub mod error;
pub mod i2c;
pub mod sample;
#[cfg(feature = "semihosting")]
pub mod semihosting;
pub mod stream;

pub use bus::{I2cBus, RegisterBus};
pub use config::{Address, ClockSource, FullScale, Mpu9225Config, RetryPolicy};
pub use error::Error;
pub use i2c::Mpu9225;
pub use sample::{AccelerationG, AccelerationSample};
pub use stream::{poll_once, stream, FmtSink, SampleSink, StreamStats};
