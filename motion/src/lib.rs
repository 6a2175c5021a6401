//! Orientation sensing for the water feature controller.
//!
//! An accelerometer raises an interrupt whenever the board changes orientation. The
//! [`InterruptBridge`] turns that edge into a [`WakeSignal`] post, the [`Sampler`] wakes up,
//! takes the shared bus through the [`BusArbiter`], reads one sample and reports the
//! [`Orientation`] it classifies to an [`OrientationSink`].
#![cfg_attr(not(test), no_std)]

pub mod bridge;
pub mod bus;
pub mod config;
pub mod error;
pub mod imu;
pub mod orientation;
pub mod sampler;
pub mod sensor;
pub mod wake;

pub use bridge::InterruptBridge;
pub use bus::{BusArbiter, BusToken};
pub use config::{
    ConfigError, Edge, HeaderPin, IntChannel, Interface, InterruptConfig, MotionConfig,
    ReadFailurePolicy, SamplerConfig,
};
pub use error::{ErrorKind, MotionError};
pub use imu::Bmi160Sensor;
pub use orientation::{classify, AccelSample, Orientation};
pub use sampler::{OrientationSink, Sampler, SamplerState};
pub use sensor::MotionSensor;
pub use wake::WakeSignal;
