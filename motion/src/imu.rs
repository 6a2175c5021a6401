//! [`MotionSensor`] backed by a BMI160 on I2C.

use arbitrary_int::{u2, u4, u6};
use bmi160::types::{AccelConfig, Address, IntPin, IntPinConfig, LatchDuration, OrientIntConfig};
use bmi160::Bmi160;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::{IntChannel, InterruptConfig};
use crate::orientation::AccelSample;
use crate::sensor::MotionSensor;

pub struct Bmi160Sensor<D> {
    address: Address,
    delay: D,
    accel: AccelConfig,
}

impl<D: DelayNs> Bmi160Sensor<D> {
    pub fn new(address: Address, delay: D) -> Self {
        Self {
            address,
            delay,
            accel: AccelConfig::default(),
        }
    }

    pub fn with_accel_config(mut self, accel: AccelConfig) -> Self {
        self.accel = accel;
        self
    }
}

/// Register level settings for the orientation interrupt.
///
/// Out of range fields are truncated to their register width, [`InterruptConfig::validate`]
/// rejects them up front.
pub fn orient_config(config: &InterruptConfig) -> OrientIntConfig {
    OrientIntConfig {
        pin: match config.channel {
            IntChannel::Int1 => IntPin::Int1,
            IntChannel::Int2 => IntPin::Int2,
        },
        pin_config: IntPinConfig {
            output_enable: config.output_enable,
            open_drain: !config.push_pull,
            active_high: config.active_high,
            edge_triggered: config.edge_triggered,
            input_enable: config.input_enable,
            latch: LatchDuration::from_micros(config.latch_us),
        },
        mode: u2::new(config.mode & 0b11),
        blocking: u2::new(config.blocking & 0b11),
        hysteresis: u4::new(config.hysteresis & 0x0F),
        theta: u6::new(config.theta & 0x3F),
        up_down_enable: config.up_down,
        axes_exchange: config.axes_exchange,
    }
}

impl<B: I2c, D: DelayNs> MotionSensor<B> for Bmi160Sensor<D> {
    type Error = bmi160::Error<B::Error>;

    async fn initialize(&mut self, bus: &mut B) -> Result<(), Self::Error> {
        let mut imu = Bmi160::new_i2c(bus, &mut self.delay, self.address);
        imu.init(self.accel).await
    }

    async fn configure_interrupt(
        &mut self,
        bus: &mut B,
        config: &InterruptConfig,
    ) -> Result<(), Self::Error> {
        let mut imu = Bmi160::new_i2c(bus, &mut self.delay, self.address);
        imu.configure_orientation_interrupt(&orient_config(config))
            .await
    }

    async fn read(&mut self, bus: &mut B) -> Result<AccelSample, Self::Error> {
        let mut imu = Bmi160::new_i2c(bus, &mut self.delay, self.address);
        let data = imu.read_accel().await?;
        Ok(AccelSample::new(data.x, data.y, data.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::{classify, Orientation};
    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorKind, ErrorType, Operation};

    /// Just enough of a BMI160 register file to get through bring-up.
    struct FakeBus {
        regs: [u8; 128],
        nak: bool,
    }

    impl FakeBus {
        fn new() -> Self {
            let mut regs = [0; 128];
            regs[0x00] = bmi160::CHIP_ID;
            Self { regs, nak: false }
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        async fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.nak {
                return Err(ErrorKind::Other);
            }
            let mut pointer = None;
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        for &b in bytes.iter() {
                            pointer = match pointer {
                                None => Some(b),
                                // Accelerometer normal mode command
                                Some(0x7E) if b == 0x11 => {
                                    self.regs[0x03] = 0b01 << 4;
                                    Some(0x7F)
                                }
                                Some(0x7E) => Some(0x7F),
                                Some(p) => {
                                    self.regs[p as usize] = b;
                                    Some(p + 1)
                                }
                            };
                        }
                    }
                    Operation::Read(buf) => {
                        let start = pointer.unwrap_or(0) as usize;
                        buf.copy_from_slice(&self.regs[start..][..buf.len()]);
                    }
                }
            }
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn test_default_interrupt_registers() {
        let orient = orient_config(&InterruptConfig::DEFAULT);
        assert_eq!(orient.pin, IntPin::Int1);
        assert_eq!(orient.pin_config.latch, LatchDuration::Ms5);
        assert!(!orient.pin_config.open_drain);
        assert!(orient.pin_config.active_high);
        assert!(orient.pin_config.edge_triggered);
        assert!(!orient.pin_config.input_enable);
        assert_eq!(orient.hysteresis.value(), 2);
        assert_eq!(orient.mode.value(), 0);
        assert_eq!(orient.theta.value(), 0);
        assert!(orient.up_down_enable);
        assert!(orient.axes_exchange);
    }

    #[test]
    fn test_channel_two_open_drain() {
        let config = InterruptConfig {
            push_pull: false,
            ..InterruptConfig::DEFAULT.on_channel(IntChannel::Int2)
        };
        let orient = orient_config(&config);
        assert_eq!(orient.pin, IntPin::Int2);
        assert!(orient.pin_config.open_drain);
    }

    #[test]
    fn test_bring_up_and_sample() {
        let mut bus = FakeBus::new();
        let mut sensor = Bmi160Sensor::new(Address::Primary, NoDelay);
        block_on(async {
            sensor.initialize(&mut bus).await.unwrap();
            sensor
                .configure_interrupt(&mut bus, &InterruptConfig::DEFAULT)
                .await
                .unwrap();
        });
        assert_eq!(bus.regs[0x53] & 0x0F, 0b1011);
        assert_eq!(bus.regs[0x66], 0xC0);

        // Lying flat, display down
        bus.regs[0x12..0x18].copy_from_slice(&[0x20, 0x00, 0xE0, 0xFF, 0x00, 0xC0]);
        let sample = block_on(sensor.read(&mut bus)).unwrap();
        assert_eq!(sample, AccelSample::new(32, -32, -16384));
        assert_eq!(classify(sample), Orientation::FaceDown);
    }

    #[test]
    fn test_bus_error_is_reported() {
        let mut bus = FakeBus::new();
        bus.nak = true;
        let mut sensor = Bmi160Sensor::new(Address::Primary, NoDelay);
        let result = block_on(sensor.read(&mut bus));
        assert!(matches!(
            result,
            Err(bmi160::Error::InterfaceError(ErrorKind::Other))
        ));
    }
}
