#![cfg_attr(not(test), no_std)]

use arbitrary_int::{u3, u4};
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

pub mod i2c;
pub mod types;

use i2c::Bmi160I2c;
use types::{
    AccConf, AccelConfig, AccelData, Address, IntEn0, IntLatch, IntMapFeatures, IntOrient0,
    IntOrient1, IntOutCtrl, IntPin, IntStatus0, IntStatus3, OrientIntConfig, OrientStatus,
    PmuStatus,
};

pub const CHIP_ID: u8 = 0xD1;

mod regs {
    pub const CHIP_ID: u8 = 0x00;
    pub const ERR_REG: u8 = 0x02;
    pub const PMU_STATUS: u8 = 0x03;

    // 6 bytes, x/y/z little endian
    pub const DATA_ACC_X_LSB: u8 = 0x12;

    // INT_STATUS_0..3
    pub const INT_STATUS_0: u8 = 0x1C;

    pub const ACC_CONF: u8 = 0x40;
    pub const ACC_RANGE: u8 = 0x41;

    pub const INT_EN_0: u8 = 0x50;
    pub const INT_OUT_CTRL: u8 = 0x53;
    pub const INT_LATCH: u8 = 0x54;
    pub const INT_MAP_0: u8 = 0x55;
    pub const INT_MAP_2: u8 = 0x57;
    pub const INT_ORIENT_0: u8 = 0x65;
    pub const INT_ORIENT_1: u8 = 0x66;

    pub const CMD: u8 = 0x7E;
}

mod cmd {
    pub const ACC_NORMAL_MODE: u8 = 0x11;
    pub const SOFT_RESET: u8 = 0xB6;
}

const PMU_NORMAL: u8 = 0b01;

/// BMI160 driver
pub struct Bmi160<I, D> {
    bus: I,
    timer: D,
}

impl<B: I2c, D: DelayNs> Bmi160<Bmi160I2c<B>, D> {
    /// Creates a new BMI160 driver using I2C without touching the device.
    pub fn new_i2c(i2c: B, timer: D, address: Address) -> Self {
        Self {
            bus: Bmi160I2c::new(i2c, address),
            timer,
        }
    }

    /// Creates a new BMI160 driver using I2C and performs initialization.
    pub async fn init_i2c(
        i2c: B,
        timer: D,
        address: Address,
        accel: AccelConfig,
    ) -> Result<Self, Error<B::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Bmi160I2c::new");
        let mut imu = Self::new_i2c(i2c, timer, address);
        imu.init(accel).await?;
        Ok(imu)
    }
}

impl<I: Interface, D: DelayNs> Bmi160<I, D> {
    /// Wrapper to convert errors.
    async fn read(&mut self, register: u8, data: &mut [u8]) -> Result<(), Error<I::Error>> {
        self.bus
            .read(register, data)
            .await
            .map_err(Error::InterfaceError)
    }

    /// Wrapper to convert errors.
    async fn write(&mut self, register: u8, data: &[u8]) -> Result<(), Error<I::Error>> {
        self.bus
            .write(register, data)
            .await
            .map_err(Error::InterfaceError)
    }

    /// Wrapper to convert errors.
    async fn read_byte(&mut self, register: u8) -> Result<u8, Error<I::Error>> {
        self.bus
            .read_byte(register)
            .await
            .map_err(Error::InterfaceError)
    }

    /// Soft reset, chip id check and accelerometer power up.
    pub async fn init(&mut self, accel: AccelConfig) -> Result<(), Error<I::Error>> {
        self.write(regs::CMD, &[cmd::SOFT_RESET]).await?;
        self.timer.delay_ms(1).await;

        let mut chip_id = self.read_byte(regs::CHIP_ID).await?;
        if chip_id != CHIP_ID {
            #[cfg(feature = "defmt")]
            defmt::info!("Chip ID check failed, got 0x{=u8:X}, retrying", chip_id);
            self.timer.delay_ms(10).await;
            chip_id = self.read_byte(regs::CHIP_ID).await?;
            if chip_id != CHIP_ID {
                #[cfg(feature = "defmt")]
                defmt::error!("Chip ID check failed, got 0x{=u8:X}", chip_id);
                return Err(Error::FailedChipIdCheck(chip_id));
            }
        }

        self.set_accel_config(accel).await?;

        self.write(regs::CMD, &[cmd::ACC_NORMAL_MODE]).await?;
        // Accelerometer start-up time is 3.8 ms max
        self.timer.delay_ms(5).await;
        let pmu = PmuStatus::new_with_raw_value(self.read_byte(regs::PMU_STATUS).await?);
        if pmu.acc().value() != PMU_NORMAL {
            let err = self.read_byte(regs::ERR_REG).await?;
            #[cfg(feature = "defmt")]
            defmt::error!(
                "Accelerometer did not reach normal mode, PMU_STATUS=0x{=u8:X} ERR_REG=0x{=u8:X}",
                pmu.raw_value(),
                err
            );
            return Err(Error::FailedPowerUp(err));
        }

        #[cfg(feature = "defmt")]
        defmt::info!("BMI160 initialized, chip id 0x{=u8:X}", chip_id);
        Ok(())
    }

    pub async fn chip_id(&mut self) -> Result<u8, Error<I::Error>> {
        self.read_byte(regs::CHIP_ID).await
    }

    pub async fn set_accel_config(&mut self, accel: AccelConfig) -> Result<(), Error<I::Error>> {
        let conf = AccConf::DEFAULT
            .with_odr(u4::new(accel.odr as u8))
            .with_bwp(u3::new(accel.bandwidth as u8));
        self.write(regs::ACC_CONF, &[conf.raw_value()]).await?;
        self.write(regs::ACC_RANGE, &[accel.range as u8]).await?;
        Ok(())
    }

    /// Enable the orientation interrupt and route it to the configured pin.
    ///
    /// The other pin's electrical settings and routing are left untouched.
    pub async fn configure_orientation_interrupt(
        &mut self,
        config: &OrientIntConfig,
    ) -> Result<(), Error<I::Error>> {
        let pin = config.pin_config;

        let en = IntEn0::new_with_raw_value(self.read_byte(regs::INT_EN_0).await?);
        self.write(regs::INT_EN_0, &[en.with_orient(true).raw_value()])
            .await?;

        let out = IntOutCtrl::new_with_raw_value(self.read_byte(regs::INT_OUT_CTRL).await?);
        let out = match config.pin {
            IntPin::Int1 => out
                .with_int1_edge_ctrl(pin.edge_triggered)
                .with_int1_lvl(pin.active_high)
                .with_int1_od(pin.open_drain)
                .with_int1_output_en(pin.output_enable),
            IntPin::Int2 => out
                .with_int2_edge_ctrl(pin.edge_triggered)
                .with_int2_lvl(pin.active_high)
                .with_int2_od(pin.open_drain)
                .with_int2_output_en(pin.output_enable),
        };
        self.write(regs::INT_OUT_CTRL, &[out.raw_value()]).await?;

        let latch = IntLatch::new_with_raw_value(self.read_byte(regs::INT_LATCH).await?)
            .with_latch(u4::new(pin.latch as u8));
        let latch = match config.pin {
            IntPin::Int1 => latch.with_int1_input_en(pin.input_enable),
            IntPin::Int2 => latch.with_int2_input_en(pin.input_enable),
        };
        self.write(regs::INT_LATCH, &[latch.raw_value()]).await?;

        let map_reg = match config.pin {
            IntPin::Int1 => regs::INT_MAP_0,
            IntPin::Int2 => regs::INT_MAP_2,
        };
        let map = IntMapFeatures::new_with_raw_value(self.read_byte(map_reg).await?);
        self.write(map_reg, &[map.with_orient(true).raw_value()])
            .await?;

        let orient0 = IntOrient0::DEFAULT
            .with_mode(config.mode)
            .with_blocking(config.blocking)
            .with_hysteresis(config.hysteresis);
        let orient1 = IntOrient1::DEFAULT
            .with_theta(config.theta)
            .with_up_down_enable(config.up_down_enable)
            .with_axes_exchange(config.axes_exchange);
        self.write(
            regs::INT_ORIENT_0,
            &[orient0.raw_value(), orient1.raw_value()],
        )
        .await?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Orientation interrupt on {} (INT_ORIENT 0x{=u8:X} 0x{=u8:X})",
            config.pin,
            orient0.raw_value(),
            orient1.raw_value()
        );
        Ok(())
    }

    /// Read the x, y, z components of acceleration.
    pub async fn read_accel(&mut self) -> Result<AccelData, Error<I::Error>> {
        let mut raw = [0; 6];
        self.read(regs::DATA_ACC_X_LSB, &mut raw).await?;
        Ok(AccelData::from_le_bytes(raw))
    }

    /// Orientation interrupt flag and the orientation the sensor itself detected.
    pub async fn orientation_status(&mut self) -> Result<OrientStatus, Error<I::Error>> {
        let mut raw = [0; 4];
        self.read(regs::INT_STATUS_0, &mut raw).await?;
        let status0 = IntStatus0::new_with_raw_value(raw[0]);
        let status3 = IntStatus3::new_with_raw_value(raw[3]);
        Ok(OrientStatus {
            triggered: status0.orient(),
            xy: status3.orient_xy().into(),
            z_down: status3.orient_z(),
        })
    }

    pub fn release(self) -> (I, D) {
        (self.bus, self.timer)
    }
}

#[allow(async_fn_in_trait)]
pub trait Interface {
    type Error;
    async fn write(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error>;
    async fn read(&mut self, register: u8, data: &mut [u8]) -> Result<(), Self::Error>;

    async fn read_byte(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut value = [0];
        self.read(register, &mut value).await?;
        Ok(value[0])
    }
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Wrong value in CHIP_ID
    FailedChipIdCheck(u8),
    /// Accelerometer stayed out of normal mode, carries ERR_REG
    FailedPowerUp(u8),
    InterfaceError(E),
}

impl<E> From<E> for Error<E> {
    fn from(t: E) -> Self {
        Error::InterfaceError(t)
    }
}
