use embedded_hal_async::i2c::{I2c, Operation};

use crate::types::Address;
use crate::Interface;

/// BMI160 low level I2C driver
pub struct Bmi160I2c<B> {
    i2c: B,
    address: u8,
}

impl<B> Bmi160I2c<B> {
    pub fn new(i2c: B, address: Address) -> Self {
        Self {
            i2c,
            address: address as u8,
        }
    }

    pub fn release(self) -> B {
        self.i2c
    }
}

impl<B: I2c> Interface for Bmi160I2c<B> {
    type Error = B::Error;

    async fn write(&mut self, register: u8, data: &[u8]) -> Result<(), B::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Bmi160I2c::write(reg: {=u8:#x}, data: {=[u8]})", register, data);
        // Adjacent writes go out back to back without a repeated start
        self.i2c
            .transaction(
                self.address,
                &mut [Operation::Write(&[register]), Operation::Write(data)],
            )
            .await
    }

    async fn read(&mut self, register: u8, data: &mut [u8]) -> Result<(), B::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Bmi160I2c::read(reg: {=u8:#x}, len: {=usize})", register, data.len());
        if data.is_empty() {
            return Ok(());
        }
        self.i2c.write_read(self.address, &[register], data).await?;
        #[cfg(feature = "defmt")]
        defmt::trace!("read result: {=[u8]}", data);
        Ok(())
    }
}
