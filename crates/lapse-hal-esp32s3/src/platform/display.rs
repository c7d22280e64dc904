use embedded_hal::i2c::I2c;
use log::{info, warn};
use ssd1306::{Config, Error as DriverError, FrameBuffer, Ssd1306, protocol};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DisplayError<I2cErr> {
    /// Neither panel address acknowledged.
    NotDetected,
    Driver(DriverError<I2cErr>),
}

impl<I2cErr> From<DriverError<I2cErr>> for DisplayError<I2cErr> {
    fn from(err: DriverError<I2cErr>) -> Self {
        Self::Driver(err)
    }
}

pub type OledResult<I2cErr> = Result<(), DisplayError<I2cErr>>;

/// Board-level adapter for the 128x64 SSD1306 panel with its frame memory.
#[derive(Debug)]
pub struct OledDisplay<I2C> {
    driver: Ssd1306<I2C>,
    frame: FrameBuffer,
}

impl<I2C> OledDisplay<I2C>
where
    I2C: I2c,
{
    /// Finds the panel at 0x3C or 0x3D, runs its init sequence, and blanks it.
    ///
    /// The bus is handed back on failure so the caller can keep using it.
    pub fn probe(i2c: I2C, contrast: u8) -> Result<Self, (I2C, DisplayError<I2C::Error>)> {
        let mut i2c = i2c;

        for address in [protocol::ADDRESS_PRIMARY, protocol::ADDRESS_SECONDARY] {
            let config = Config {
                address,
                contrast,
                ..Config::default()
            };
            let mut driver = Ssd1306::new(i2c, config);
            if driver.probe().is_err() {
                warn!("oled: no ack at {address:#04x}");
                i2c = driver.release();
                continue;
            }

            info!("oled: panel at {address:#04x}");
            let mut display = Self {
                driver,
                frame: FrameBuffer::new(),
            };
            return match display.initialize() {
                Ok(()) => Ok(display),
                Err(err) => Err((display.release(), err)),
            };
        }

        Err((i2c, DisplayError::NotDetected))
    }

    fn initialize(&mut self) -> OledResult<I2C::Error> {
        self.driver.init()?;
        self.frame.clear(false);
        self.present()
    }

    pub fn address(&self) -> u8 {
        self.driver.config().address
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Frame memory to draw into; call [`Self::present`] to show it.
    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    /// Pushes the whole frame to the panel.
    pub fn present(&mut self) -> OledResult<I2C::Error> {
        self.driver.flush(self.frame.bytes())?;
        Ok(())
    }

    pub fn set_contrast(&mut self, contrast: u8) -> OledResult<I2C::Error> {
        self.driver.set_contrast(contrast)?;
        Ok(())
    }

    /// Panel off (or back on); frame memory is kept.
    pub fn set_sleep(&mut self, sleep: bool) -> OledResult<I2C::Error> {
        self.driver.set_display_on(!sleep)?;
        Ok(())
    }

    pub fn set_inverted(&mut self, inverted: bool) -> OledResult<I2C::Error> {
        self.driver.set_inverted(inverted)?;
        Ok(())
    }

    pub fn release(self) -> I2C {
        self.driver.release()
    }
}
