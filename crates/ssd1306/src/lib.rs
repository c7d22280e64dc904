#![cfg_attr(not(test), no_std)]

//! SSD1306 (0.96" 128x64 OLED) driver primitives over I2C.

mod framebuffer;
pub mod protocol;

#[cfg(feature = "embedded-graphics")]
mod graphics;

pub use framebuffer::FrameBuffer;

use embedded_hal::i2c::I2c;

/// Driver configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// 7-bit bus address.
    pub address: u8,
    /// Expected I2C clock in Hz (documented for board glue).
    pub i2c_hz: u32,
    /// Contrast applied after the init sequence.
    pub contrast: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: protocol::ADDRESS_PRIMARY,
            i2c_hz: 400_000,
            contrast: protocol::DEFAULT_CONTRAST,
        }
    }
}

/// Driver errors.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error<I2cErr> {
    /// I2C transaction failed.
    I2c(I2cErr),
    /// Input parameters are outside supported bounds.
    InvalidInput,
}

pub type DriverResult<I2cErr> = Result<(), Error<I2cErr>>;

/// SSD1306 driver.
#[derive(Debug)]
pub struct Ssd1306<I2C> {
    i2c: I2C,
    config: Config,
}

impl<I2C> Ssd1306<I2C>
where
    I2C: I2c,
{
    /// Creates a new driver instance.
    pub fn new(i2c: I2C, config: Config) -> Self {
        Self { i2c, config }
    }

    /// Returns current configuration.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Releases the owned bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Checks whether a device acknowledges at the configured address.
    pub fn probe(&mut self) -> DriverResult<I2C::Error> {
        self.command(protocol::CMD_DISPLAY_OFF)
    }

    /// Sends one command byte.
    pub fn command(&mut self, command: u8) -> DriverResult<I2C::Error> {
        let packet = protocol::build_command_packet(command);
        self.i2c
            .write(self.config.address, &packet)
            .map_err(Error::I2c)
    }

    fn commands(&mut self, commands: &[u8]) -> DriverResult<I2C::Error> {
        for &command in commands {
            self.command(command)?;
        }
        Ok(())
    }

    /// Runs the power-on sequence and applies the configured contrast.
    pub fn init(&mut self) -> DriverResult<I2C::Error> {
        self.commands(&protocol::INIT_SEQUENCE)?;
        if self.config.contrast != protocol::DEFAULT_CONTRAST {
            self.set_contrast(self.config.contrast)?;
        }
        Ok(())
    }

    /// Sets panel contrast.
    pub fn set_contrast(&mut self, contrast: u8) -> DriverResult<I2C::Error> {
        self.commands(&[protocol::CMD_SET_CONTRAST, contrast])?;
        self.config.contrast = contrast;
        Ok(())
    }

    /// Turns the panel output on or off (GDDRAM is retained).
    pub fn set_display_on(&mut self, on: bool) -> DriverResult<I2C::Error> {
        self.command(if on {
            protocol::CMD_DISPLAY_ON
        } else {
            protocol::CMD_DISPLAY_OFF
        })
    }

    /// Switches between normal and inverted pixel polarity.
    pub fn set_inverted(&mut self, inverted: bool) -> DriverResult<I2C::Error> {
        self.command(if inverted {
            protocol::CMD_INVERT_DISPLAY
        } else {
            protocol::CMD_NORMAL_DISPLAY
        })
    }

    /// Flushes a full framebuffer.
    pub fn flush(&mut self, buffer: &[u8; protocol::BUFFER_SIZE]) -> DriverResult<I2C::Error> {
        self.commands(&protocol::full_window_commands())?;

        for chunk in buffer.chunks(protocol::DATA_CHUNK) {
            let (packet, len) = protocol::build_data_packet(chunk).ok_or(Error::InvalidInput)?;
            self.i2c
                .write(self.config.address, &packet[..len])
                .map_err(Error::I2c)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u8, Vec<u8>)>,
        nack: bool,
    }

    impl ErrorType for RecordingBus {
        type Error = ErrorKind;
    }

    impl I2c for RecordingBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.nack {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn init_sends_each_command_with_command_prefix() {
        let mut panel = Ssd1306::new(RecordingBus::default(), Config::default());
        panel.init().unwrap();

        let bus = panel.release();
        assert_eq!(bus.writes.len(), protocol::INIT_SEQUENCE.len());
        assert!(bus.writes.iter().all(|(addr, bytes)| *addr == 0x3C && bytes[0] == 0x00));
        let sent: Vec<u8> = bus.writes.iter().map(|(_, b)| b[1]).collect();
        assert_eq!(sent, protocol::INIT_SEQUENCE);
    }

    #[test]
    fn custom_contrast_is_applied_after_init() {
        let config = Config {
            contrast: 0x10,
            ..Config::default()
        };
        let mut panel = Ssd1306::new(RecordingBus::default(), config);
        panel.init().unwrap();

        let bus = panel.release();
        let tail: Vec<u8> = bus.writes.iter().rev().take(2).map(|(_, b)| b[1]).collect();
        assert_eq!(tail, [0x10, 0x81]);
    }

    #[test]
    fn flush_sets_window_then_streams_data() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(0, 0, true);

        let mut panel = Ssd1306::new(RecordingBus::default(), Config::default());
        panel.flush(fb.bytes()).unwrap();

        let bus = panel.release();
        let window: Vec<u8> = bus.writes[..6].iter().map(|(_, b)| b[1]).collect();
        assert_eq!(window, protocol::full_window_commands());

        let data = &bus.writes[6..];
        assert_eq!(data.len(), protocol::BUFFER_SIZE / protocol::DATA_CHUNK);
        assert!(data.iter().all(|(_, b)| b[0] == 0x40));
        assert_eq!(data[0].1[1], 0x01);
        let payload: usize = data.iter().map(|(_, b)| b.len() - 1).sum();
        assert_eq!(payload, protocol::BUFFER_SIZE);
    }

    #[test]
    fn bus_errors_surface() {
        let bus = RecordingBus {
            nack: true,
            ..RecordingBus::default()
        };
        let mut panel = Ssd1306::new(bus, Config::default());
        assert_eq!(panel.probe(), Err(Error::I2c(ErrorKind::Other)));
    }
}
