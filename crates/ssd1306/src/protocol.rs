//! Wire-level protocol helpers for the SSD1306 controller (I2C flavour).

/// Panel width in pixels.
pub const WIDTH: usize = 128;
/// Panel height in pixels.
pub const HEIGHT: usize = 64;
/// Number of 8-pixel-tall pages.
pub const PAGES: usize = HEIGHT / 8;
/// Total framebuffer size in bytes.
pub const BUFFER_SIZE: usize = WIDTH * PAGES;

/// 7-bit I2C address with SA0 tied low.
pub const ADDRESS_PRIMARY: u8 = 0x3C;
/// 7-bit I2C address with SA0 tied high.
pub const ADDRESS_SECONDARY: u8 = 0x3D;

/// Control byte preceding a single command.
pub const CONTROL_COMMAND: u8 = 0x00;
/// Control byte preceding a GDDRAM data stream.
pub const CONTROL_DATA: u8 = 0x40;

pub const CMD_DISPLAY_OFF: u8 = 0xAE;
pub const CMD_DISPLAY_ON: u8 = 0xAF;
pub const CMD_SET_CLOCK_DIV: u8 = 0xD5;
pub const CMD_SET_MULTIPLEX: u8 = 0xA8;
pub const CMD_SET_DISPLAY_OFFSET: u8 = 0xD3;
pub const CMD_SET_START_LINE: u8 = 0x40;
pub const CMD_CHARGE_PUMP: u8 = 0x8D;
pub const CMD_MEMORY_MODE: u8 = 0x20;
pub const CMD_SEGMENT_REMAP: u8 = 0xA1;
pub const CMD_COM_SCAN_DEC: u8 = 0xC8;
pub const CMD_SET_COM_PINS: u8 = 0xDA;
pub const CMD_SET_CONTRAST: u8 = 0x81;
pub const CMD_SET_PRECHARGE: u8 = 0xD9;
pub const CMD_SET_VCOM_DETECT: u8 = 0xDB;
pub const CMD_RESUME_RAM: u8 = 0xA4;
pub const CMD_NORMAL_DISPLAY: u8 = 0xA6;
pub const CMD_INVERT_DISPLAY: u8 = 0xA7;
pub const CMD_COLUMN_ADDR: u8 = 0x21;
pub const CMD_PAGE_ADDR: u8 = 0x22;

/// Default contrast written by [`INIT_SEQUENCE`].
pub const DEFAULT_CONTRAST: u8 = 0xCF;

/// Power-on command sequence for a 128x64 module with the internal charge pump.
pub const INIT_SEQUENCE: [u8; 25] = [
    CMD_DISPLAY_OFF,
    CMD_SET_CLOCK_DIV,
    0x80,
    CMD_SET_MULTIPLEX,
    (HEIGHT - 1) as u8,
    CMD_SET_DISPLAY_OFFSET,
    0x00,
    CMD_SET_START_LINE,
    CMD_CHARGE_PUMP,
    0x14,
    CMD_MEMORY_MODE,
    0x00,
    CMD_SEGMENT_REMAP,
    CMD_COM_SCAN_DEC,
    CMD_SET_COM_PINS,
    0x12,
    CMD_SET_CONTRAST,
    DEFAULT_CONTRAST,
    CMD_SET_PRECHARGE,
    0xF1,
    CMD_SET_VCOM_DETECT,
    0x40,
    CMD_RESUME_RAM,
    CMD_NORMAL_DISPLAY,
    CMD_DISPLAY_ON,
];

/// Builds a single-command packet.
#[inline]
pub const fn build_command_packet(command: u8) -> [u8; 2] {
    [CONTROL_COMMAND, command]
}

/// Commands that select the whole panel as the write window.
#[inline]
pub const fn full_window_commands() -> [u8; 6] {
    [
        CMD_COLUMN_ADDR,
        0,
        (WIDTH - 1) as u8,
        CMD_PAGE_ADDR,
        0,
        (PAGES - 1) as u8,
    ]
}

/// Maximum payload bytes sent per data transfer.
pub const DATA_CHUNK: usize = 32;

/// Builds a data packet (`0x40` + up to [`DATA_CHUNK`] bytes).
///
/// Returns the packet and its used length.
pub fn build_data_packet(data: &[u8]) -> Option<([u8; DATA_CHUNK + 1], usize)> {
    if data.is_empty() || data.len() > DATA_CHUNK {
        return None;
    }

    let mut packet = [0u8; DATA_CHUNK + 1];
    packet[0] = CONTROL_DATA;
    packet[1..=data.len()].copy_from_slice(data);
    Some((packet, data.len() + 1))
}
