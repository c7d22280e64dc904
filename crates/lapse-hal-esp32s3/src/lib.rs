#![no_std]

//! ESP32-S3 board glue: SD card font storage, flash-backed settings, and the
//! I2C OLED panel.

pub mod platform;
pub mod storage;
