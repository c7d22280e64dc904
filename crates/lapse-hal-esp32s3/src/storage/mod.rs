pub mod flash_settings;
pub mod sd_spi;
