#![cfg_attr(not(test), no_std)]

//! Board-independent font loading and text rendering for the timelapse
//! camera's 128x64 status panel.

pub mod ascii;
pub mod canvas;
pub mod font;
pub mod gb2312;
pub mod raster;
pub mod settings;
pub mod text;
pub mod ui;
