//! ESP32-S3 firmware-specific modules for hygro-rs
//!
//! This crate contains hardware-specific code that cannot compile on desktop
//! targets: GPIO/SPI/I2C peripheral bring-up, the button watcher tasks, and
//! the SD card log sink.

#![no_std]

extern crate alloc;

pub mod clock;
pub mod input;
pub mod storage;
