//! Hardware-independent core library for hygro-rs
//!
//! This crate contains all platform-agnostic logic for the hygro
//! temperature/humidity logger: the measurement history ring, the sampling
//! orchestration state machine, the SHT30 driver, CSV log formatting and the
//! persistence worker, and the monochrome UI pages.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets (ESP32-S3) and desktop hosts (for the simulator and
//! tests).

#![no_std]

extern crate alloc;

pub mod config;
pub mod controller;
pub mod history;
pub mod measurement;
pub mod pages;
pub mod persistence;
pub mod sensors;
pub mod ui;
