#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod activity_index;
pub mod canvas;
pub mod classifier;
pub mod config;
pub mod geocoder;
pub mod import_data;
pub mod logs;
pub mod pipeline;
pub mod projection;
pub mod track;
