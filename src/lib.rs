//! Dielectron tag-and-probe selection over parquet event files, histogrammed per
//! dataset and written out as parquet tables.

#![warn(clippy::all, rust_2018_idioms)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod event;
pub mod histoer;
pub mod kinematics;
pub mod manifest;
pub mod util;
