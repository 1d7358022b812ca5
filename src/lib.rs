//! Core library for the spatiotemporal incident network analyzer

pub mod cache;
pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod report;
pub mod spatial;
pub mod storage;
pub mod viz;

pub use anyhow::{anyhow, Result};
