//! Listing Desk - broker listing intake and publication workflow.
//!
//! A guided multi-step dialogue collects a fixed ordered set of listing
//! fields and photos, publishes the listing to a shared channel, and lets
//! any authorized actor drive the listing's lifecycle status from there.
//! Status changes are logged append-only and aggregated into rolling
//! day / month / year statistics.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
