//! driverlogic: TAP adapter identification for driver installers
//!
//! A library for telling which virtual network adapter a driver installation
//! created, by diffing snapshots of the adapter class taken before and after
//! the installer runs, and for removing the product's own adapter.

pub mod adapter;
pub mod config;
pub mod tracker;
