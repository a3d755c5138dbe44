//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the simulation:
//! - Math types and operations
//! - Collections and handle types
//! - Simulation time management
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
