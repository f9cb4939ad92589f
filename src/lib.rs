#![no_std]

//! An efficient decoder for NeuroSky's ThinkGear biosensor stream protocol.
//!
//! Headsets such as the MindWave send a continuous stream of frames, each
//! opened by a pair of synchronization markers and closed by a checksum. The
//! payload of each frame holds one or more records: a code, an optional data
//! length, and data (raw wave samples, eSense values, EEG band powers, and so
//! on).
//!
//! Electrode provides a set of ergonomic interfaces for common decoding
//! patterns, and exposes its underlying finite-state machine for applications
//! needing finer control over internals (such as those running on embedded
//! systems).
//!
//! Most users should begin with the iterators, functions, and derive macro in
//! the [`avec`] module. If these prove insufficient, consider implementing a
//! decoder as described in the [`sans`] module.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macro (default).
//! - `std`: enable reader-based decoder and logging with `tracing` (default).

pub mod avec;
pub mod sans;
