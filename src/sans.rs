//! Internal finite-state machine for implementing decoders.
//!
//! This module is intended for advanced applications that need fine control
//! over decoder internals. See [`crate::avec`] for implementations covering
//! common decoding patterns.
//!
//! # Architecture
//!
//! All states are represented by a non-copy token. Once enough bytes are
//! ready, transition to another state by calling the token's `advance`
//! method. This will return a successor state token, along with any extracted
//! data.
//!
//! Decoding happens on two levels. Frame states in [`frame`] find the
//! synchronization markers, read the payload length, and confirm the payload
//! against its checksum. Once confirmed, record states in [`record`] perform a
//! second pass over the buffered payload, splitting it into records. Record
//! tokens track the bytes remaining in the payload, and fail with a
//! [`record::MalformedPayloadError`] rather than read past its end.
//!
//! A frame may be abandoned at the length or checksum states, returning a
//! [`frame::Resync`] reason. This is routine on a noisy link: continue from a
//! new [`frame::SyncMarker`].
//!
//! Only the initial state, re-exported for convenience as [`Decoder`], can be
//! constructed.
//!
//! Some areas of the decoding process are not represented in the
//! finite-state machine and must be carefully written:
//!
//! - Buffering the payload, so that records can be decoded after the checksum
//! byte has been read.
//!
//! - Taking each record's data bytes from the buffered payload.
//!
//! Implementers are recommended to begin by studying and modifying the driver
//! in [`crate::avec::sync`].

pub mod check;
pub mod data;
pub mod frame;
pub mod record;

/// Entrypoint to the finite-state machine.
pub type Decoder = frame::SyncMarker;
