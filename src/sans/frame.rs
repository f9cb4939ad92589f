//! States processing frame synchronization, length, payload, and checksum.

use either::Either::{self, Left, Right};

use super::{check::compute_checksum, record::RecordCode};

/// Synchronization marker, sent twice to open a frame.
pub const SYNC: u8 = 0xAA;

/// Largest payload length a frame may declare.
pub const MAX_PAYLOAD_LENGTH: usize = 169;

/// Length value sent as filler between the synchronization markers and the
/// real payload length.
pub const PADDING: u8 = 170;

/// A reason for abandoning a frame and returning to synchronization.
///
/// These are expected on noisy links and are not errors. Restart decoding
/// from [`super::Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resync {
    /// Payload length exceeds [`MAX_PAYLOAD_LENGTH`].
    OversizedLength(u8),
    /// Calculated and found checksum values do not match.
    ChecksumMismatch { found: u8, calculated: u8 },
}

/// State token to find the first synchronization marker.
#[derive(Debug)]
pub struct SyncMarker;

impl SyncMarker {
    /// Transition to another state by decoding a candidate synchronization
    /// marker.
    ///
    /// Returns a successor state token. Bytes other than [`SYNC`] are
    /// discarded, returning this state.
    pub fn advance(self, r: [u8; 1]) -> Either<SecondSyncMarker, SyncMarker> {
        if r[0] == SYNC {
            Left(SecondSyncMarker(()))
        } else {
            Right(self)
        }
    }
}

/// State token to confirm a synchronization marker with a second.
#[derive(Debug)]
pub struct SecondSyncMarker(pub(super) ());

impl SecondSyncMarker {
    /// Transition to another state by decoding the second synchronization
    /// marker.
    ///
    /// Returns a successor state token. If the byte is not [`SYNC`], both
    /// bytes are discarded and synchronization restarts.
    pub fn advance(self, r: [u8; 1]) -> Either<PayloadLength, SyncMarker> {
        if r[0] == SYNC {
            Left(PayloadLength(()))
        } else {
            Right(SyncMarker)
        }
    }
}

/// State token to decode a payload length.
#[derive(Debug)]
pub struct PayloadLength(pub(super) ());

impl PayloadLength {
    /// Transition to another state by decoding a payload length.
    ///
    /// Returns this state again for a [`PADDING`] byte, otherwise a successor
    /// state token expecting the payload.
    pub fn advance(self, r: [u8; 1]) -> Result<Either<PayloadLength, Payload>, Resync> {
        let length = r[0];

        if length == PADDING {
            return Ok(Left(self));
        }

        if length as usize > MAX_PAYLOAD_LENGTH {
            Err(Resync::OversizedLength(length))?;
        }

        Ok(Right(Payload { length }))
    }
}

/// State token to accumulate a frame payload.
#[derive(Debug)]
pub struct Payload {
    pub(super) length: u8,
}

impl Payload {
    /// Number of payload bytes expected by [`Self::advance`].
    pub fn length(&self) -> usize {
        self.length as usize
    }

    /// Transition to another state by accumulating the payload into a
    /// checksum.
    ///
    /// **This method expects exactly [`Self::length`] bytes.** Implementations
    /// must buffer them to decode records once the checksum is confirmed.
    ///
    /// Returns a successor state token.
    pub fn advance(self, r: &[u8]) -> Checksum {
        Checksum {
            length: self.length,
            calculated: compute_checksum(r),
        }
    }
}

/// State token to confirm a payload against its checksum.
#[derive(Debug)]
pub struct Checksum {
    pub(super) length: u8,
    pub(super) calculated: u8,
}

impl Checksum {
    /// Transition to another state by decoding the checksum byte.
    ///
    /// Returns a state token to decode the first record of the buffered
    /// payload, or `None` for an empty payload. In either case, the next frame
    /// begins from [`super::Decoder`].
    pub fn advance(self, r: [u8; 1]) -> Result<Option<RecordCode>, Resync> {
        let found = r[0];
        let calculated = self.calculated;

        if found != calculated {
            Err(Resync::ChecksumMismatch { found, calculated })?;
        }

        Ok(RecordCode::first(self.length))
    }
}
