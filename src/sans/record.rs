//! States processing records within a confirmed payload.
//!
//! These states make a second pass over the buffered payload. Each token
//! tracks the number of payload bytes remaining, so a record can never be
//! decoded past the end of its payload.

use either::Either::{self, Left, Right};
use tartan_bitfield::bitfield;
use thiserror::Error;

/// Extended-code marker, prefixed to a code once per level.
pub const EXCODE: u8 = 0x55;

/// An error decoding records from a payload.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MalformedPayloadError {
    /// The payload ended inside a record's code or length.
    #[error("Payload ended inside a record header.")]
    Truncated,
    /// A record declared more data than remains in the payload.
    #[error("Record declares {length} data bytes, but only {remaining} remain.")]
    Overrun { length: u8, remaining: u8 },
}

/// State token to decode a record code, counting extended-code markers.
#[derive(Debug)]
pub struct RecordCode {
    pub(super) level: u8,
    pub(super) remaining: u8,
}

impl RecordCode {
    /// Start decoding a payload of `length` bytes, if it holds any.
    pub(crate) fn first(length: u8) -> Option<Self> {
        (length != 0).then_some(Self {
            level: 0,
            remaining: length,
        })
    }

    /// Transition to another state by decoding an extended-code marker or a
    /// record code.
    ///
    /// Returns this state at the next level after a marker. Otherwise returns
    /// a successor state token: one expecting an explicit data length for
    /// codes with the high bit set, or one holding a single-byte record.
    pub fn advance(
        self,
        r: [u8; 1],
    ) -> Result<Either<RecordCode, Either<RecordLength, RecordData>>, MalformedPayloadError> {
        let r = r[0];
        let remaining = self.remaining - 1;

        if r == EXCODE {
            if remaining == 0 {
                Err(MalformedPayloadError::Truncated)?;
            }

            return Ok(Left(RecordCode {
                level: self.level + 1,
                remaining,
            }));
        }

        bitfield! {
            struct Code(u8) {
                [7] has_length,
            }
        }

        let successor = if Code(r).has_length() {
            if remaining == 0 {
                Err(MalformedPayloadError::Truncated)?;
            }

            Left(RecordLength {
                level: self.level,
                code: r,
                remaining,
            })
        } else {
            Right(RecordData::new(self.level, r, 1, remaining)?)
        };

        Ok(Right(successor))
    }
}

/// State token to decode an explicit record data length.
#[derive(Debug)]
pub struct RecordLength {
    pub(super) level: u8,
    pub(super) code: u8,
    pub(super) remaining: u8,
}

impl RecordLength {
    /// Transition to another state by decoding a data length.
    ///
    /// Returns a successor state token.
    pub fn advance(self, r: [u8; 1]) -> Result<RecordData, MalformedPayloadError> {
        RecordData::new(self.level, self.code, r[0], self.remaining - 1)
    }
}

/// State token holding a decoded record header, ahead of its data.
#[derive(Debug)]
pub struct RecordData {
    level: u8,
    code: u8,
    length: u8,
    remaining: u8,
}

impl RecordData {
    fn new(level: u8, code: u8, length: u8, remaining: u8) -> Result<Self, MalformedPayloadError> {
        if length > remaining {
            Err(MalformedPayloadError::Overrun { length, remaining })?;
        }

        Ok(Self {
            level,
            code,
            length,
            remaining: remaining - length,
        })
    }

    /// Number of extended-code markers preceding the code.
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    /// Number of data bytes in this record.
    pub fn length(&self) -> usize {
        self.length as usize
    }

    /// Transition to another state by skipping over the record data.
    ///
    /// **The caller must take [`Self::length`] data bytes from the payload.**
    ///
    /// Returns a state token for the next record, or `None` once the payload
    /// is exhausted.
    pub fn advance(self) -> Option<RecordCode> {
        RecordCode::first(self.remaining)
    }
}
