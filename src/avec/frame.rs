//! Checksum-confirmed frames, and the records decoded from them.

use core::iter::{once, repeat_n};

use either::Either::{Left, Right};
use thiserror::Error;
use tinyvec::ArrayVec;

use crate::sans::{
    check::compute_checksum,
    frame::{MAX_PAYLOAD_LENGTH, SYNC},
    record::{EXCODE, MalformedPayloadError, RecordCode},
};

/// A payload too long to fit in a frame.
#[derive(Debug, Error)]
#[error("Payload length ({0}) exceeds the maximum of {max} bytes.", max = MAX_PAYLOAD_LENGTH)]
pub struct PayloadTooLong(pub usize);

/// A frame with a confirmed checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub(super) payload: ArrayVec<[u8; MAX_PAYLOAD_LENGTH]>,
    pub(super) checksum: u8,
}

impl Frame {
    /// Build a frame around a payload, computing its checksum.
    pub fn new(payload: &[u8]) -> Result<Self, PayloadTooLong> {
        if payload.len() > MAX_PAYLOAD_LENGTH {
            Err(PayloadTooLong(payload.len()))?;
        }

        let mut buffer = ArrayVec::new();
        buffer.extend_from_slice(payload);

        Ok(Self {
            payload: buffer,
            checksum: compute_checksum(payload),
        })
    }

    /// Number of bytes in the payload.
    pub fn length(&self) -> usize {
        self.payload.len()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Decode the records held in the payload, in order.
    pub fn records(&self) -> Records<'_> {
        Records {
            r: &self.payload,
            i: 0,
            state: RecordCode::first(self.payload.len() as u8),
        }
    }

    /// Encode the frame as it would be sent, with synchronization markers.
    pub fn encode(&self) -> impl Iterator<Item = u8> + '_ {
        [SYNC, SYNC, self.payload.len() as u8]
            .into_iter()
            .chain(self.payload.iter().copied())
            .chain(once(self.checksum))
    }
}

/// A record decoded from a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    level: u8,
    code: u8,
    data: &'a [u8],
}

impl<'a> Record<'a> {
    /// Number of extended-code markers preceding the code.
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    /// Number of data bytes in this record.
    pub fn length(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Encode the record as it appears in a payload.
    pub fn encode(&self) -> impl Iterator<Item = u8> + 'a {
        let length = (self.code & 0x80 != 0).then_some(self.data.len() as u8);

        repeat_n(EXCODE, self.level as usize)
            .chain(once(self.code))
            .chain(length)
            .chain(self.data.iter().copied())
    }
}

/// Iterator decoding the records of a payload.
///
/// Once a [`MalformedPayloadError`] has been returned, the iterator is
/// exhausted.
#[derive(Debug)]
pub struct Records<'a> {
    r: &'a [u8],
    i: usize,
    state: Option<RecordCode>,
}

impl<'a> Records<'a> {
    fn decode(&mut self, mut state: RecordCode) -> Result<Record<'a>, MalformedPayloadError> {
        let state = loop {
            state = match state.advance(take(self.r, &mut self.i)?)? {
                Left(state) => state,
                Right(Left(state)) => break state.advance(take(self.r, &mut self.i)?)?,
                Right(Right(state)) => break state,
            };
        };

        let s = self.i;
        self.i += state.length();

        let data = self
            .r
            .get(s..self.i)
            .ok_or(MalformedPayloadError::Truncated)?;

        let record = Record {
            level: state.level(),
            code: state.code(),
            data,
        };

        self.state = state.advance();

        Ok(record)
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record<'a>, MalformedPayloadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.state.take()?;
        Some(self.decode(state))
    }
}

/// Take an exact number of bytes from an offset in a slice, advancing the offset.
fn take<const N: usize>(r: &[u8], i: &mut usize) -> Result<[u8; N], MalformedPayloadError> {
    let s = *i;
    *i += N;

    r.get(s..*i)
        .and_then(|r| r.try_into().ok())
        .ok_or(MalformedPayloadError::Truncated)
}
