//! Frame synchronization over a sequential byte source.
//!
//! This is the driver shared by the slice and reader decoders. It walks the
//! frame states of the finite-state machine, buffering each payload until
//! its checksum is confirmed. Abandoned frames are discarded, and
//! synchronization resumes from the next byte.

use either::Either::{Left, Right};
use tinyvec::ArrayVec;

use crate::sans::frame::{PayloadLength, Resync, SyncMarker};

use super::Frame;

/// A sequential source of bytes.
pub trait Source {
    /// Error returned when bytes cannot be taken, including at the end of
    /// input.
    type Error;

    /// Fill a buffer with the next bytes from the source.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// Read the next checksum-confirmed frame from a source.
///
/// Leading noise and abandoned frames are skipped. Fails only when the source
/// does, which includes reaching its end.
pub fn read_frame<S: Source + ?Sized>(s: &mut S) -> Result<Frame, S::Error> {
    loop {
        match read_candidate(s)? {
            Ok(frame) => return Ok(frame),
            Err(_reason) => {
                #[cfg(feature = "std")]
                tracing::debug!(reason = ?_reason, "Discarded frame.");
            }
        }
    }
}

/// Read a single frame following synchronization, which may be abandoned.
fn read_candidate<S: Source + ?Sized>(s: &mut S) -> Result<Result<Frame, Resync>, S::Error> {
    let mut state = synchronize(s)?;

    let payload = loop {
        state = match state.advance(take(s)?) {
            Ok(Left(state)) => state,
            Ok(Right(payload)) => break payload,
            Err(reason) => return Ok(Err(reason)),
        };
    };

    let mut buffer = ArrayVec::new();
    buffer.resize(payload.length(), 0);
    s.fill(&mut buffer)?;

    let state = payload.advance(&buffer);
    let checksum = take(s)?;

    Ok(state.advance(checksum).map(|_| Frame {
        payload: buffer,
        checksum: checksum[0],
    }))
}

/// Discard bytes until a pair of synchronization markers has been read.
fn synchronize<S: Source + ?Sized>(s: &mut S) -> Result<PayloadLength, S::Error> {
    let mut state = SyncMarker;

    loop {
        state = match state.advance(take(s)?) {
            Left(state) => match state.advance(take(s)?) {
                Left(state) => return Ok(state),
                Right(state) => state,
            },
            Right(state) => state,
        };
    }
}

/// Take an exact number of bytes from a source.
fn take<S: Source + ?Sized, const N: usize>(s: &mut S) -> Result<[u8; N], S::Error> {
    let mut buf = [0; N];
    s.fill(&mut buf)?;

    Ok(buf)
}
