//! Slice-based decoder implementation.

use core::iter::FusedIterator;

use super::{
    FromFrames, Frame, publish,
    sync::{Source, read_frame},
};

/// Reached the end of the slice.
#[derive(Debug)]
pub struct EndOfSlice;

impl Source for &[u8] {
    type Error = EndOfSlice;

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EndOfSlice> {
        let (head, tail) = self.split_at_checked(buf.len()).ok_or(EndOfSlice)?;
        buf.copy_from_slice(head);
        *self = tail;

        Ok(())
    }
}

/// Iterator over the frames of a slice.
///
/// Ends with the slice. A frame cut short by the end of the slice is dropped.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    r: &'a [u8],
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        match read_frame(&mut self.r) {
            Ok(frame) => Some(frame),
            Err(EndOfSlice) => {
                // A failed fill leaves the partial frame unread.
                self.r = &[];
                None
            }
        }
    }
}

impl FusedIterator for Frames<'_> {}

/// Iterate over the frames of a slice.
pub fn frames(r: &[u8]) -> Frames<'_> {
    Frames { r }
}

/// Decode records from a slice of a stream, publishing to a receiver.
///
/// This method is also re-exported as `electrode::avec::decode_slice`.
pub fn decode(r: &[u8], o: &mut impl FromFrames) {
    for frame in frames(r) {
        publish(&frame, o);
    }
}
