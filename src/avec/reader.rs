//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::io::{self, ErrorKind, Read};

use super::{
    FromFrames, Frame, publish,
    sync::{Source, read_frame},
};

extern crate std;

/// Adapter taking bytes from a reader.
struct Reader<'a, R: ?Sized>(&'a mut R);

impl<R: Read + ?Sized> Source for Reader<'_, R> {
    type Error = io::Error;

    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.0.read_exact(buf)
    }
}

/// Iterator over the frames of a reader.
///
/// Ends when the reader does. A frame cut short by the end of the reader is
/// dropped. Other errors from the reader are returned, and may be retried by
/// continuing to iterate.
#[derive(Debug)]
pub struct Frames<R> {
    r: R,
}

impl<R: Read> Iterator for Frames<R> {
    type Item = io::Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        match read_frame(&mut Reader(&mut self.r)) {
            Ok(frame) => Some(Ok(frame)),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => None,
            Err(err) => Some(Err(err)),
        }
    }
}

/// Iterate over the frames of a reader.
///
/// _Requires Cargo feature `std`._
pub fn frames<R: Read>(r: R) -> Frames<R> {
    Frames { r }
}

/// Decode records from a reader of a stream, publishing to a receiver.
///
/// This method is also re-exported as `electrode::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(r: &mut impl Read, o: &mut impl FromFrames) -> io::Result<()> {
    for frame in frames(r) {
        publish(&frame?, o);
    }

    Ok(())
}
