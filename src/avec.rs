//! Convenience interfaces for common decoding patterns.
//!
//! The iterators in this module yield checksum-confirmed [`Frame`]s from
//! slices and readers, from which [`Record`]s can be decoded lazily. The
//! functions publish decoded records to the [`FromFrames`] and [`FromFrame`]
//! traits instead.
//!
//! In many cases (when records of known codes are wanted), [`FromFrame`] can
//! be derived. See the [`FromFrame`](macro@FromFrame) macro for details.

#[cfg(feature = "std")]
extern crate std;

pub mod frame;
#[cfg(feature = "std")]
pub mod reader;
pub mod slice;
pub mod sync;

pub use frame::{Frame, Record, Records};
#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;
pub use sync::{Source, read_frame};

use crate::sans::{
    data::{AsicEegPower, EegPower, FromData, code},
    record::MalformedPayloadError,
};

/// Produce record receivers for a stream.
///
/// `Vec<T>` collects one receiver per frame, and `Option<T>` keeps the receiver
/// for the latest frame.
pub trait FromFrames {
    /// Retrieve a receiver for the next frame, if one exists.
    fn add_frame(&mut self) -> Option<&mut dyn FromFrame>;

    /// Note a frame whose payload could not be decoded in full.
    ///
    /// Records decoded before the fault have already been published.
    fn add_malformed(&mut self, _: MalformedPayloadError) {}
}

impl<T: FromFrame + Default> FromFrames for Option<T> {
    fn add_frame(&mut self) -> Option<&mut dyn FromFrame> {
        Some(self.insert(Default::default()))
    }
}

#[cfg(feature = "std")]
impl<T: FromFrame + Default> FromFrames for std::vec::Vec<T> {
    fn add_frame(&mut self) -> Option<&mut dyn FromFrame> {
        self.push(Default::default());
        self.last_mut().map(|r| r as _)
    }
}

/// Derive [`FromFrame`] for a struct receiving the records of a frame.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// To receive a single value for a record code, add the `code(N)` attribute to
/// an `Option<T>` struct field, where `N` is the record code and `T` is the
/// corresponding Rust primitive (see [`FromFrame`] for each code's primitive).
/// Additional values received for the same code will replace earlier ones.
///
/// ```
/// #[derive(Debug, Default, FromFrame)]
/// struct Reading {
///     #[code(0x02)]
///     poor_signal: Option<u8>,
///     #[code(0x04)]
///     attention: Option<u8>,
///     #[code(0x05)]
///     meditation: Option<u8>,
///     #[code(0x83)]
///     bands: Option<AsicEegPower>,
/// }
/// ```
///
/// To accumulate values instead, supply a closure. Since the value type
/// cannot be inferred, the second argument must be typed.
///
/// ```
/// #[derive(Debug, Default, FromFrame)]
/// struct Wave {
///     #[code(0x80, |v, x: i16| v.push(x))]
///     samples: Vec<i16>,
/// }
/// ```
///
/// Records with extended codes are not published to derived fields.
///
/// A field's primitive must match the one its code is published as. Any other
/// pairing, such as `#[code(0x80)]` on an `Option<u8>`, is a compile error.
#[cfg(feature = "derive")]
pub use electrode_derive::FromFrame;

/// Receive the records of a frame.
///
/// Every record is offered to [`Self::add_record`]. Records without
/// extended-code markers are also converted and published to a typed method
/// by code:
///
/// - [`code::RAW_WAVE`] as `i16`.
/// - [`code::EEG_POWER`] as [`EegPower`].
/// - [`code::ASIC_EEG_POWER`] as [`AsicEegPower`].
/// - [`code::RR_INTERVAL`] as `u16`.
/// - Any other code as `u8`, byte-by-byte.
///
/// Values whose data length does not match their primitive are skipped.
///
/// The default implementation of each method ignores received values.
///
/// See the [`FromFrame`](macro@FromFrame) derive macro for an automatic
/// implementation of this trait.
#[allow(unused_variables)]
pub trait FromFrame {
    /// Add an undecoded record to the frame.
    fn add_record(&mut self, record: &Record<'_>) {}
    /// Add a `u8` for a code to the frame.
    fn add_u8(&mut self, code: u8, _: u8) {}
    /// Add an `i16` for a code to the frame.
    fn add_i16(&mut self, code: u8, _: i16) {}
    /// Add a `u16` for a code to the frame.
    fn add_u16(&mut self, code: u8, _: u16) {}
    /// Add floating point band powers for a code to the frame.
    fn add_eeg_power(&mut self, code: u8, _: EegPower) {}
    /// Add integer band powers for a code to the frame.
    fn add_asic_eeg_power(&mut self, code: u8, _: AsicEegPower) {}
}

/// Decode the records of a frame, publishing to a receiver.
fn publish(frame: &Frame, o: &mut impl FromFrames) {
    let result = match o.add_frame() {
        Some(receiver) => frame.records().try_for_each(|record| {
            publish_record(&record?, &mut *receiver);
            Ok(())
        }),
        None => frame.records().try_for_each(|record| record.map(drop)),
    };

    if let Err(err) = result {
        #[cfg(feature = "std")]
        tracing::debug!(%err, "Discarded the remainder of a malformed payload.");
        o.add_malformed(err);
    }
}

fn publish_record<O: FromFrame + ?Sized>(record: &Record<'_>, o: &mut O) {
    o.add_record(record);

    if record.level() != 0 {
        return;
    }

    fn publish_value<T: FromData, O: FromFrame + ?Sized>(
        o: &mut O,
        c: u8,
        r: &[u8],
        add: fn(&mut O, u8, T),
    ) {
        if let Some(value) = T::from_data(r) {
            add(o, c, value);
        }
    }

    let (c, r) = (record.code(), record.data());

    match c {
        code::RAW_WAVE => publish_value(o, c, r, FromFrame::add_i16),
        code::EEG_POWER => publish_value(o, c, r, FromFrame::add_eeg_power),
        code::ASIC_EEG_POWER => publish_value(o, c, r, FromFrame::add_asic_eeg_power),
        code::RR_INTERVAL => publish_value(o, c, r, FromFrame::add_u16),
        _ => r.iter().for_each(|value| o.add_u8(c, *value)),
    }
}
