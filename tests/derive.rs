#![allow(dead_code, unused)]
#![cfg(all(feature = "derive", feature = "std"))]

use electrode::{
    avec::{Frame, FromFrame, FromFrames},
    sans::{
        data::{AsicEegPower, EegBands, EegPower},
        record::MalformedPayloadError,
    },
};

const PATH: &str = "fixtures/noisy-session.bin";

#[derive(Debug, Default, FromFrame)]
struct Reading {
    #[code(0x01)]
    battery: Option<u8>,
    #[code(0x02)]
    poor_signal: Option<u8>,
    #[code(0x03)]
    heart_rate: Option<u8>,
    #[code(0x04)]
    attention: Option<u8>,
    #[code(0x05)]
    meditation: Option<u8>,
    #[code(0x07)]
    marker: Option<u8>,
    #[code(0x80)]
    raw: Option<i16>,
    #[code(0x81)]
    eeg: Option<EegPower>,
    #[code(0x83)]
    asic: Option<AsicEegPower>,
    #[code(0x86)]
    rr_interval: Option<u16>,
}

#[test]
fn decode_slice_readings() {
    let data = std::fs::read(PATH).unwrap();
    let mut readings: Vec<Reading> = Vec::new();
    electrode::avec::decode_slice(&data, &mut readings);

    assert_eq!(readings.len(), 11);

    let summary = &readings[0];
    assert_eq!(summary.poor_signal, Some(0x20));
    assert_eq!(summary.battery, Some(0x7E));
    assert_eq!(summary.attention, Some(0x12));
    assert_eq!(summary.meditation, Some(0x60));
    assert_eq!(summary.raw, None);

    let raw: Vec<_> = readings[1..5].iter().map(|r| r.raw).collect();
    assert_eq!(raw, [Some(-1234), Some(0), Some(2047), Some(16)]);

    let eeg = readings[5].eeg.unwrap();
    assert_eq!(eeg.delta, 1.5);
    assert_eq!(eeg.low_alpha, -3.0);
    assert_eq!(eeg.high_beta, 65536.0);
    assert_eq!(eeg.mid_gamma, 0.0);

    let asic = readings[6].asic.unwrap();
    assert_eq!(
        asic,
        EegBands {
            delta: 0x000001,
            theta: 0x0000FF,
            low_alpha: 0x010000,
            high_alpha: 0x123456,
            low_beta: 0xFFFFFF,
            high_beta: 0x000A0B,
            low_gamma: 0x7F0000,
            mid_gamma: 0,
        }
    );
    assert_eq!(readings[6].attention, Some(0x35));

    assert_eq!(readings[7].heart_rate, Some(0x48));
    assert_eq!(readings[7].rr_interval, Some(800));

    // Extended codes are not published to derived fields.
    assert_eq!(readings[8].marker, None);

    // Records ahead of a fault are published.
    assert_eq!(readings[9].attention, Some(0x50));
}

#[derive(Debug, Default, FromFrame)]
struct Session {
    #[code(0x80, |v, x: i16| v.push(x))]
    wave: Vec<i16>,
    #[code(0x04, |v, x: u8| if x > *v { *v = x })]
    peak_attention: u8,
    malformed: usize,
}

impl FromFrames for Session {
    fn add_frame(&mut self) -> Option<&mut dyn FromFrame> {
        Some(self)
    }

    fn add_malformed(&mut self, _: MalformedPayloadError) {
        self.malformed += 1;
    }
}

#[test]
fn decode_reader_session() {
    let mut file = std::fs::File::open(PATH).unwrap();
    let mut session = Session::default();
    electrode::avec::decode_reader(&mut file, &mut session).unwrap();

    assert_eq!(session.wave, [-1234, 0, 2047, 16]);
    assert_eq!(session.peak_attention, 0x50);
    assert_eq!(session.malformed, 1);
}

#[test]
fn latest_frame_is_kept() {
    let mut stream: Vec<u8> = Frame::new(&[0x04, 0x10]).unwrap().encode().collect();
    stream.extend(Frame::new(&[0x05, 0x20]).unwrap().encode());

    let mut latest: Option<Reading> = None;
    electrode::avec::decode_slice(&stream, &mut latest);

    let latest = latest.unwrap();
    assert_eq!(latest.attention, None);
    assert_eq!(latest.meditation, Some(0x20));
}

#[test]
fn mismatched_data_length_is_skipped() {
    // A raw wave value with three data bytes cannot be an `i16`.
    let stream: Vec<u8> = Frame::new(&[0x80, 0x03, 0x01, 0x02, 0x03, 0x04, 0x11])
        .unwrap()
        .encode()
        .collect();

    let mut latest: Option<Reading> = None;
    electrode::avec::decode_slice(&stream, &mut latest);

    let latest = latest.unwrap();
    assert_eq!(latest.raw, None);
    assert_eq!(latest.attention, Some(0x11));
}
