#![cfg(feature = "std")]

use std::{io::Read, path::Path};

use csv::ReaderBuilder;
use electrode::{
    avec::{FromFrame, FromFrames, Record},
    sans::record::MalformedPayloadError,
};

const PATH: &str = "fixtures/noisy-session.bin";

#[test]
fn decode_slice_noisy_session() {
    let data = std::fs::read(PATH).unwrap();
    let mut validator = Validator::new(PATH);
    electrode::avec::decode_slice(&data, &mut validator);
    validator.finish();
}

#[test]
fn decode_reader_noisy_session() {
    let mut file = std::fs::File::open(PATH).unwrap();
    let mut validator = Validator::new(PATH);
    electrode::avec::decode_reader(&mut file, &mut validator).unwrap();
    validator.finish();
}

#[test]
fn decode_reader_byte_at_a_time() {
    let data = std::fs::read(PATH).unwrap();
    let mut reader = Trickle(data.as_slice());
    let mut validator = Validator::new(PATH);
    electrode::avec::decode_reader(&mut reader, &mut validator).unwrap();
    validator.finish();
}

#[test]
fn reader_and_slice_frames_agree() {
    let data = std::fs::read(PATH).unwrap();

    let from_slice: Vec<_> = electrode::avec::slice::frames(&data).collect();
    let from_reader = electrode::avec::reader::frames(data.as_slice())
        .collect::<std::io::Result<Vec<_>>>()
        .unwrap();

    assert_eq!(from_slice, from_reader);
    assert_eq!(from_slice.len(), 11);
}

/// Reader returning at most one byte per read.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = buf.len().min(1);
        Read::take(&mut self.0, n as u64).read(buf)
    }
}

/// Expected publications, one row each: `frame`, `malformed`, or
/// `record,<level>,<code>,<hex data>`.
struct Validator(Vec<Vec<String>>);

impl Validator {
    fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().with_extension("csv");

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .unwrap();

        let mut expected: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        expected.reverse();

        Self(expected)
    }

    fn next_row(&mut self) -> Vec<String> {
        self.0.pop().expect("more publications than expected")
    }

    fn finish(self) {
        assert!(self.0.is_empty(), "missing publications: {:?}", self.0);
    }
}

impl FromFrames for Validator {
    fn add_frame(&mut self) -> Option<&mut dyn FromFrame> {
        assert_eq!(self.next_row(), ["frame"]);
        Some(self)
    }

    fn add_malformed(&mut self, _: MalformedPayloadError) {
        assert_eq!(self.next_row(), ["malformed"]);
    }
}

impl FromFrame for Validator {
    fn add_record(&mut self, record: &Record<'_>) {
        let data: String = record.data().iter().map(|b| format!("{b:02x}")).collect();

        assert_eq!(
            self.next_row(),
            [
                "record".to_string(),
                record.level().to_string(),
                record.code().to_string(),
                data,
            ]
        );
    }
}
