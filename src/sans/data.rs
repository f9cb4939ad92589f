//! Interpretation of record data for standard codes.
//!
//! Records are published without interpretation by the finite-state machine.
//! This module names the codes sent by common headsets and converts their
//! data to Rust primitives.

use zerocopy::byteorder::{BigEndian, F32};

/// Standard record codes.
pub mod code {
    /// Battery level (0 to 127).
    pub const BATTERY_LEVEL: u8 = 0x01;
    /// Poor signal quality (0 to 255, where 0 is a good contact).
    pub const POOR_SIGNAL: u8 = 0x02;
    /// Heart rate (0 to 255), once per second.
    pub const HEART_RATE: u8 = 0x03;
    /// Attention eSense (0 to 100).
    pub const ATTENTION: u8 = 0x04;
    /// Meditation eSense (0 to 100).
    pub const MEDITATION: u8 = 0x05;
    /// 8-bit raw wave value.
    pub const RAW_8BIT: u8 = 0x06;
    /// Raw section start marker (always 0).
    pub const RAW_MARKER: u8 = 0x07;
    /// 16-bit big-endian signed raw wave value.
    pub const RAW_WAVE: u8 = 0x80;
    /// Eight big-endian `f32` EEG band powers.
    pub const EEG_POWER: u8 = 0x81;
    /// Eight big-endian 24-bit unsigned EEG band powers.
    pub const ASIC_EEG_POWER: u8 = 0x83;
    /// Big-endian `u16` milliseconds between two R-peaks.
    pub const RR_INTERVAL: u8 = 0x86;
}

/// Power in each of eight EEG frequency bands.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EegBands<T> {
    pub delta: T,
    pub theta: T,
    pub low_alpha: T,
    pub high_alpha: T,
    pub low_beta: T,
    pub high_beta: T,
    pub low_gamma: T,
    pub mid_gamma: T,
}

impl<T> EegBands<T> {
    fn from_array(
        [delta, theta, low_alpha, high_alpha, low_beta, high_beta, low_gamma, mid_gamma]: [T; 8],
    ) -> Self {
        Self {
            delta,
            theta,
            low_alpha,
            high_alpha,
            low_beta,
            high_beta,
            low_gamma,
            mid_gamma,
        }
    }
}

/// Band powers sent with [`code::EEG_POWER`].
pub type EegPower = EegBands<f32>;

/// Band powers sent with [`code::ASIC_EEG_POWER`].
pub type AsicEegPower = EegBands<u32>;

/// Convert record data to a Rust primitive.
pub trait FromData: Sized {
    /// Convert record data, if it has the expected length.
    fn from_data(r: &[u8]) -> Option<Self>;
}

macro_rules! from_data {
    ($t:ty) => {
        impl FromData for $t {
            fn from_data(r: &[u8]) -> Option<Self> {
                Some(<$t>::from_be_bytes(r.try_into().ok()?))
            }
        }
    };
}

from_data!(u8);
from_data!(i16);
from_data!(u16);

impl FromData for EegPower {
    fn from_data(r: &[u8]) -> Option<Self> {
        let r: [u8; 32] = r.try_into().ok()?;
        let bands: [F32<BigEndian>; 8] = zerocopy::transmute!(r);

        Some(Self::from_array(bands.map(|b| b.get())))
    }
}

impl FromData for AsicEegPower {
    fn from_data(r: &[u8]) -> Option<Self> {
        let r: [u8; 24] = r.try_into().ok()?;
        let bands: [[u8; 3]; 8] = zerocopy::transmute!(r);

        Some(Self::from_array(
            bands.map(|[a, b, c]| u32::from_be_bytes([0, a, b, c])),
        ))
    }
}
