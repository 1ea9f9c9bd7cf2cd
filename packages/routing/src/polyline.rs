//! Fixed-precision polyline decoding.
//!
//! Directions providers return route geometry in the common encoded
//! polyline format (5 decimal digits of precision, delta-encoded signed
//! integers packed into printable ASCII). Decoding preserves the original
//! point order.
//!
//! See <https://developers.google.com/maps/documentation/utilities/polylinealgorithm>

use route_alert_models::{GeoPoint, InvalidCoordinateError};
use thiserror::Error;

/// Scale factor for the 5-digit encoding.
const PRECISION: f64 = 1e5;

/// Errors from decoding an encoded polyline.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Input ended in the middle of a varint chunk or coordinate pair.
    #[error("unexpected end of polyline input")]
    Truncated,

    /// A byte outside the printable encoding range was encountered.
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte {
        /// The offending byte.
        byte: u8,
        /// Byte offset into the encoded string.
        offset: usize,
    },

    /// A decoded coordinate fell outside the WGS84 ranges.
    #[error("decoded coordinate out of range")]
    Coordinate(#[from] InvalidCoordinateError),
}

/// Decodes an encoded polyline into its coordinate sequence.
///
/// An empty string decodes to an empty sequence.
///
/// # Errors
///
/// Returns [`DecodeError`] on truncated input, bytes outside the
/// encoding alphabet, or coordinates outside the WGS84 ranges.
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut offset = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while offset < bytes.len() {
        let (dlat, next) = decode_value(bytes, offset)?;
        let (dlon, end) = decode_value(bytes, next)?;
        lat += dlat;
        lon += dlon;

        #[allow(clippy::cast_precision_loss)]
        let point = GeoPoint::new(lat as f64 / PRECISION, lon as f64 / PRECISION)?;
        points.push(point);
        offset = end;
    }

    Ok(points)
}

/// Decodes one zigzag-encoded signed value starting at `offset`, returning
/// the value and the offset just past it.
fn decode_value(bytes: &[u8], mut offset: usize) -> Result<(i64, usize), DecodeError> {
    let mut accumulator: i64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(offset) else {
            return Err(DecodeError::Truncated);
        };
        if !(63..=126).contains(&byte) {
            return Err(DecodeError::InvalidByte { byte, offset });
        }

        let chunk = i64::from(byte - 63);
        accumulator |= (chunk & 0x1f) << shift;
        offset += 1;
        if chunk & 0x20 == 0 {
            break;
        }
        shift += 5;
    }

    let value = if accumulator & 1 == 1 {
        !(accumulator >> 1)
    } else {
        accumulator >> 1
    };
    Ok((value, offset))
}
