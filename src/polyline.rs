//! Encoded polyline support for route geometries.
//!
//! Providers ship geometry as compact encoded polylines: each coordinate is a
//! pair of signed deltas against the previous one, zig-zag encoded and split
//! into 5-bit groups offset by 63, with `0x20` marking continuation. Values
//! are scaled by `1e5`. Decoding happens at the provider boundary; the rest of
//! the planner works on decoded [`GeoPoint`] sequences.

use crate::error::DecodeError;
use crate::geo::GeoPoint;

const PRECISION: f64 = 1e5;
const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: u64 = 0x1f;
const CONTINUATION: u64 = 0x20;
const OFFSET: u8 = 63;

/// Decodes an encoded polyline into `(lat, lon)` points in input order.
///
/// The empty string decodes to no points. Input that ends inside a value,
/// contains bytes outside the encoding alphabet, carries more than 64 bits in
/// one value, or lands outside the latitude/longitude ranges is rejected.
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        let start = index;
        lat = lat.wrapping_add(next_value(bytes, &mut index)?);
        lng = lng.wrapping_add(next_value(bytes, &mut index)?);
        let point = GeoPoint {
            lat: lat as f64 / PRECISION,
            lon: lng as f64 / PRECISION,
        };
        if !(-90.0..=90.0).contains(&point.lat) || !(-180.0..=180.0).contains(&point.lon) {
            return Err(DecodeError::OutOfRange { offset: start });
        }
        points.push(point);
    }

    Ok(points)
}

/// Encodes points at five decimal digits of precision.
pub fn encode(points: &[GeoPoint]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.lat * PRECISION).round() as i64;
        let lng = (point.lon * PRECISION).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, DecodeError> {
    let start = *index;
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or(DecodeError::Truncated { offset: start })?;
        if !(OFFSET..=OFFSET + 63).contains(&byte) {
            return Err(DecodeError::InvalidByte {
                byte,
                offset: *index,
            });
        }
        let chunk = u64::from(byte - OFFSET);
        let bits = chunk & CHUNK_MASK;
        // the last group that fits only has room for its low 64 - shift bits
        if shift >= u64::BITS
            || (u64::BITS - shift < CHUNK_BITS && bits >> (u64::BITS - shift) != 0)
        {
            return Err(DecodeError::Overflow { offset: start });
        }
        *index += 1;

        result |= bits << shift;
        shift += CHUNK_BITS;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    // zig-zag: low bit carries the sign
    let magnitude = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !magnitude } else { magnitude })
}

fn push_value(out: &mut String, value: i64) {
    let mut v = ((value << 1) ^ (value >> 63)) as u64;
    while v >= CONTINUATION {
        out.push(char::from((CONTINUATION | (v & CHUNK_MASK)) as u8 + OFFSET));
        v >>= CHUNK_BITS;
    }
    out.push(char::from(v as u8 + OFFSET));
}
