//! Encoded polyline geometry.
//!
//! Routing engines return route shapes in the signed-delta polyline
//! format at 1e-5 precision: each coordinate is the difference from the
//! previous one, zig-zag encoded and split into 5-bit chunks offset by 63.

use crate::domain::GeoPoint;

const PRECISION: f64 = 1e5;

/// Decode a polyline into points, in encoding order.
///
/// Malformed input (bad characters, a truncated value, an unpaired
/// latitude, coordinates out of range) yields an empty vector: callers
/// treat that as "no route geometry available".
///
/// # Examples
///
/// ```
/// use hos_server::route::decode_polyline;
///
/// let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// assert_eq!(points.len(), 3);
/// assert_eq!(points[0].latitude(), 38.5);
///
/// assert!(decode_polyline("_p~iF~ps|U_ulL").is_empty());
/// ```
pub fn decode_polyline(encoded: &str) -> Vec<GeoPoint> {
    try_decode(encoded).unwrap_or_default()
}

fn try_decode(encoded: &str) -> Option<Vec<GeoPoint>> {
    let mut bytes = encoded.bytes();
    let mut points = Vec::new();
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while let Some(lat_delta) = next_value(&mut bytes)? {
        let lng_delta = next_value(&mut bytes)??;
        lat += lat_delta;
        lng += lng_delta;
        let point = GeoPoint::new(lat as f64 / PRECISION, lng as f64 / PRECISION).ok()?;
        points.push(point);
    }

    Some(points)
}

/// Read one zig-zag value.
///
/// `None` means malformed input, `Some(None)` means clean end of input.
fn next_value(bytes: &mut impl Iterator<Item = u8>) -> Option<Option<i64>> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let Some(byte) = bytes.next() else {
            // End of input is only clean between values.
            return if shift == 0 { Some(None) } else { None };
        };
        if !(63..=126).contains(&byte) {
            return None;
        }
        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
        if shift > 60 {
            return None;
        }
    }

    let value = if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Some(Some(value))
}

/// Encode points as a polyline at 1e-5 precision.
pub fn encode_polyline(points: &[GeoPoint]) -> String {
    let mut out = String::new();
    let mut prev_lat = 0;
    let mut prev_lng = 0;

    for point in points {
        let lat = (point.latitude() * PRECISION).round() as i64;
        let lng = (point.longitude() * PRECISION).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn push_value(out: &mut String, value: i64) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push(char::from((0x20 | (v & 0x1f)) as u8 + 63));
        v >>= 5;
    }
    out.push(char::from(v as u8 + 63));
}
