pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Quantize a `[0, 1]` weight to `0..=255`.
pub(crate) fn unit_to_u8_weight(t: f64) -> u16 {
    ((t.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

/// Blend two channels with an 8-bit weight: `a * (255 - w) + b * w`, rounded.
pub(crate) fn mix_u8(a: u8, b: u8, w: u16) -> u8 {
    let inv = 255u16 - w;
    (mul_div255_u16(u16::from(a), inv) + mul_div255_u16(u16::from(b), w)).min(255) as u8
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
