/// Hue, saturation and value, each nominally in `[0.0, 1.0]`.
///
/// Saturation may leave that range after scaling; conversions back to RGB do
/// not clamp it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// Converts 8-bit-range RGB channels (`0.0..=255.0`) to HSV using the
/// hexagonal max/min formula.
pub fn rgb_to_hsv(rgb: [f32; 3]) -> Hsv {
    let [r, g, b] = rgb.map(|channel| channel / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0.0 { 0.0 } else { delta / max };

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsv { h: h / 6.0, s, v: max }
}

/// Converts HSV back to RGB channels scaled to `0.0..=255.0`.
///
/// Out-of-range saturation produces out-of-range channels.
pub fn hsv_to_rgb(hsv: Hsv) -> [f32; 3] {
    let Hsv { h, s, v } = hsv;
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    [r * 255.0, g * 255.0, b * 255.0]
}
