//! Deterministic territory colors
//!
//! A name is hashed with MD5; the first three digest bytes become the
//! red, green and blue channels, folded into 50..=199 so the map editor never
//! shows near-black or blown-out territories. Alpha is fixed at 192.

use md5::{Digest, Md5};

/// Fixed alpha channel (slightly translucent)
pub const ALPHA: u32 = 192;

/// Lowest channel value produced
pub const CHANNEL_MIN: u32 = 50;

/// Width of the channel range (`CHANNEL_MIN..CHANNEL_MIN + CHANNEL_SPAN`)
pub const CHANNEL_SPAN: u32 = 150;

/// Suffix attempts before accepting a colliding color
pub const MAX_NUDGE_ATTEMPTS: usize = 10;

/// Packed ARGB color for a name
pub fn name_to_color(name: &str) -> u32 {
    let digest = Md5::digest(name.as_bytes());
    let channel = |byte: u8| CHANNEL_MIN + (byte as u32 % CHANNEL_SPAN);

    (ALPHA << 24) | (channel(digest[0]) << 16) | (channel(digest[1]) << 8) | channel(digest[2])
}

/// Color for `name`, nudged away from the colors of `existing_names`
///
/// On collision a `_` is appended to the name and the color recomputed, at
/// most [`MAX_NUDGE_ATTEMPTS`] times. The last candidate is returned even if
/// it still collides.
pub fn generate_color<S: AsRef<str>>(name: &str, existing_names: &[S]) -> u32 {
    let used: Vec<u32> = existing_names
        .iter()
        .map(|n| name_to_color(n.as_ref()))
        .collect();

    let mut candidate = name.to_string();
    let mut color = name_to_color(&candidate);
    let mut attempts = 0;
    while used.contains(&color) && attempts < MAX_NUDGE_ATTEMPTS {
        candidate.push('_');
        color = name_to_color(&candidate);
        attempts += 1;
    }
    color
}

/// Split a packed color into `(a, r, g, b)`
pub fn channels(argb: u32) -> (u32, u32, u32, u32) {
    (argb >> 24, (argb >> 16) & 0xFF, (argb >> 8) & 0xFF, argb & 0xFF)
}
