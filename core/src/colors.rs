//! Packed 32-bit colors.
//!
//! A packed color is `(alpha << 24) | (red << 16) | (green << 8) | blue`.

/// Packs four 8-bit channels into one color value.
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Splits a packed color into `[r, g, b, a]`.
pub const fn unpack_rgba(color: u32) -> [u8; 4] {
    [
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
        (color >> 24) as u8,
    ]
}

/// Opaque gray with all three color channels set to `intensity`.
pub const fn gray(intensity: u8) -> u32 {
    pack_rgba(intensity, intensity, intensity, 255)
}

/// Background behind the Life board.
pub const LIFE_BACKGROUND: u32 = pack_rgba(20, 20, 20, 255);

/// Gridlines between Life cells.
pub const LIFE_GRIDLINES: u32 = pack_rgba(230, 230, 230, 255);

/// Live Life cells.
pub const LIFE_ALIVE: u32 = pack_rgba(200, 200, 10, 255);

/// Pixels where no ray hits anything.
pub const TRACE_BACKGROUND: u32 = pack_rgba(0, 0, 0, 255);

/// Default fill color of a [`SolidCamera`](crate::scene::SolidCamera).
pub const CAMERA_FILL: u32 = pack_rgba(255, 0, 0, 255);
