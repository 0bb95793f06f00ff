use std::fmt::{self, Debug};

/// Semantic RGBA color on the host, channels nominally in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Rgba = Rgba::new(0.0, 1.0, 0.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color with every RGB channel flipped around 1.0, alpha untouched.
    pub fn inverse(self) -> Self {
        Self {
            r: 1.0 - self.r,
            g: 1.0 - self.g,
            b: 1.0 - self.b,
            a: self.a,
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            r: clamp_unit(self.r),
            g: clamp_unit(self.g),
            b: clamp_unit(self.b),
            a: clamp_unit(self.a),
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Rgba {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

// NaN clamps to 0 so it never reaches the u8 cast as garbage.
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorEncodingKind {
    /// Four 8-bit channels packed into one `u32`, unpacked with `unpack4x8unorm`.
    Unorm8,
    /// Four `f32` channels in `0..=1`, read as `vec4<f32>`.
    Float,
}

impl ColorEncodingKind {
    pub fn wgsl_type(self) -> &'static str {
        match self {
            ColorEncodingKind::Unorm8 => "u32",
            ColorEncodingKind::Float => "vec4<f32>",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorEncodingKind::Unorm8 => "unorm8",
            ColorEncodingKind::Float => "float",
        }
    }
}

impl fmt::Display for ColorEncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Unorm8Color {}
    impl Sealed for super::FloatColor {}
}

/// A concrete GPU encoding of [`Rgba`].
///
/// Sealed: the records embedding a `ColorEncoding` rely on every implementor
/// being 4-byte sized with alignment of at most 4, and on `Tail` filling the
/// record up to the 16-byte struct size WGSL expects.
pub trait ColorEncoding:
    sealed::Sealed + bytemuck::Pod + Debug + PartialEq + Send + Sync + 'static
{
    const KIND: ColorEncodingKind;

    type Tail: bytemuck::Pod + Debug + PartialEq + Send + Sync;

    fn encode(color: Rgba) -> Self;
    fn decode(self) -> Rgba;
}

/// 8 bits per channel, r in the lowest byte.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Unorm8Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Unorm8Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn packed(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }
}

impl ColorEncoding for Unorm8Color {
    const KIND: ColorEncodingKind = ColorEncodingKind::Unorm8;
    type Tail = [u32; 0];

    fn encode(color: Rgba) -> Self {
        let c = color.clamped();
        // Truncating, not rounding: 0.75 becomes 191.
        Self {
            r: (c.r * 255.0) as u8,
            g: (c.g * 255.0) as u8,
            b: (c.b * 255.0) as u8,
            a: (c.a * 255.0) as u8,
        }
    }

    fn decode(self) -> Rgba {
        Rgba::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FloatColor(pub [f32; 4]);

impl ColorEncoding for FloatColor {
    const KIND: ColorEncodingKind = ColorEncodingKind::Float;
    type Tail = [u32; 2];

    fn encode(color: Rgba) -> Self {
        Self(color.clamped().to_array())
    }

    fn decode(self) -> Rgba {
        Rgba::from(self.0)
    }
}

const _: () = assert!(std::mem::size_of::<Unorm8Color>() == 4);
const _: () = assert!(std::mem::size_of::<FloatColor>() == 16);
const _: () = assert!(std::mem::align_of::<FloatColor>() == 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_red_unorm8_bits() {
        let red = Unorm8Color::encode(Rgba::RED);
        assert_eq!(bytemuck::bytes_of(&red), &[0xFF, 0x00, 0x00, 0xFF]);
        assert_eq!(red.packed(), 0xFF00_00FF);
    }

    #[test]
    fn test_full_red_float_bits() {
        let red = FloatColor::encode(Rgba::RED);
        let words: [u32; 4] = bytemuck::cast(red);
        assert_eq!(words, [0x3F80_0000, 0, 0, 0x3F80_0000]);
    }

    #[test]
    fn test_unorm8_truncates_like_the_shader_upload() {
        let c = Unorm8Color::encode(Rgba::new(0.0, 1.0, 1.0, 0.75));
        assert_eq!(c, Unorm8Color::new(0, 255, 255, 191));
    }

    #[test]
    fn test_encode_clamps_out_of_range() {
        let c = Unorm8Color::encode(Rgba::new(-0.5, 2.0, f32::NAN, 1.0));
        assert_eq!(c, Unorm8Color::new(0, 255, 0, 255));

        let f = FloatColor::encode(Rgba::new(-0.5, 2.0, 0.25, 1.0));
        assert_eq!(f.0, [0.0, 1.0, 0.25, 1.0]);
    }

    #[test]
    fn test_decode_unorm8() {
        let c = Unorm8Color::new(255, 0, 51, 255).decode();
        assert_eq!(c, Rgba::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn test_inverse_keeps_alpha() {
        let c = Rgba::new(0.0, 1.0, 0.25, 0.75).inverse();
        assert_eq!(c, Rgba::new(1.0, 0.0, 0.75, 0.75));
    }

    #[test]
    fn test_encoding_kind_wgsl_types() {
        assert_eq!(Unorm8Color::KIND.wgsl_type(), "u32");
        assert_eq!(FloatColor::KIND.wgsl_type(), "vec4<f32>");
        assert_eq!(ColorEncodingKind::Float.to_string(), "float");
    }
}
