use accessible_video_common::{InteropError, Result};
use std::mem::{offset_of, size_of};

use super::layout::{FieldLayout, ShaderLayout};

pub const BLUR_TAPS: usize = 3;

/// Tap distances in texels for a 9-tap gaussian sampled with bilinear filtering.
pub const LINEAR_GAUSSIAN_TAPS: [f32; BLUR_TAPS] = [0.0, 1.384_615_4, 3.230_769_2];

/// One sampling displacement in texture coordinates.
///
/// Stored with two trailing floats because uniform-buffer arrays use a
/// 16-byte element stride; the shader reads `.xy`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
    _pad: [f32; 2],
}

impl Offset {
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            _pad: [0.0; 2],
        }
    }

    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl From<(f32, f32)> for Offset {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlurParameters {
    pub x_offsets: [Offset; BLUR_TAPS],
    pub y_offsets: [Offset; BLUR_TAPS],
}

const _: () = assert!(size_of::<Offset>() == 16);
const _: () = assert!(size_of::<BlurParameters>() == 96);

impl BlurParameters {
    pub fn new(x_offsets: [(f32, f32); BLUR_TAPS], y_offsets: [(f32, f32); BLUR_TAPS]) -> Self {
        Self {
            x_offsets: x_offsets.map(Offset::from),
            y_offsets: y_offsets.map(Offset::from),
        }
    }

    /// Offsets for a blur over a `width` x `height` texture: each tap distance
    /// scaled by the texel size, horizontal taps on x, vertical taps on y.
    pub fn linear_gaussian(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(InteropError::InvalidTextureSize { width, height });
        }
        let texel_width = 1.0 / width as f32;
        let texel_height = 1.0 / height as f32;

        Ok(Self {
            x_offsets: LINEAR_GAUSSIAN_TAPS.map(|d| Offset::new(d * texel_width, 0.0)),
            y_offsets: LINEAR_GAUSSIAN_TAPS.map(|d| Offset::new(0.0, d * texel_height)),
        })
    }

    pub fn x(&self) -> [(f32, f32); BLUR_TAPS] {
        self.x_offsets.map(|o| o.xy())
    }

    pub fn y(&self) -> [(f32, f32); BLUR_TAPS] {
        self.y_offsets.map(|o| o.xy())
    }
}

impl ShaderLayout for BlurParameters {
    const WGSL_NAME: &'static str = "BlurParameters";

    fn fields() -> Vec<FieldLayout> {
        vec![
            FieldLayout {
                name: "x_offsets",
                offset: offset_of!(BlurParameters, x_offsets),
                size: size_of::<[Offset; BLUR_TAPS]>(),
                wgsl_type: "array<vec4<f32>, 3>",
            },
            FieldLayout {
                name: "y_offsets",
                offset: offset_of!(BlurParameters, y_offsets),
                size: size_of::<[Offset; BLUR_TAPS]>(),
                wgsl_type: "array<vec4<f32>, 3>",
            },
        ]
    }
}
