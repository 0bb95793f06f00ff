use accessible_video_common::{InteropError, Result};
use std::mem::{offset_of, size_of};

use super::{
    color::{ColorEncoding, FloatColor, Rgba, Unorm8Color},
    layout::{FieldLayout, ShaderLayout},
};

/// Uniform block for the edge/threshold filter passes.
///
/// Field order follows the shader declaration: both colors first, then the
/// two thresholds. `_tail` pads the record to the 16-byte multiple WGSL
/// rounds uniform structs up to.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterParameters<C: ColorEncoding> {
    pub primary_color: C,
    pub secondary_color: C,
    pub low_threshold: f32,
    pub high_threshold: f32,
    pub _tail: C::Tail,
}

// SAFETY: `ColorEncoding` is sealed to `Unorm8Color` and `FloatColor`, both
// Pod, 4-byte multiples with alignment <= 4, so every field starts on a
// 4-byte boundary and the record has no implicit padding. `C::Tail` is Pod.
unsafe impl<C: ColorEncoding> bytemuck::Zeroable for FilterParameters<C> {}
unsafe impl<C: ColorEncoding> bytemuck::Pod for FilterParameters<C> {}

const _: () = assert!(size_of::<FilterParameters<Unorm8Color>>() == 16);
const _: () = assert!(size_of::<FilterParameters<FloatColor>>() == 48);

impl<C: ColorEncoding> FilterParameters<C> {
    /// Validating constructor: thresholds must be finite, within `0..=1`
    /// and ordered `low <= high`.
    pub fn new(primary: Rgba, secondary: Rgba, low: f32, high: f32) -> Result<Self> {
        for threshold in [low, high] {
            if !threshold.is_finite() {
                return Err(InteropError::NonFinite("FilterParameters threshold"));
            }
            if !(0.0..=1.0).contains(&threshold) {
                return Err(InteropError::ThresholdRange(threshold));
            }
        }
        if low > high {
            return Err(InteropError::ThresholdOrder { low, high });
        }
        Ok(Self::new_unchecked(primary, secondary, low, high))
    }

    pub fn new_unchecked(primary: Rgba, secondary: Rgba, low: f32, high: f32) -> Self {
        Self::from_encoded(C::encode(primary), C::encode(secondary), low, high)
    }

    pub fn from_encoded(primary: C, secondary: C, low: f32, high: f32) -> Self {
        Self {
            primary_color: primary,
            secondary_color: secondary,
            low_threshold: low,
            high_threshold: high,
            _tail: bytemuck::Zeroable::zeroed(),
        }
    }

    pub fn primary(&self) -> Rgba {
        self.primary_color.decode()
    }

    pub fn secondary(&self) -> Rgba {
        self.secondary_color.decode()
    }

    pub fn thresholds(&self) -> (f32, f32) {
        (self.low_threshold, self.high_threshold)
    }
}

impl<C: ColorEncoding> ShaderLayout for FilterParameters<C> {
    const WGSL_NAME: &'static str = "FilterParameters";

    fn fields() -> Vec<FieldLayout> {
        let color_type = C::KIND.wgsl_type();
        vec![
            FieldLayout {
                name: "primary_color",
                offset: offset_of!(FilterParameters<C>, primary_color),
                size: size_of::<C>(),
                wgsl_type: color_type,
            },
            FieldLayout {
                name: "secondary_color",
                offset: offset_of!(FilterParameters<C>, secondary_color),
                size: size_of::<C>(),
                wgsl_type: color_type,
            },
            FieldLayout {
                name: "low_threshold",
                offset: offset_of!(FilterParameters<C>, low_threshold),
                size: size_of::<f32>(),
                wgsl_type: "f32",
            },
            FieldLayout {
                name: "high_threshold",
                offset: offset_of!(FilterParameters<C>, high_threshold),
                size: size_of::<f32>(),
                wgsl_type: "f32",
            },
        ]
    }
}
