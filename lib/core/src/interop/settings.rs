use bon::Builder;

use super::{
    color::{ColorEncoding, Rgba},
    filter::FilterParameters,
};

pub const DEFAULT_PRIMARY: Rgba = Rgba::new(0.0, 1.0, 1.0, 0.75);
pub const DEFAULT_SECONDARY: Rgba = Rgba::new(1.0, 0.0, 1.0, 0.75);

/// Edge thresholds used when the device runs the high quality blur.
pub const HIGH_QUALITY_THRESHOLDS: (f32, f32) = (0.05, 0.10);
pub const STANDARD_THRESHOLDS: (f32, f32) = (0.15, 0.25);

#[derive(Builder, Clone, Copy, Debug, PartialEq)]
pub struct FilterSettings {
    #[builder(default = DEFAULT_PRIMARY)]
    pub primary_color: Rgba,
    #[builder(default = DEFAULT_SECONDARY)]
    pub secondary_color: Rgba,
    #[builder(default)]
    pub invert: bool,
    #[builder(default)]
    pub high_quality: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FilterSettings {
    pub fn thresholds(&self) -> (f32, f32) {
        if self.high_quality {
            HIGH_QUALITY_THRESHOLDS
        } else {
            STANDARD_THRESHOLDS
        }
    }

    /// Inverted output renders the inverse colors so they come out right
    /// after the screen is flipped.
    pub fn to_parameters<C: ColorEncoding>(&self) -> FilterParameters<C> {
        let (primary, secondary) = if self.invert {
            (self.primary_color.inverse(), self.secondary_color.inverse())
        } else {
            (self.primary_color, self.secondary_color)
        };
        let (low, high) = self.thresholds();
        FilterParameters::new_unchecked(primary, secondary, low, high)
    }
}
