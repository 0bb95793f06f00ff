use accessible_video_common::{InteropError, Result};
use std::mem::{offset_of, size_of};
use tracing::warn;

use super::layout::{FieldLayout, ShaderLayout};

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Row-major YUV to RGB matrices for the usual video standards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    Bt709,
    Bt601,
}

impl ColorSpace {
    pub fn matrix(self) -> [[f32; 3]; 3] {
        match self {
            ColorSpace::Bt709 => [
                [1.0, 0.0, 1.5748],
                [1.0, -0.1873, -0.4681],
                [1.0, 1.8556, 0.0],
            ],
            ColorSpace::Bt601 => [
                [1.0, 0.0, 1.402],
                [1.0, -0.344136, -0.714136],
                [1.0, 1.772, 0.0],
            ],
        }
    }

    pub fn color_parameters(self) -> ColorParameters {
        ColorParameters::from_row_major(self.matrix())
    }
}

/// Uniform block for the YUV to RGB stage.
///
/// Matches WGSL `mat3x3<f32>`: three columns, each padded to four floats.
/// The host API is row-major; `yuv_to_rgb[col][row]` is the stored element.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorParameters {
    pub yuv_to_rgb: [[f32; 4]; 3],
}

const _: () = assert!(size_of::<ColorParameters>() == 48);

impl Default for ColorParameters {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorParameters {
    pub fn identity() -> Self {
        Self::from_row_major(IDENTITY)
    }

    pub fn from_row_major(rows: [[f32; 3]; 3]) -> Self {
        let mut yuv_to_rgb = [[0.0; 4]; 3];
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                yuv_to_rgb[c][r] = *value;
            }
        }
        Self { yuv_to_rgb }
    }

    /// Like [`from_row_major`](Self::from_row_major) but rejects NaN and infinities.
    pub fn try_from_row_major(rows: [[f32; 3]; 3]) -> Result<Self> {
        if rows.iter().flatten().any(|v| !v.is_finite()) {
            return Err(InteropError::NonFinite("ColorParameters"));
        }
        Ok(Self::from_row_major(rows))
    }

    pub fn try_from_convolution(values: &[f32]) -> Result<Self> {
        let flat: [f32; 9] = values
            .try_into()
            .map_err(|_| InteropError::ConvolutionLength(values.len()))?;
        Self::try_from_row_major([
            [flat[0], flat[1], flat[2]],
            [flat[3], flat[4], flat[5]],
            [flat[6], flat[7], flat[8]],
        ])
    }

    /// Lenient variant used for catalog data: anything unusable becomes identity.
    pub fn from_convolution(values: &[f32]) -> Self {
        Self::try_from_convolution(values).unwrap_or_else(|err| {
            warn!("Falling back to identity color matrix: {}", err);
            Self::identity()
        })
    }

    /// Panics if `row` or `column` is not below 3.
    pub fn get(&self, row: usize, column: usize) -> f32 {
        assert!(row < 3 && column < 3, "Index out of range");
        self.yuv_to_rgb[column][row]
    }

    pub fn set(&mut self, row: usize, column: usize, value: f32) {
        assert!(row < 3 && column < 3, "Index out of range");
        self.yuv_to_rgb[column][row] = value;
    }

    pub fn row(&self, row: usize) -> [f32; 3] {
        [self.get(row, 0), self.get(row, 1), self.get(row, 2)]
    }

    pub fn to_row_major(&self) -> [[f32; 3]; 3] {
        [self.row(0), self.row(1), self.row(2)]
    }

    pub fn coefficients(&self) -> [f32; 9] {
        let [a, b, c] = self.to_row_major();
        [a[0], a[1], a[2], b[0], b[1], b[2], c[0], c[1], c[2]]
    }

    pub fn packed(&self) -> [f32; 12] {
        bytemuck::cast(self.yuv_to_rgb)
    }
}

impl ShaderLayout for ColorParameters {
    const WGSL_NAME: &'static str = "ColorParameters";

    fn fields() -> Vec<FieldLayout> {
        vec![FieldLayout {
            name: "yuv_to_rgb",
            offset: offset_of!(ColorParameters, yuv_to_rgb),
            size: size_of::<[[f32; 4]; 3]>(),
            wgsl_type: "mat3x3<f32>",
        }]
    }
}
