use thiserror::Error;
#[derive(Error, Debug)]
pub enum InteropError {
    #[error("Low threshold {low} is above high threshold {high}")]
    ThresholdOrder { low: f32, high: f32 },

    #[error("Threshold {0} is outside the normalized range 0..=1")]
    ThresholdRange(f32),

    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("Convolution needs 9 coefficients, got {0}")]
    ConvolutionLength(usize),

    #[error("Invalid texture size {width}x{height}")]
    InvalidTextureSize { width: u32, height: u32 },

    #[error("Unknown field `{field}` in {record}")]
    UnknownField { record: &'static str, field: String },

    #[error("Field `{field}` missing from reflected {record}")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    #[error("Field `{field}` of {record} at offset {found}, expected {expected}")]
    FieldOffset {
        record: &'static str,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Field `{field}` of {record} is {found} bytes, expected {expected}")]
    FieldSize {
        record: &'static str,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{record} is {found} bytes on the shader side, expected {expected}")]
    RecordSize {
        record: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Ring slot {index} out of range (slots: {count})")]
    RingIndex { index: usize, count: usize },

    #[error("Uniform ring of {buffered_frames} frames at alignment {alignment} does not fit in memory")]
    RingLayout {
        buffered_frames: usize,
        alignment: usize,
    },

    #[error("Filter catalog error: {0}")]
    Catalog(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InteropError>;
