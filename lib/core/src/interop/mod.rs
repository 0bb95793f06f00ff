pub mod blur;
pub mod catalog;
pub mod color;
pub mod color_space;
pub mod filter;
pub mod layout;
pub mod ring;
pub mod settings;
pub mod wgsl;

pub use blur::{BlurParameters, Offset, BLUR_TAPS};
pub use catalog::{FilterCatalog, FilterList, InputFilter, VideoFilter};
pub use color::{ColorEncoding, ColorEncodingKind, FloatColor, Rgba, Unorm8Color};
pub use color_space::{ColorParameters, ColorSpace};
pub use filter::FilterParameters;
pub use layout::{verify_reflection, FieldLayout, ReflectedField, ShaderLayout};
pub use ring::UniformRing;
pub use settings::FilterSettings;
