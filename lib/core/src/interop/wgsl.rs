use super::{
    blur::BlurParameters, color::ColorEncoding, color_space::ColorParameters,
    filter::FilterParameters, layout::ShaderLayout,
};

/// WGSL struct declarations for every record, for the color encoding `C`.
///
/// Shader sources prepend this so both sides are generated from the same
/// field tables.
pub fn wgsl_prelude<C: ColorEncoding>() -> String {
    let mut out = format!(
        "// Shader interop records, color encoding: {}\n",
        C::KIND
    );
    for decl in [
        ColorParameters::wgsl_struct(),
        FilterParameters::<C>::wgsl_struct(),
        BlurParameters::wgsl_struct(),
    ] {
        out.push('\n');
        out.push_str(&decl);
    }
    out
}

pub fn with_prelude<C: ColorEncoding>(shader_source: &str) -> String {
    let mut out = wgsl_prelude::<C>();
    out.push('\n');
    out.push_str(shader_source);
    out
}
