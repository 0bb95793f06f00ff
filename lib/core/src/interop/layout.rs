use accessible_video_common::{InteropError, Result};
use tracing::debug;

/// One member of a record as both sides must see it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub offset: usize,
    pub size: usize,
    pub wgsl_type: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectedField {
    pub name: String,
    pub offset: usize,
    pub size: Option<usize>,
}

impl ReflectedField {
    pub fn new(name: impl Into<String>, offset: usize) -> Self {
        Self {
            name: name.into(),
            offset,
            size: None,
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }
}

/// Trait implemented by every record uploaded to a shader uniform buffer.
///
/// The field table is the contract: names, byte offsets and sizes must match
/// the WGSL declaration produced by [`ShaderLayout::wgsl_struct`].
pub trait ShaderLayout: bytemuck::Pod {
    const WGSL_NAME: &'static str;

    fn fields() -> Vec<FieldLayout>;

    fn size() -> usize {
        std::mem::size_of::<Self>()
    }

    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    fn wgsl_struct() -> String {
        let mut out = format!("struct {} {{\n", Self::WGSL_NAME);
        for field in Self::fields() {
            out.push_str(&format!("    {}: {},\n", field.name, field.wgsl_type));
        }
        out.push_str("}\n");
        out
    }
}

pub fn log_layout<T: ShaderLayout>() {
    debug!("{} layout:", T::WGSL_NAME);
    for field in T::fields() {
        debug!(
            "  {} at offset {}, size {} ({})",
            field.name, field.offset, field.size, field.wgsl_type
        );
    }
    debug!("  total size: {}", T::size());
}

/// Check a reflected shader struct against the host record.
///
/// Every reflected member must exist on the host at the same offset (and size,
/// when reflection reports one), every host member must be reflected, and the
/// total buffer size must agree.
pub fn verify_reflection<T: ShaderLayout>(
    reflected: &[ReflectedField],
    reflected_size: usize,
) -> Result<()> {
    let record = T::WGSL_NAME;
    let fields = T::fields();

    for member in reflected {
        let Some(field) = fields.iter().find(|f| f.name == member.name) else {
            return Err(InteropError::UnknownField {
                record,
                field: member.name.clone(),
            });
        };
        debug!(
            "Found parameter {} at offset {}",
            member.name, member.offset
        );
        if field.offset != member.offset {
            return Err(InteropError::FieldOffset {
                record,
                field: field.name,
                expected: field.offset,
                found: member.offset,
            });
        }
        if let Some(size) = member.size {
            if size != field.size {
                return Err(InteropError::FieldSize {
                    record,
                    field: field.name,
                    expected: field.size,
                    found: size,
                });
            }
        }
    }

    if let Some(missing) = fields
        .iter()
        .find(|f| !reflected.iter().any(|m| m.name == f.name))
    {
        return Err(InteropError::MissingField {
            record,
            field: missing.name,
        });
    }

    if reflected_size != T::size() {
        return Err(InteropError::RecordSize {
            record,
            expected: T::size(),
            found: reflected_size,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interop::{
        blur::BlurParameters,
        color::{FloatColor, Unorm8Color},
        color_space::ColorParameters,
        filter::FilterParameters,
    };

    fn reflected_filter() -> Vec<ReflectedField> {
        vec![
            ReflectedField::new("primary_color", 0).with_size(16),
            ReflectedField::new("secondary_color", 16),
            ReflectedField::new("low_threshold", 32),
            ReflectedField::new("high_threshold", 36).with_size(4),
        ]
    }

    #[test]
    fn test_matching_reflection_passes() {
        verify_reflection::<FilterParameters<FloatColor>>(&reflected_filter(), 48).unwrap();
        verify_reflection::<ColorParameters>(&[ReflectedField::new("yuv_to_rgb", 0)], 48)
            .unwrap();
        verify_reflection::<BlurParameters>(
            &[
                ReflectedField::new("y_offsets", 48),
                ReflectedField::new("x_offsets", 0),
            ],
            96,
        )
        .unwrap();
    }

    #[test]
    fn test_other_encoding_is_rejected() {
        let err =
            verify_reflection::<FilterParameters<Unorm8Color>>(&reflected_filter(), 48).unwrap_err();
        assert!(matches!(
            err,
            InteropError::FieldSize {
                field: "primary_color",
                expected: 4,
                found: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_field() {
        let mut reflected = reflected_filter();
        reflected.push(ReflectedField::new("tertiary_color", 40));
        let err =
            verify_reflection::<FilterParameters<FloatColor>>(&reflected, 48).unwrap_err();
        assert!(matches!(err, InteropError::UnknownField { ref field, .. } if field == "tertiary_color"));
    }

    #[test]
    fn test_missing_field() {
        let mut reflected = reflected_filter();
        reflected.pop();
        let err = verify_reflection::<FilterParameters<FloatColor>>(&reflected, 48).unwrap_err();
        assert!(matches!(
            err,
            InteropError::MissingField {
                field: "high_threshold",
                ..
            }
        ));
    }

    #[test]
    fn test_offset_mismatch() {
        // Host thresholds first would put them at 0 and 4.
        let reflected = [
            ReflectedField::new("low_threshold", 0),
            ReflectedField::new("high_threshold", 4),
            ReflectedField::new("primary_color", 16),
            ReflectedField::new("secondary_color", 32),
        ];
        let err = verify_reflection::<FilterParameters<FloatColor>>(&reflected, 48).unwrap_err();
        assert!(matches!(
            err,
            InteropError::FieldOffset {
                field: "low_threshold",
                expected: 32,
                found: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_record_size_mismatch() {
        let err = verify_reflection::<ColorParameters>(&[ReflectedField::new("yuv_to_rgb", 0)], 36)
            .unwrap_err();
        assert!(matches!(
            err,
            InteropError::RecordSize {
                expected: 48,
                found: 36,
                ..
            }
        ));
    }

    #[test]
    fn test_wgsl_struct_declaration() {
        assert_eq!(
            BlurParameters::wgsl_struct(),
            "struct BlurParameters {\n    x_offsets: array<vec4<f32>, 3>,\n    y_offsets: array<vec4<f32>, 3>,\n}\n"
        );
    }
}
