use accessible_video_common::Result;
use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Deserialize};
use std::path::Path;
use tracing::{debug, info, warn};

use super::color_space::ColorParameters;

pub const DEFAULT_COLOR_SHADER: &str = "yuv_rgb";
pub const DEFAULT_PASS: &str = "blit";
const INVALID_FILTER: &str = "Invalid Filter";

fn identity_convolution() -> [f32; 9] {
    ColorParameters::identity().coefficients()
}

// Optional fields fall back to their default when the type is wrong; only a
// missing or non-string `name` makes the whole entry unusable.
fn lenient<T: DeserializeOwned>(
    filter: &str,
    field: &str,
    value: Option<toml::Value>,
) -> Option<T> {
    match value?.try_into() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!("Filter {} has unusable {}, using default: {}", filter, field, err);
            None
        }
    }
}

pub trait Filter: Sized {
    fn name(&self) -> &str;

    /// Placeholder used when a catalog section has no usable entry.
    fn fallback() -> Self;

    fn from_value(value: toml::Value) -> std::result::Result<Self, toml::de::Error>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputFilter {
    pub name: String,
    pub shader: String,
    /// Row-major, always nine entries.
    pub convolution: [f32; 9],
}

impl InputFilter {
    pub fn color_parameters(&self) -> ColorParameters {
        ColorParameters::from_convolution(&self.convolution)
    }
}

#[derive(Deserialize)]
struct InputFilterDef {
    name: String,
    shader: Option<toml::Value>,
    convolution: Option<toml::Value>,
}

impl Filter for InputFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn fallback() -> Self {
        Self {
            name: INVALID_FILTER.to_string(),
            shader: DEFAULT_COLOR_SHADER.to_string(),
            convolution: identity_convolution(),
        }
    }

    fn from_value(value: toml::Value) -> std::result::Result<Self, toml::de::Error> {
        let def: InputFilterDef = value.try_into()?;
        let convolution = match lenient::<Vec<f32>>(&def.name, "convolution", def.convolution) {
            Some(values) => values.as_slice().try_into().unwrap_or_else(|_| {
                warn!(
                    "Filter {} has {} convolution values, using identity",
                    def.name,
                    values.len()
                );
                identity_convolution()
            }),
            None => identity_convolution(),
        };
        Ok(Self {
            shader: lenient(&def.name, "shader", def.shader)
                .unwrap_or_else(|| DEFAULT_COLOR_SHADER.to_string()),
            name: def.name,
            convolution,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VideoFilter {
    pub name: String,
    pub can_use_blur: bool,
    pub passes: Vec<String>,
}

#[derive(Deserialize)]
struct VideoFilterDef {
    name: String,
    can_use_blur: Option<toml::Value>,
    passes: Option<toml::Value>,
}

impl Filter for VideoFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn fallback() -> Self {
        Self {
            name: INVALID_FILTER.to_string(),
            can_use_blur: false,
            passes: vec![DEFAULT_PASS.to_string()],
        }
    }

    fn from_value(value: toml::Value) -> std::result::Result<Self, toml::de::Error> {
        let def: VideoFilterDef = value.try_into()?;
        Ok(Self {
            can_use_blur: lenient(&def.name, "can_use_blur", def.can_use_blur).unwrap_or(false),
            passes: lenient(&def.name, "passes", def.passes)
                .unwrap_or_else(|| vec![DEFAULT_PASS.to_string()]),
            name: def.name,
        })
    }
}

/// Ordered, never-empty list of filters with a cursor for cycling.
///
/// Every entry is kept for cycling, duplicates included; lookup by name
/// resolves to the last entry with that name.
#[derive(Clone, Debug)]
pub struct FilterList<F> {
    filters: Vec<F>,
    by_name: IndexMap<String, usize>,
    current: usize,
}

impl<F: Filter> FilterList<F> {
    /// Entries without a usable name are skipped. An empty result holds
    /// [`Filter::fallback`].
    pub fn from_values(values: Vec<toml::Value>) -> Self {
        let mut filters = Vec::with_capacity(values.len());
        for value in values {
            let label = value
                .get("name")
                .and_then(|n| n.as_str())
                .map(str::to_owned);
            match F::from_value(value) {
                Ok(filter) => {
                    debug!("Loaded definition for filter {}", filter.name());
                    filters.push(filter);
                }
                Err(err) => warn!("Skipping malformed filter {:?}: {}", label, err),
            }
        }
        if filters.is_empty() {
            filters.push(F::fallback());
        }

        let mut by_name = IndexMap::with_capacity(filters.len());
        for (index, filter) in filters.iter().enumerate() {
            if by_name.insert(filter.name().to_string(), index).is_some() {
                warn!("Duplicate filter {}, lookups use the later entry", filter.name());
            }
        }

        Self {
            filters,
            by_name,
            current: 0,
        }
    }

    pub fn get(&self, name: &str) -> Option<&F> {
        self.by_name.get(name).map(|&index| &self.filters[index])
    }

    /// Move the cursor to the first entry called `name`; returns false and
    /// leaves it alone if absent.
    pub fn select(&mut self, name: &str) -> bool {
        match self.filters.iter().position(|f| f.name() == name) {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> &F {
        &self.filters[self.current]
    }

    pub fn next(&mut self) -> &F {
        self.current = (self.current + 1) % self.filters.len();
        self.current()
    }

    pub fn prev(&mut self) -> &F {
        self.current = (self.current + self.filters.len() - 1) % self.filters.len();
        self.current()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|f| f.name())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    video: Vec<toml::Value>,
    input: Vec<toml::Value>,
}

#[derive(Clone, Debug)]
pub struct FilterCatalog {
    pub video: FilterList<VideoFilter>,
    pub input: FilterList<InputFilter>,
}

impl FilterCatalog {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(source)?;
        let catalog = Self {
            video: FilterList::from_values(file.video),
            input: FilterList::from_values(file.input),
        };
        info!(
            "Filter catalog loaded: {} video filters, {} input filters",
            catalog.video.len(),
            catalog.input.len()
        );
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading filter catalog from {}", path.display());
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessible_video_common::InteropError;
    use std::io::Write;

    const CATALOG: &str = r#"
[[video]]
name = "Edges"
can_use_blur = true
passes = ["sobel", "canny"]

[[video]]
name = "Passthrough"

[[video]]
can_use_blur = true

[[input]]
name = "Full Color"

[[input]]
name = "Protanopia"
shader = "yuv_daltonize"
convolution = [0.567, 0.433, 0.0, 0.558, 0.442, 0.0, 0.0, 0.242, 0.758]

[[input]]
name = "Short"
convolution = [1.0, 2.0]
"#;

    #[test]
    fn test_parses_entries_and_defaults() {
        let catalog = FilterCatalog::from_toml_str(CATALOG).unwrap();

        assert_eq!(catalog.video.len(), 2);
        let edges = catalog.video.get("Edges").unwrap();
        assert!(edges.can_use_blur);
        assert_eq!(edges.passes, vec!["sobel", "canny"]);
        let passthrough = catalog.video.get("Passthrough").unwrap();
        assert!(!passthrough.can_use_blur);
        assert_eq!(passthrough.passes, vec![DEFAULT_PASS]);

        let full = catalog.input.get("Full Color").unwrap();
        assert_eq!(full.shader, DEFAULT_COLOR_SHADER);
        assert_eq!(full.convolution, identity_convolution());
    }

    #[test]
    fn test_bad_convolution_becomes_identity() {
        let catalog = FilterCatalog::from_toml_str(CATALOG).unwrap();
        let short = catalog.input.get("Short").unwrap();
        assert_eq!(short.convolution, identity_convolution());
        assert_eq!(short.color_parameters(), ColorParameters::identity());
    }

    #[test]
    fn test_input_filter_color_parameters() {
        let catalog = FilterCatalog::from_toml_str(CATALOG).unwrap();
        let filter = catalog.input.get("Protanopia").unwrap();
        assert_eq!(filter.shader, "yuv_daltonize");
        let params = filter.color_parameters();
        assert_eq!(params.row(0), [0.567, 0.433, 0.0]);
        assert_eq!(params.row(2), [0.0, 0.242, 0.758]);
    }

    #[test]
    fn test_cycling_wraps_both_ways() {
        let mut catalog = FilterCatalog::from_toml_str(CATALOG).unwrap();
        let input = &mut catalog.input;
        assert_eq!(input.current().name, "Full Color");
        assert_eq!(input.next().name, "Protanopia");
        assert_eq!(input.next().name, "Short");
        assert_eq!(input.next().name, "Full Color");
        assert_eq!(input.prev().name, "Short");
    }

    #[test]
    fn test_select_by_name() {
        let mut catalog = FilterCatalog::from_toml_str(CATALOG).unwrap();
        assert!(catalog.video.select("Passthrough"));
        assert_eq!(catalog.video.current().name, "Passthrough");
        assert!(!catalog.video.select("Missing"));
        assert_eq!(catalog.video.current().name, "Passthrough");
    }

    #[test]
    fn test_empty_section_gets_fallback() {
        let catalog = FilterCatalog::from_toml_str("video = []\ninput = []\n").unwrap();
        assert_eq!(catalog.video.len(), 1);
        assert_eq!(catalog.video.current(), &VideoFilter::fallback());
        assert_eq!(catalog.input.current().shader, DEFAULT_COLOR_SHADER);
    }

    #[test]
    fn test_missing_section_is_an_error() {
        let err = FilterCatalog::from_toml_str("video = []\n").unwrap_err();
        assert!(matches!(err, InteropError::Catalog(_)));
    }

    #[test]
    fn test_wrong_field_types_keep_the_entry() {
        let source = r#"
[[video]]
name = "Edges"
can_use_blur = "yes"
passes = "sobel"

[[video]]
name = "Other"

[[input]]
name = "Gray"
shader = 7
convolution = ["a", "b"]
"#;
        let catalog = FilterCatalog::from_toml_str(source).unwrap();

        assert_eq!(catalog.video.names().collect::<Vec<_>>(), ["Edges", "Other"]);
        let edges = catalog.video.get("Edges").unwrap();
        assert!(!edges.can_use_blur);
        assert_eq!(edges.passes, vec![DEFAULT_PASS]);

        assert_eq!(catalog.input.names().collect::<Vec<_>>(), ["Gray"]);
        let gray = catalog.input.current();
        assert_eq!(gray.shader, DEFAULT_COLOR_SHADER);
        assert_eq!(gray.convolution, identity_convolution());
    }

    #[test]
    fn test_non_string_name_is_skipped() {
        let source = "input = []\n\n[[video]]\nname = 3\n\n[[video]]\nname = \"Kept\"\n";
        let catalog = FilterCatalog::from_toml_str(source).unwrap();
        assert_eq!(catalog.video.names().collect::<Vec<_>>(), ["Kept"]);
    }

    #[test]
    fn test_integer_convolution_values() {
        let source = r#"
video = []

[[input]]
name = "Swap"
convolution = [0, 1, 0, 1, 0, 0, 0, 0, 1]
"#;
        let catalog = FilterCatalog::from_toml_str(source).unwrap();
        let params = catalog.input.current().color_parameters();
        assert_eq!(params.row(0), [0.0, 1.0, 0.0]);
        assert_eq!(params.row(1), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_non_finite_convolution_uses_identity() {
        let source = r#"
video = []

[[input]]
name = "Broken"
convolution = [nan, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, inf]
"#;
        let catalog = FilterCatalog::from_toml_str(source).unwrap();
        let broken = catalog.input.current();
        assert!(broken.convolution[0].is_nan());
        assert_eq!(broken.color_parameters(), ColorParameters::identity());
    }

    #[test]
    fn test_duplicate_names_are_all_cycled() {
        let source = r#"
input = []

[[video]]
name = "Edges"
passes = ["sobel"]

[[video]]
name = "Blit"

[[video]]
name = "Edges"
passes = ["canny"]
"#;
        let mut catalog = FilterCatalog::from_toml_str(source).unwrap();
        let video = &mut catalog.video;
        assert_eq!(video.len(), 3);
        assert_eq!(video.current().passes, vec!["sobel"]);
        assert_eq!(video.next().name, "Blit");
        assert_eq!(video.next().passes, vec!["canny"]);
        assert_eq!(video.next().passes, vec!["sobel"]);

        assert_eq!(video.get("Edges").unwrap().passes, vec!["canny"]);
        assert!(video.select("Edges"));
        assert_eq!(video.current().passes, vec!["sobel"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        let catalog = FilterCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.input.len(), 3);

        let missing = FilterCatalog::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(InteropError::Io(_))));
    }
}
