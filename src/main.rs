use accessible_video_core::interop::{
    layout::log_layout, wgsl::wgsl_prelude, BlurParameters, ColorEncoding, ColorParameters,
    FilterCatalog, FilterParameters, FilterSettings, FloatColor, ShaderLayout, Unorm8Color,
};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CATALOG: &str = "assets/filters.toml";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let Options {
        catalog_path,
        unorm8,
    } = parse_args(std::env::args().skip(1))?;

    let catalog = FilterCatalog::load(&catalog_path)
        .with_context(|| format!("loading filter catalog {}", catalog_path))?;
    for name in catalog.video.names() {
        info!("Video filter: {}", name);
    }

    if unorm8 {
        report::<Unorm8Color>(&catalog)
    } else {
        report::<FloatColor>(&catalog)
    }
}

#[derive(Debug, PartialEq)]
struct Options {
    catalog_path: String,
    unorm8: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Options> {
    let mut options = Options {
        catalog_path: DEFAULT_CATALOG.to_string(),
        unorm8: false,
    };
    for arg in args {
        if arg == "--unorm8" {
            options.unorm8 = true;
        } else if arg.starts_with("--") {
            anyhow::bail!(
                "unknown option {} (usage: accessible-video [--unorm8] [CATALOG])",
                arg
            );
        } else {
            options.catalog_path = arg;
        }
    }
    Ok(options)
}

fn report<C: ColorEncoding>(catalog: &FilterCatalog) -> anyhow::Result<()> {
    info!("Color encoding: {}", C::KIND);

    log_layout::<ColorParameters>();
    log_layout::<FilterParameters<C>>();
    log_layout::<BlurParameters>();

    let input = catalog.input.current();
    let color = input.color_parameters();
    info!(
        "Input filter {} ({}): {:?}",
        input.name,
        input.shader,
        color.coefficients()
    );

    let filter = FilterSettings::default().to_parameters::<C>();
    info!(
        "Filter parameters: {} bytes, thresholds {:?}",
        filter.as_bytes().len(),
        filter.thresholds()
    );

    let blur = BlurParameters::linear_gaussian(1920, 1080).context("building blur offsets")?;
    info!("Blur x offsets: {:?}", blur.x());

    println!("{}", wgsl_prelude::<C>());
    Ok(())
}
