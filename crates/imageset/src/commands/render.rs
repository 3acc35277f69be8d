//! `imageset render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use imageset_config::{CliSettings, Config};
use imageset_fs::FsFileLookup;
use imageset_tag::{
    HtmlBackend, ResolverConfig, SizePreset, SrcsetRenderer, TagProcessor, TagResolver,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Text file containing image tags.
    input: PathBuf,

    /// Path to configuration file (default: auto-discover imageset.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory that image locators resolve against (default: input's directory).
    #[arg(long)]
    page_dir: Option<PathBuf>,

    /// Content root for image files (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Wrap every image in a figure (overrides config).
    #[arg(long)]
    figure: bool,

    /// Default size spec: preset name or width list (overrides config).
    #[arg(long)]
    size: Option<String>,

    /// Site base URL (overrides config).
    #[arg(long, env = "IMAGESET_SITE_URL")]
    site_url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading input, file lookup or
    /// writing output fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_url: self.site_url,
            content_dir: self.content_dir,
            figure: self.figure.then_some(true),
            default_size: self.size,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let text = std::fs::read_to_string(&self.input)?;
        let page_dir = self
            .page_dir
            .unwrap_or_else(|| default_page_dir(&self.input));

        let (rendered, warnings) = render(&config, &page_dir, &text)?;

        for warning in &warnings {
            output.warning(&format!("{}: {warning}", self.input.display()));
        }

        if let Some(path) = &self.output {
            std::fs::write(path, &rendered)?;
            output.success(&format!("Wrote {}", path.display()));
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }

        Ok(())
    }
}

/// Directory of the input file, or `.` for bare file names.
fn default_page_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Build the srcset renderer from configured thumbnails and presets.
fn srcset_renderer(config: &Config) -> SrcsetRenderer {
    config.sizes.iter().fold(
        SrcsetRenderer::new(config.thumbs.url.clone()),
        |renderer, (name, size)| {
            let mut preset = SizePreset::new(size.widths.clone());
            preset.sizes.clone_from(&size.sizes);
            renderer.with_preset(name.clone(), preset)
        },
    )
}

/// Expand the tags in `text`, returning the output and processor warnings.
fn render(config: &Config, page_dir: &Path, text: &str) -> Result<(String, Vec<String>), CliError> {
    let site_url = &config.site_resolved.url;
    let lookup = FsFileLookup::new(&config.site_resolved.content_dir, page_dir, site_url.clone());
    let backend = HtmlBackend::new(site_url.clone());
    let srcset = srcset_renderer(config);
    let resolver_config = ResolverConfig {
        figure: config.tag.figure,
        default_size: config.tag.default_size.clone(),
    };

    let resolver = TagResolver::new(resolver_config, &lookup, &backend, &srcset);
    let mut processor = TagProcessor::new(resolver);
    let rendered = processor.process(text)?;
    tracing::info!(
        page_dir = %page_dir.display(),
        warnings = processor.warnings().len(),
        "Rendered image tags"
    );

    Ok((rendered, processor.warnings().to_vec()))
}
