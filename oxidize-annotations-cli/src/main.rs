use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use oxidize_annotations::{
    Annotation, AnnotationMap, AnnotationProvider, DefaultLinkResolver, DocumentHost,
    FileTypeTable, JsonSidecarStore, LinkResolver, LinkTarget, MediaType, Object,
    PersistenceAdapter, ProtocolConfig, ProviderOptions, ResolveContext, DEFAULT_PROTOCOL,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "oxannots",
    about = "Inspect and maintain PDF annotation sidecar files",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the annotations stored in a sidecar file
    Show {
        /// Sidecar file
        sidecar: PathBuf,

        /// Only show this (zero-based) page
        #[arg(short, long)]
        page: Option<u32>,
    },

    /// Physically remove tombstoned annotations from a sidecar file
    Compact {
        /// Sidecar file
        sidecar: PathBuf,

        /// Write the result here instead of rewriting the sidecar
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how a custom-protocol link resolves
    Resolve {
        /// Link target, e.g. "oxidize://media/clip.mp4"
        link: String,

        /// Document storage root relative links resolve against
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Custom-protocol scheme
        #[arg(short, long, default_value = DEFAULT_PROTOCOL)]
        protocol: String,

        /// Extra file-type entries (e.g. "webm=video"); repeatable
        #[arg(short, long = "map", value_parser = parse_mapping)]
        mappings: Vec<(String, MediaType)>,
    },
}

/// Stand-in document for a sidecar file opened on its own. It has no raw
/// annotations, so every page comes from the sidecar.
struct SidecarHost {
    path: PathBuf,
}

impl DocumentHost for SidecarHost {
    fn uid(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn page_count(&self) -> u32 {
        u32::MAX
    }

    fn raw_annotations(&self, _page: u32) -> oxidize_annotations::Result<Vec<Object>> {
        Ok(Vec::new())
    }

    fn storage_root(&self) -> PathBuf {
        self.cache_directory()
    }

    fn cache_directory(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oxannots=info,oxidize_annotations=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { sidecar, page } => show(&sidecar, page),
        Commands::Compact { sidecar, output } => compact(&sidecar, output.as_deref()),
        Commands::Resolve {
            link,
            root,
            protocol,
            mappings,
        } => resolve(&link, &root, &protocol, mappings),
    }
}

/// Load `sidecar` into a provider. The host is returned too; the provider
/// only holds it weakly.
fn open_sidecar(sidecar: &Path) -> Result<(Arc<SidecarHost>, AnnotationProvider)> {
    let host = Arc::new(SidecarHost {
        path: sidecar.to_path_buf(),
    });
    let options = ProviderOptions::default().with_annotations_path(sidecar);
    let provider = AnnotationProvider::new(&host, 0, options)
        .with_persistence(JsonSidecarStore::new().pretty(true));

    let pages = provider
        .load_from_persistence()
        .with_context(|| format!("Failed to load {}", sidecar.display()))?;
    debug!(pages, "Sidecar loaded");
    Ok((host, provider))
}

fn show(sidecar: &Path, only_page: Option<u32>) -> Result<()> {
    let (_host, provider) = open_sidecar(sidecar)?;

    let pages = match only_page {
        Some(page) if provider.is_page_cached(page) => vec![page],
        Some(page) => bail!("Page {} is not stored in {}", page, sidecar.display()),
        None => provider.cached_pages(),
    };

    println!("Annotations in: {}", sidecar.display());
    println!("==========================================");
    for page in pages {
        let annotations = provider.annotations_for_page(page)?;
        println!("Page {} ({} annotations)", page, annotations.len());
        for annotation in annotations.iter() {
            println!("  {}", describe(annotation));
        }
    }
    Ok(())
}

fn compact(sidecar: &Path, output: Option<&Path>) -> Result<()> {
    let (_host, provider) = open_sidecar(sidecar)?;
    let removed = provider.compact();

    match output {
        None => provider
            .save_with_persistence()
            .with_context(|| format!("Failed to write {}", sidecar.display()))?,
        Some(output) => {
            let mut mapping = AnnotationMap::new();
            for page in provider.cached_pages() {
                mapping.insert(page, provider.annotations_for_page(page)?.to_vec());
            }
            JsonSidecarStore::new()
                .pretty(true)
                .save(output, &mapping)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
    }

    println!("Removed {} tombstoned annotations", removed);
    Ok(())
}

fn resolve(
    link: &str,
    root: &Path,
    protocol: &str,
    mappings: Vec<(String, MediaType)>,
) -> Result<()> {
    let protocol = ProtocolConfig::new(protocol);
    let mut file_types = FileTypeTable::default();
    for (extension, media) in mappings {
        file_types.insert(&extension, media);
    }

    let Some(path) = protocol.strip(link) else {
        println!("kind: {}", MediaType::Link);
        println!("location: {} (not a {} link)", link, protocol.scheme());
        return Ok(());
    };

    let context = ResolveContext {
        storage_root: root,
        file_types: &file_types,
    };
    let resolved = DefaultLinkResolver.resolve(path, &context, 0);
    println!("kind: {}", resolved.media);
    println!("location: {}", resolved.location);
    Ok(())
}

fn parse_mapping(value: &str) -> std::result::Result<(String, MediaType), String> {
    let (extension, media) = value
        .split_once('=')
        .ok_or_else(|| format!("expected EXT=MEDIA, got '{value}'"))?;
    let media = media.parse::<MediaType>().map_err(|e| e.to_string())?;
    Ok((extension.trim().to_string(), media))
}

fn describe(annotation: &Annotation) -> String {
    let mut line = format!(
        "[{}] {} at ({:.1}, {:.1}, {:.1}, {:.1})",
        annotation.id,
        annotation.subtype(),
        annotation.rect.lower_left.x,
        annotation.rect.lower_left.y,
        annotation.rect.upper_right.x,
        annotation.rect.upper_right.y,
    );

    match annotation.kind.target() {
        Some(LinkTarget::Page(page)) => line.push_str(&format!(" -> page {page}")),
        Some(LinkTarget::Uri(uri)) => line.push_str(&format!(" -> {uri}")),
        Some(LinkTarget::Resolved { location, .. }) => {
            line.push_str(&format!(" -> {location}"))
        }
        None => {}
    }
    if let Some(contents) = &annotation.contents {
        line.push_str(&format!(" \"{contents}\""));
    }
    if let Some(author) = &annotation.author {
        line.push_str(&format!(" by {author}"));
    }
    if annotation.is_deleted() {
        line.push_str(" (deleted)");
    }
    line
}
