mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{ConfigMerger, OutputFormat};
use exifmap_container::ExifTagStore;
use exifmap_domain::{ExtractionError, TagStore, extract_photo, photo_schema};
use exifmap_render::{
    render_diagnostics_text, render_fields_table, render_metadata_text, render_tag_dump,
};
use exifmap_types::report::{FieldListing, MetadataReport};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Parser)]
#[command(
    name = "exifmap",
    version,
    about = "Map photo EXIF tags onto a typed metadata record."
)]
struct Cli {
    /// Log per-field decoding at debug level and print notes for defaulted fields.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract and print the metadata of one photo.
    Show(ShowArgs),
    /// List the fields of the photo metadata record and their source tags.
    Fields(FieldsArgs),
}

#[derive(Debug, Parser)]
struct ShowArgs {
    /// Photo file (JPEG, TIFF, PNG, WebP or HEIF).
    file: Utf8PathBuf,

    /// Output format (default: from exifmap.toml, else text).
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Also print every primary-image tag.
    #[arg(long, default_value_t = false)]
    dump_tags: bool,

    /// Treat a malformed DateTimeOriginal like a missing one instead of failing.
    #[arg(long, default_value_t = false)]
    lenient_timestamps: bool,

    /// Config file (default: ./exifmap.toml if present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct FieldsArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = real_main(cli) {
        error!("{:?}", e);
        let code = e
            .downcast_ref::<ExtractionError>()
            .map_or(1, ExtractionError::exit_code);
        return ExitCode::from(code);
    }
    ExitCode::from(0)
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    match cli.cmd {
        Command::Show(args) => cmd_show(args, cli.verbose),
        Command::Fields(args) => cmd_fields(args),
    }
}

fn cmd_show(args: ShowArgs, verbose: bool) -> anyhow::Result<()> {
    let file_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::load_or_default(Utf8Path::new(".")).context("load exifmap.toml config")?,
    };
    let merged = ConfigMerger::new(file_config).merge_show_args(
        args.format,
        args.dump_tags,
        args.lenient_timestamps,
    );
    debug!(
        "merged config: format={:?}, dump_tags={}, timestamps={:?}",
        merged.format, merged.dump_tags, merged.timestamps
    );

    let store = ExifTagStore::open(&args.file)
        .with_context(|| format!("read EXIF from {}", args.file))?;
    let extraction = extract_photo(&store, merged.extract_options())
        .with_context(|| format!("extract photo metadata from {}", args.file))?;
    let diagnostics: Vec<_> = extraction.diagnostics.iter().map(|d| d.to_report()).collect();

    match merged.format {
        OutputFormat::Text => {
            if merged.dump_tags {
                println!("{}", render_tag_dump(&store));
            }
            print!("{}", render_metadata_text(&extraction.record));
            if verbose {
                eprint!("{}", render_diagnostics_text(&diagnostics));
            }
        }
        OutputFormat::Json => {
            let mut report = MetadataReport::new(args.file.as_str(), extraction.record);
            report.diagnostics = diagnostics;
            if merged.dump_tags {
                report.tags = tag_map(&store);
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serialize report")?
            );
        }
    }
    Ok(())
}

fn tag_map(store: &dyn TagStore) -> std::collections::BTreeMap<String, String> {
    store
        .tag_names()
        .into_iter()
        .filter_map(|name| {
            let value = store.get(&name).ok()?.display();
            Some((name, value))
        })
        .collect()
}

fn cmd_fields(args: FieldsArgs) -> anyhow::Result<()> {
    let schema = photo_schema().context("build photo schema")?;
    let fields = schema.infos();

    match args.format {
        OutputFormat::Text => print!("{}", render_fields_table(&fields)),
        OutputFormat::Json => {
            let listing = FieldListing::new(fields);
            println!(
                "{}",
                serde_json::to_string_pretty(&listing).context("serialize field listing")?
            );
        }
    }
    Ok(())
}
