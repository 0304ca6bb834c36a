//! CLI module for Infera

mod args;

pub use args::{Args, Command, OutputFormat};

use crate::analysis::Extractor;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::Envelope;
use crate::uploads::UploadStore;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_logging(verbose_flag(&args.command));

    match execute(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn verbose_flag(command: &Command) -> bool {
    match command {
        Command::Analyze { verbose, .. } | Command::Upload { verbose, .. } => *verbose,
        _ => false,
    }
}

/// Install the logger; `RUST_LOG` wins over the verbosity flag
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

/// Load the config file named on the command line, or `infera.toml` if present
fn load_config(config: Option<&Path>) -> Result<Config> {
    match config {
        Some(path) => Config::load(path),
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
    }
}

/// Returns `Ok(false)` when the command ran but reported a failure envelope
fn execute(args: Args) -> Result<bool> {
    match args.command {
        Command::Analyze {
            archive,
            id,
            config,
            format,
            output,
            no_sort,
            no_module_functions,
            temp_dir,
            uploads_dir,
            verbose,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(temp_dir, uploads_dir, no_sort, no_module_functions);
            cfg.validate()?;

            if verbose {
                eprintln!("Extension: .{}", cfg.analysis.extension);
                eprintln!("Sorted walk: {}", cfg.analysis.sort_entries);
                eprintln!("Module functions: {}", cfg.diagram.module_functions);
                if let Some(root) = &cfg.staging.temp_root {
                    eprintln!("Staging in: {}", root.display());
                }
            }

            let result = resolve_archive(&cfg, archive, id).and_then(|path| {
                if verbose {
                    eprintln!("Analyzing: {}", path.display());
                }
                Extractor::new(cfg.clone())?
                    .with_verbose(verbose)
                    .extract(&path)
            });

            match (format, result) {
                (OutputFormat::Json, Ok(extraction)) => {
                    if verbose {
                        eprintln!(
                            "Analysis complete: {} files, {} classes, {} edges",
                            extraction.stats.files_scanned,
                            extraction.stats.classes,
                            extraction.stats.inheritance_edges
                        );
                    }
                    emit(&Envelope::analysis(extraction).to_json_pretty()?, output.as_deref())?;
                    Ok(true)
                }
                (OutputFormat::Json, Err(e)) => {
                    log::error!("Failed to analyze codebase: {}", e);
                    let envelope = Envelope::failure("Analysis failed", &e);
                    emit(&envelope.to_json_pretty()?, output.as_deref())?;
                    Ok(false)
                }
                (OutputFormat::Mermaid, Ok(extraction)) => {
                    emit(&extraction.diagram, output.as_deref())?;
                    Ok(true)
                }
                (OutputFormat::Mermaid, Err(e)) => Err(e),
            }
        }

        Command::Upload {
            file,
            config,
            uploads_dir,
            verbose: _,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(None, uploads_dir, false, false);
            cfg.validate()?;

            let mut store = UploadStore::open(&cfg.uploads)?;
            match store.save_file(&file) {
                Ok(record) => {
                    println!("{}", Envelope::uploaded(&record).to_json_pretty()?);
                    Ok(true)
                }
                Err(e) => {
                    log::error!("Failed to upload file: {}", e);
                    let envelope = Envelope::failure(e.to_string(), &e);
                    println!("{}", envelope.to_json_pretty()?);
                    Ok(false)
                }
            }
        }

        Command::Uploads {
            config,
            uploads_dir,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(None, uploads_dir, false, false);
            cfg.validate()?;

            let store = UploadStore::open_read_only(&cfg.uploads)?;
            if store.list().is_empty() {
                println!("No uploads in {}", store.directory().display());
            }
            for record in store.list() {
                println!(
                    "{}\t{}\t{}",
                    record.id,
                    record.uploaded_at.to_rfc3339(),
                    record.file_path.display()
                );
            }
            Ok(true)
        }

        Command::Version => {
            println!("infera {}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
    }
}

/// Pick the archive path from an explicit argument or an upload id
fn resolve_archive(cfg: &Config, archive: Option<PathBuf>, id: Option<u64>) -> Result<PathBuf> {
    match (archive, id) {
        (Some(path), _) => Ok(path),
        (None, Some(id)) => {
            let store = UploadStore::open_read_only(&cfg.uploads)?;
            Ok(store.get(id)?.file_path.clone())
        }
        (None, None) => Err(Error::other("an archive path or --id is required")),
    }
}

/// Write `text` to `output`, or stdout when unset
fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)?;
            println!("Written to: {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
