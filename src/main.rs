//! classdoc — generate markdown reference docs from doc-comment blocks in
//! class-based source files.
//!
//! - `classdoc docs src/*.py -o docs/api -m metadata.json`
//! - `classdoc toc src/ --link-prefix api --import-prefix pkg`
//! - `classdoc inherit --base src/base.py --child src/a.py src/b.py -o docs/api`
//! - `classdoc vars src/config.py`
//!
//! Each input is processed on its own: a failing file is reported and the
//! run moves on, and the exit status is non-zero if anything failed.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use classdoc::merge;
use classdoc::parser::{self, scanner, SUPPORTED_EXTENSIONS};
use classdoc::render::{self, markdown, RenderContext};
use classdoc::toc::{self, Overrides};
use classdoc::{DocOptions, MetadataSpec, Warning};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

#[derive(Parser)]
#[command(
    name = "classdoc",
    about = "Generate markdown reference docs from doc-comment blocks in class-based source files"
)]
struct Cli {
    /// Log progress and debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one document per source file
    Docs {
        /// Input files, directories or glob patterns
        #[arg(required = true)]
        files: Vec<String>,

        /// Output directory
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Section metadata (JSON)
        #[arg(short = 'm', long)]
        metadata: Option<PathBuf>,

        /// Package prefix for the `from <prefix>.<module> import <Class>` line.
        /// Defaults to the directory name when it holds an `__init__.py`
        #[arg(long)]
        import_prefix: Option<String>,

        /// Output format: markdown (default) or json
        #[arg(short = 'f', long, default_value = "markdown")]
        format: String,

        /// Treat a second class in one file as an error
        #[arg(long)]
        strict: bool,
    },
    /// Build a table of contents for a directory of sources or one document
    Toc {
        /// Input files, directories or glob patterns
        #[arg(required_unless_present = "doc")]
        files: Vec<String>,

        /// List the headings of a single rendered document instead
        #[arg(long, conflicts_with = "files")]
        doc: Option<PathBuf>,

        /// Prefix for link targets, e.g. `api`
        #[arg(long, default_value = "")]
        link_prefix: String,

        /// Package prefix for the import statement after each entry
        #[arg(long)]
        import_prefix: Option<String>,

        /// Class name override, e.g. `HttpClient=HTTPClient`
        #[arg(long = "override", value_name = "EXPECTED=ACTUAL", value_parser = parse_override)]
        overrides: Vec<(String, String)>,

        /// Write to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Merge a base class document into each subclass document
    Inherit {
        /// Base class source file
        #[arg(long)]
        base: PathBuf,

        /// Subclass source files
        #[arg(long, required = true, num_args = 1..)]
        child: Vec<PathBuf>,

        /// Output directory
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Section metadata (JSON)
        #[arg(short = 'm', long)]
        metadata: Option<PathBuf>,

        /// Class name override, e.g. `HttpClient=HTTPClient`
        #[arg(long = "override", value_name = "EXPECTED=ACTUAL", value_parser = parse_override)]
        overrides: Vec<(String, String)>,

        /// Package prefix for the import line
        #[arg(long)]
        import_prefix: Option<String>,
    },
    /// Render the table of documented module-level variables
    Vars {
        file: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let failures = match cli.command {
        Commands::Docs {
            files,
            output,
            metadata,
            import_prefix,
            format,
            strict,
        } => {
            let options = DocOptions {
                import_prefix,
                strict,
                ..Default::default()
            };
            docs(&files, &output, metadata.as_deref(), &format, &options)?
        }
        Commands::Toc {
            files,
            doc,
            link_prefix,
            import_prefix,
            overrides,
            output,
        } => match doc {
            Some(doc) => {
                let text = fs::read_to_string(&doc)
                    .with_context(|| format!("failed to read {}", doc.display()))?;
                emit(&toc::render_toc(&toc::toc_from_doc(&text)), output.as_deref())?;
                0
            }
            None => {
                let overrides: Overrides = overrides.into_iter().collect();
                directory_toc(
                    &files,
                    import_prefix.as_deref(),
                    &link_prefix,
                    &overrides,
                    output.as_deref(),
                )?
            }
        },
        Commands::Inherit {
            base,
            child,
            output,
            metadata,
            overrides,
            import_prefix,
        } => {
            let options = DocOptions {
                import_prefix,
                ..Default::default()
            };
            let overrides: Overrides = overrides.into_iter().collect();
            inherit(&base, &child, &output, metadata.as_deref(), &overrides, &options)?
        }
        Commands::Vars { file, output } => {
            let src = parser::read_source(&file)?;
            let vars = scanner::scan_module_variables(&src);
            if vars.is_empty() {
                warn!("no documented module variables in {}", file.display());
            }
            emit(&markdown::render_module_variables(&vars), output.as_deref())?;
            0
        }
    };

    if failures > 0 {
        anyhow::bail!("{} input(s) failed", failures);
    }
    Ok(())
}

/// docs: render every input into `output_dir`.
fn docs(
    patterns: &[String],
    output_dir: &Path,
    metadata: Option<&Path>,
    format: &str,
    options: &DocOptions,
) -> Result<usize> {
    let spec = load_metadata(metadata)?;
    let renderer = render::create_renderer(format)?;
    let ext = renderer.file_extension();

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let (inputs, missing) = expand_globs(patterns)?;
    let mut failures = report_missing(&missing);
    let mut packages: HashMap<PathBuf, DocOptions> = HashMap::new();

    for path in &inputs {
        let dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
        let options = packages
            .entry(dir)
            .or_insert_with_key(|dir| package_options(dir, options));
        let rendered = parser::parse_file(path, &options.scan_options()).and_then(|(src, classes)| {
            if classes.is_empty() {
                return Ok(None);
            }
            let ctx = RenderContext {
                metadata: spec.as_ref(),
                import_path: options.import_path(&src, &classes),
            };
            renderer.render(&classes, &ctx).map(Some)
        });

        match rendered {
            Ok(Some(out)) => {
                report(&out.warnings);
                let out_path = output_dir.join(format!("{}.{}", derive_output_name(path), ext));
                fs::write(&out_path, &out.text)
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
                info!("wrote {}", out_path.display());
            }
            Ok(None) => debug!("no classes in {}", path.display()),
            Err(e) => {
                error!("skipping {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }
    Ok(failures)
}

/// Options for the sources in `dir`. When `dir` is a package, its
/// `__init__.py` re-exports are picked up and the import prefix defaults to
/// the package directory's name.
fn package_options(dir: &Path, base: &DocOptions) -> DocOptions {
    let mut options = base.clone();
    let init = dir.join("__init__.py");
    if !init.is_file() {
        return options;
    }
    match parser::read_source(&init) {
        Ok(src) => {
            options.reexports.extend(scanner::scan_reexports(&src));
            debug!("{} re-exports {:?}", init.display(), options.reexports);
        }
        Err(e) => warn!("ignoring {}: {}", init.display(), e),
    }
    if options.import_prefix.is_none() {
        let name = fs::canonicalize(dir)
            .ok()
            .and_then(|d| d.file_name().map(|n| n.to_string_lossy().to_string()));
        options.import_prefix = name;
    }
    options
}

/// toc: one linked line per source file.
fn directory_toc(
    patterns: &[String],
    import_prefix: Option<&str>,
    link_prefix: &str,
    overrides: &Overrides,
    output: Option<&Path>,
) -> Result<usize> {
    let (inputs, missing) = expand_globs(patterns)?;
    let mut failures = report_missing(&missing);

    let mut sources = Vec::with_capacity(inputs.len());
    for path in &inputs {
        match parser::read_source(path) {
            Ok(src) => sources.push(src),
            Err(e) => {
                error!("skipping {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    let (text, warnings) = toc::toc_from_directory(&sources, import_prefix, link_prefix, overrides);
    report(&warnings);
    emit(&text, output)?;
    Ok(failures)
}

/// inherit: merge the base document into each child and write the results.
fn inherit(
    base: &Path,
    children: &[PathBuf],
    output_dir: &Path,
    metadata: Option<&Path>,
    overrides: &Overrides,
    options: &DocOptions,
) -> Result<usize> {
    let spec = load_metadata(metadata)?;
    let base_src = parser::read_source(base)?;

    let mut failures = 0;
    let mut sources = Vec::with_capacity(children.len());
    for path in children {
        match parser::read_source(path) {
            Ok(src) => sources.push(src),
            Err(e) => {
                error!("skipping {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    let (base_warnings, results) =
        merge::merge_directory(&base_src, &sources, overrides, spec.as_ref(), options)
            .with_context(|| format!("failed to document base class in {}", base.display()))?;
    report(&base_warnings);

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    for result in results {
        report(&result.warnings);
        match result.doc {
            Ok(doc) => {
                let out_path =
                    output_dir.join(format!("{}.md", derive_output_name(Path::new(&result.file))));
                fs::write(&out_path, &doc.text)
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
                info!("wrote {} ({})", out_path.display(), result.class_name);
            }
            Err(e) => {
                error!("skipping {}: {}", result.file, e);
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn load_metadata(path: Option<&Path>) -> Result<Option<MetadataSpec>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read metadata: {}", path.display()))?;
    let spec = MetadataSpec::from_json(&text)
        .with_context(|| format!("invalid metadata: {}", path.display()))?;
    Ok(Some(spec))
}

fn report(warnings: &[Warning]) {
    for warning in warnings {
        warn!("{}", warning);
    }
}

fn report_missing(missing: &[PathBuf]) -> usize {
    for path in missing {
        error!("{}", classdoc::Error::NotFound(path.clone()));
    }
    missing.len()
}

/// Write to `output`, or stdout when none is given.
fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}

fn parse_override(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((expected, actual)) if !expected.is_empty() && !actual.is_empty() => {
            Ok((expected.to_string(), actual.to_string()))
        }
        _ => Err(format!("expected EXPECTED=ACTUAL, got `{}`", arg)),
    }
}

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
/// Returns the files found and the patterns that matched nothing.
fn expand_globs(patterns: &[String]) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut files = Vec::new();
    let mut missing = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                let supported = p
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
                if p.is_file() && supported {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            missing.push(path.to_path_buf());
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok((files, missing))
}

/// Derive the output file name (without extension) from a source path.
/// "src/pkg/my_widget.py" → "my_widget"
fn derive_output_name(source: &Path) -> String {
    toc::file_stem(&source.to_string_lossy()).to_string()
}
