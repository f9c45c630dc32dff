use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tracing::debug;

use recdiff_diff::{flatten, Classification, Comparator, Comparison, DiffConfig, DiffLine, Side};
use recdiff_store::{
    DirRecordStore, FileIgnoredKeys, IgnoredKeySource, InMemoryRecordStore, RecordStore,
    StaticIgnoredKeys, StoredRecord,
};
use recdiff_types::{NestedRecord, RecordKind, RecordNumber};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Lines(args) => cmd_lines(args, cli.format),
        Command::Render(args) => cmd_render(args, cli.format),
        Command::Flatten(args) => cmd_flatten(args, cli.format),
    }
}

/// Number used for records loaded from plain files.
const FILE_RECORD: RecordNumber = RecordNumber(0);

fn load_comparison(source: &SourceArgs) -> anyhow::Result<Comparison> {
    let config = match &source.config {
        Some(path) => DiffConfig::from_toml_file(path)?,
        None => DiffConfig::default(),
    };
    let ignored: Box<dyn IgnoredKeySource> = match &source.ignored {
        Some(path) => Box::new(FileIgnoredKeys::new(path)),
        None => Box::new(StaticIgnoredKeys::default()),
    };

    let store: Box<dyn RecordStore>;
    let (test, sample) = match &source.store {
        Some(root) => {
            store = Box::new(DirRecordStore::new(root));
            let test = source
                .test
                .parse::<RecordNumber>()
                .with_context(|| format!("invalid test record number {:?}", source.test))?;
            let sample = source
                .sample
                .parse::<RecordNumber>()
                .with_context(|| format!("invalid sample record number {:?}", source.sample))?;
            (test, sample)
        }
        None => {
            let files = InMemoryRecordStore::new();
            files.put(&read_file_record(RecordKind::Test, Path::new(&source.test))?)?;
            files.put(&read_file_record(RecordKind::Sample, Path::new(&source.sample))?)?;
            store = Box::new(files);
            (FILE_RECORD, FILE_RECORD)
        }
    };

    let comparator = Comparator::with_config(store, ignored, config);
    comparator
        .compare(test, sample)
        .with_context(|| format!("comparing {} against {}", source.test, source.sample))
}

fn read_file_record(kind: RecordKind, path: &Path) -> anyhow::Result<StoredRecord> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    debug!(%kind, path = %path.display(), "loaded record file");
    Ok(StoredRecord::new(kind, FILE_RECORD, raw))
}

fn value_text(line: &DiffLine, side: Side) -> String {
    line.value(side).map(|v| v.to_string()).unwrap_or_default()
}

fn format_line(line: &DiffLine) -> String {
    let text = format!(
        "{} {}: {} | {}",
        line.classification.marker(),
        line.path,
        value_text(line, Side::Test),
        value_text(line, Side::Sample)
    );
    match line.classification {
        Classification::Unchanged => text.normal().to_string(),
        Classification::Changed => text.yellow().to_string(),
        Classification::Added => text.green().to_string(),
        Classification::Deleted => text.red().to_string(),
    }
}

fn cmd_lines(args: LinesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let comparison = load_comparison(&args.source)?;
    let shown: Vec<&DiffLine> = comparison
        .lines
        .iter()
        .filter(|l| !args.only_changes || l.classification != Classification::Unchanged)
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
        OutputFormat::Text => {
            for line in &shown {
                println!("{}", format_line(line));
            }
            let s = comparison.lines.summary();
            println!(
                "\n{} unchanged, {} changed, {} added, {} deleted",
                s.unchanged.to_string().bold(),
                s.changed.to_string().yellow(),
                s.added.to_string().green(),
                s.deleted.to_string().red()
            );
        }
    }
    Ok(())
}

fn cmd_render(args: RenderArgs, format: OutputFormat) -> anyhow::Result<()> {
    let views = load_comparison(&args.source)?.render();

    if let Some(dir) = &args.out {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let test_path = dir.join("test.html");
        let sample_path = dir.join("sample.html");
        fs::write(&test_path, &views.test)?;
        fs::write(&sample_path, &views.sample)?;
        println!("{} Wrote {}", "✓".green().bold(), test_path.display());
        println!("{} Wrote {}", "✓".green().bold(), sample_path.display());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&views)?),
        OutputFormat::Text => {
            println!("{}", "== test ==".bold());
            println!("{}", views.test);
            println!("{}", "== sample ==".bold());
            println!("{}", views.sample);
        }
    }
    Ok(())
}

fn cmd_flatten(args: FlattenArgs, format: OutputFormat) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let record = NestedRecord::from_json_str(&raw)
        .with_context(|| format!("decoding {}", args.file.display()))?;
    let entries = flatten(&record)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            for entry in &entries {
                println!("{} = {}", entry.path.to_string().cyan(), entry.value);
            }
        }
    }
    Ok(())
}
