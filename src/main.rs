use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use dirview::config::{AppConfig, FilterSection, FormatSection, SortSection, WatcherConfig};
use dirview::event::{Event, EventHandler};
use dirview::fs::watcher::{FsWatcher, DEFAULT_FLOOD_THRESHOLD};
use dirview::model::cell::{Alignment, CellRole, CellValue};
use dirview::{AppError, FolderModel};

/// List a directory as a filtered, sorted table.
#[derive(Parser, Debug)]
#[command(name = "dv", version, about)]
struct Cli {
    /// Directory to list (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Config file (overrides $DIRVIEW_CONFIG and the default locations)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show hidden entries
    #[arg(short = 'a', long)]
    hidden: bool,

    /// Show system files (Windows)
    #[arg(long)]
    system: bool,

    /// List files only
    #[arg(long, conflicts_with = "dirs_only")]
    files_only: bool,

    /// List directories only
    #[arg(long)]
    dirs_only: bool,

    /// Name patterns, comma separated (e.g. "*.rs,*.toml")
    #[arg(long, value_delimiter = ',')]
    filter: Option<Vec<String>>,

    /// Sort key: name, type, size, owner, group, permissions, created, modified
    #[arg(long)]
    sort: Option<String>,

    /// Tie-break sort key
    #[arg(long)]
    sort2: Option<String>,

    /// Directory placement: first, last, mixed
    #[arg(long)]
    dirs: Option<String>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Case-sensitive sorting and name matching
    #[arg(long)]
    case_sensitive: bool,

    /// Do not force `.` and `..` to the top
    #[arg(long)]
    no_dot_first: bool,

    /// Size format: si, iec, detail
    #[arg(long)]
    size_format: Option<String>,

    /// Date format: default, iso, or a strftime pattern
    #[arg(long)]
    date_format: Option<String>,

    /// Columns, comma separated (e.g. "name,size,modified")
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Keep running and re-list on changes
    #[arg(short, long)]
    watch: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    /// Config values set explicitly on the command line.
    fn overrides(&self) -> AppConfig {
        let flag = |set: bool| set.then_some(true);
        let (date, date_pattern) = match self.date_format.as_deref() {
            None => (None, None),
            Some(name @ ("default" | "iso")) => (Some(name.to_string()), None),
            Some(pattern) => (Some("custom".to_string()), Some(pattern.to_string())),
        };

        AppConfig {
            filter: FilterSection {
                dirs: self.files_only.then_some(false),
                files: self.dirs_only.then_some(false),
                hidden: flag(self.hidden),
                system: flag(self.system),
                name_filters: self.filter.clone(),
                ..Default::default()
            },
            sort: SortSection {
                key: self.sort.clone(),
                secondary_key: self.sort2.clone(),
                dirs: self.dirs.clone(),
                dot_first: self.no_dot_first.then_some(false),
                order: self.desc.then(|| "descending".to_string()),
                case_sensitive: flag(self.case_sensitive),
            },
            format: FormatSection {
                size: self.size_format.clone(),
                date,
                date_pattern,
                columns: self.columns.clone(),
                ..Default::default()
            },
            watcher: WatcherConfig {
                enabled: flag(self.watch),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Render the model's rows as a plain text table.
fn render_table(model: &FolderModel) -> String {
    let columns = model.column_count();
    let header: Vec<String> = (0..columns)
        .map(|c| model.header_data(c).unwrap_or_default().to_string())
        .collect();
    let rows: Vec<Vec<String>> = (0..model.row_count())
        .map(|r| {
            (0..columns)
                .map(|c| match model.data(r, c, CellRole::Display) {
                    CellValue::Text(s) => s,
                    _ => String::new(),
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let align_right: Vec<bool> = (0..columns)
        .map(|c| {
            model.row_count() > 0
                && model.data(0, c, CellRole::Alignment) == CellValue::Alignment(Alignment::Right)
        })
        .collect();

    let mut out = String::new();
    for line in std::iter::once(&header).chain(rows.iter()) {
        let cells: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(c, text)| {
                if align_right[c] {
                    format!("{:>width$}", text, width = widths[c])
                } else {
                    format!("{:<width$}", text, width = widths[c])
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[tokio::main]
async fn main() -> dirview::Result<()> {
    let cli = Cli::parse();
    cli.setup_logging();

    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()))?;

    let mut model = FolderModel::new();
    config.apply(&mut model);

    let mut events = EventHandler::new();
    model.set_event_sender(events.sender());

    model.set_root_path(&cli.path).map_err(|e| match e {
        AppError::PathNotFound(p) => AppError::InvalidPath(format!("{} does not exist", p.display())),
        other => other,
    })?;
    print!("{}", render_table(&model));

    if !config.watcher_enabled() {
        return Ok(());
    }

    let mut watcher = FsWatcher::new(
        model.root_path(),
        Duration::from_millis(config.debounce_ms()),
        DEFAULT_FLOOD_THRESHOLD,
        events.sender(),
    )?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.next() => match event {
                Some(Event::FsChange(paths)) => {
                    tracing::debug!("{} path(s) changed", paths.len());
                    // Batches arriving mid-rebuild are already reflected by it.
                    watcher.pause();
                    match model.refresh() {
                        Ok(()) => {
                            println!();
                            print!("{}", render_table(&model));
                        }
                        Err(e) => tracing::warn!("refresh failed: {}", e),
                    }
                    watcher.resume();
                    tracing::debug!("watcher active: {}", watcher.is_active());
                }
                Some(Event::RootPathChanged(root)) => watcher.rewatch(&root)?,
                None => break,
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn overrides_only_set_given_flags() {
        let cli = Cli::parse_from(["dv", "/tmp", "--desc", "--filter", "*.rs,*.toml", "--date-format", "%d.%m"]);
        let cfg = cli.overrides();
        assert_eq!(cfg.sort.order.as_deref(), Some("descending"));
        assert_eq!(cfg.filter.name_filters, Some(vec!["*.rs".to_string(), "*.toml".to_string()]));
        assert_eq!(cfg.format.date.as_deref(), Some("custom"));
        assert_eq!(cfg.format.date_pattern.as_deref(), Some("%d.%m"));
        assert_eq!(cfg.filter.hidden, None);
        assert_eq!(cfg.sort.dot_first, None);
    }

    #[test]
    fn files_only_disables_dirs() {
        let cli = Cli::parse_from(["dv", "--files-only"]);
        let cfg = cli.overrides();
        assert_eq!(cfg.filter.dirs, Some(false));
        assert_eq!(cfg.filter.files, None);
        assert!(Cli::try_parse_from(["dv", "--files-only", "--dirs-only"]).is_err());
    }

    #[test]
    fn table_aligns_columns() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("long_name.txt"), "12345").unwrap();
        std::fs::write(dir.path().join("b.txt"), "1").unwrap();

        let mut model = FolderModel::new();
        model.set_file_size_format_type(dirview::model::format::FileSizeFormatType::Detail);
        model.set_columns([
            dirview::fs::sort::SectionType::FileName,
            dirview::fs::sort::SectionType::FileSize,
        ]);
        model.set_root_path(dir.path()).unwrap();

        let table = render_table(&model);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[2].starts_with("b "));
        assert!(lines[2].ends_with(" 1"));
        assert!(lines[3].starts_with("long_name"));
        assert!(lines[3].ends_with("5"));
    }
}
