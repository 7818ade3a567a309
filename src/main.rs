use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use resvic_stats::export;
use resvic_stats::params::{selection_url, DEFAULT_PAGE};
use resvic_stats::render;
use resvic_stats::source::load_dataset;
use resvic_stats::{PageOptions, SortDirection, Source, StatsPage, ViewParams};

#[derive(Parser)]
#[command(name = "resvic-stats")]
#[command(
    about = "Compare two agent statistics as a sortable, searchable table",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the comparison table as HTML or text
    Render {
        #[command(flatten)]
        view: ViewArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "html")]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the metric fields that can be compared
    Fields {
        /// Statistics CSV file or http(s) URL
        #[arg(short, long, env = "RESVIC_STATS_INPUT", default_value = "agent_statistics.csv")]
        input: String,
    },

    /// Export every matching row (all pages) to .xlsx or .csv
    Export {
        #[command(flatten)]
        view: ViewArgs,

        /// Output file; format chosen by extension
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the URL for a new stat selection (sort resets to ratio/ASC)
    Link {
        #[arg(long)]
        stat1: String,

        #[arg(long)]
        stat2: String,

        /// Page the URL points at
        #[arg(long, default_value = DEFAULT_PAGE)]
        base: String,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Statistics CSV file or http(s) URL
    #[arg(short, long, env = "RESVIC_STATS_INPUT", default_value = "agent_statistics.csv")]
    input: String,

    /// View parameters as a query string or URL, e.g.
    /// "stat1=explorer&stat2=pioneer&sort=ratio&order=ASC&search=bob&page=2&page_length=25"
    #[arg(short, long, default_value = "")]
    query: String,

    /// First metric (overrides the query)
    #[arg(long)]
    stat1: Option<String>,

    /// Second metric (overrides the query)
    #[arg(long)]
    stat2: Option<String>,

    /// Sort column (overrides the query)
    #[arg(long)]
    sort: Option<String>,

    /// Sort order, ASC or DESC (overrides the query)
    #[arg(long)]
    order: Option<String>,

    /// Only show agents matching this text (overrides the query)
    #[arg(short, long)]
    search: Option<String>,

    /// Page to show, starting at 1 (overrides the query)
    #[arg(long)]
    page: Option<usize>,

    /// Rows per page, 0 for all (overrides the query)
    #[arg(long)]
    page_length: Option<usize>,

    /// Page the generated links point at
    #[arg(long, default_value = DEFAULT_PAGE)]
    base: String,
}

impl ViewArgs {
    fn params(&self) -> ViewParams {
        let mut params = ViewParams::from_query(&self.query);
        if let Some(stat1) = self.stat1.as_ref().filter(|s| !s.is_empty()) {
            params.stat1 = stat1.clone();
        }
        if let Some(stat2) = self.stat2.as_ref().filter(|s| !s.is_empty()) {
            params.stat2 = stat2.clone();
        }
        if let Some(sort) = self.sort.as_ref().filter(|s| !s.is_empty()) {
            params.sort = sort.clone();
        }
        if let Some(order) = self.order.as_ref().filter(|s| !s.is_empty()) {
            params.order = SortDirection::parse(order);
        }
        params
    }

    fn options(&self) -> PageOptions {
        let mut options = PageOptions::from_query(&self.query);
        options.base_url = self.base.clone();
        if let Some(search) = &self.search {
            options.search = search.trim().to_string();
        }
        if let Some(page) = self.page {
            options.page = page.saturating_sub(1);
        }
        if let Some(page_length) = self.page_length {
            options.page_length = page_length;
        }
        options
    }

    fn load(&self) -> StatsPage {
        let source = Source::parse(&self.input);
        eprintln!("Reading statistics: {}", source);
        StatsPage::load(&source, self.params(), self.options())
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Html,
    Text,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { view, format, output } => {
            render_view(&view, format, output.as_ref())?;
        }
        Commands::Fields { input } => {
            fields(&input)?;
        }
        Commands::Export { view, output } => {
            export_view(&view, &output)?;
        }
        Commands::Link { stat1, stat2, base } => {
            println!("{}", selection_url(&base, &stat1, &stat2));
        }
    }

    Ok(())
}

fn render_view(view: &ViewArgs, format: OutputFormat, output: Option<&PathBuf>) -> Result<()> {
    let page = view.load();
    report_rejected(&page);

    let rendered = match format {
        OutputFormat::Html => render::render_page(&page),
        OutputFormat::Text => render::render_text(&page),
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }

    // The page still shows the message, but the run failed
    if let Some(message) = page.status().error() {
        anyhow::bail!("{}", message);
    }
    Ok(())
}

fn fields(input: &str) -> Result<()> {
    let source = Source::parse(input);
    let dataset = load_dataset(&source).context("Failed to load statistics")?;
    let fields = dataset.metric_fields();

    eprintln!("{} records, {} metric fields", dataset.records.len(), fields.len());
    for field in fields.iter() {
        println!("{}", field);
    }
    Ok(())
}

fn export_view(view: &ViewArgs, output: &PathBuf) -> Result<()> {
    let page = view.load();
    report_rejected(&page);

    if let Some(message) = page.status().error() {
        anyhow::bail!("{}", message);
    }
    let (Some(table), Some(selection)) = (page.table(), page.selection()) else {
        anyhow::bail!("Nothing to export");
    };

    let rows = table.applied();
    eprintln!("Writing {} rows to {}", rows.len(), output.display());
    export::export_rows(&rows, selection, output).context("Failed to export rows")?;

    eprintln!("Done!");
    Ok(())
}

fn report_rejected(page: &StatsPage) {
    let rejected = page.rejected();
    if !rejected.is_empty() {
        eprintln!("Skipped {} records with non-numeric values", rejected.len());
    }
}
