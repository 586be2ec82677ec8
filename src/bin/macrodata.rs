use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use macrodata::{Catalog, ShadeOptions, Table, Value, stats, storage, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "macrodata",
    version,
    about = "Bundled macroeconomic datasets: load, reshape, plot & summarize"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the bundled datasets and their supported description flags.
    List,
    /// Load a dataset (and optionally save it).
    Data(DataArgs),
    /// Plot dataset columns as a line chart, optionally with recession shading.
    Plot(PlotArgs),
    /// Extract a Hodrick-Prescott trend from one column.
    Trend(TrendArgs),
    /// Print column statistics for a dataset.
    Summary(SummaryArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Dataset key (see `list`).
    dataset: String,
    /// Numeric description flag: 0 data, 1 print definitions, 2 definitions
    /// table, -1 print estimate years, -2 estimate table.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    description: i8,
    /// Shorthand for `--description 2`.
    #[arg(long, default_value_t = false)]
    definitions: bool,
    /// Shorthand for `--description -2`.
    #[arg(long, default_value_t = false)]
    estimates: bool,
    /// Print only the first N rows (0 = all).
    #[arg(long, default_value_t = 10)]
    head: usize,
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Dataset key (see `list`).
    dataset: String,
    /// X column: a year column or a date column.
    #[arg(short = 'x', long)]
    x: String,
    /// Y columns separated by comma or semicolon.
    #[arg(short = 'y', long)]
    y: String,
    /// Keep rows where a column equals a value, e.g. countrycode=JPN. Repeatable.
    #[arg(long)]
    select: Vec<String>,
    /// Output image path (.svg or .png).
    #[arg(long)]
    out: PathBuf,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Chart title.
    #[arg(long)]
    title: Option<String>,
    /// Shade recessions behind the series.
    #[arg(long, default_value_t = false)]
    shade: bool,
    /// Earliest peak year to shade.
    #[arg(long, default_value_t = 1980)]
    shade_start: i32,
    /// Latest peak year to shade.
    #[arg(long, default_value_t = 2999)]
    shade_end: i32,
    /// Band opacity.
    #[arg(long, default_value_t = 0.1)]
    shade_alpha: f64,
}

#[derive(Args, Debug)]
struct TrendArgs {
    /// Dataset key (see `list`).
    dataset: String,
    /// Column to smooth.
    #[arg(long)]
    column: String,
    /// X column carried through (year or date column).
    #[arg(short = 'x', long)]
    x: String,
    /// Smoothing parameter.
    #[arg(long, default_value_t = 1600.0)]
    lambda: f64,
    /// Print only the first N rows (0 = all).
    #[arg(long, default_value_t = 10)]
    head: usize,
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Also render the series and its trend to a chart (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Dataset key (see `list`).
    dataset: String,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn save_table(table: &Table, path: &PathBuf, format: &Option<OutFormat>) -> Result<()> {
    let fmt = match format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(table, path)?,
        "json" => storage::save_json(table, path)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", table.n_rows(), path.display());
    Ok(())
}

fn print_head(table: &Table, head: usize) {
    if head > 0 && table.n_rows() > head {
        print!("{}", table.head(head));
        println!("... {} rows total", table.n_rows());
    } else {
        print!("{}", table);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::List => cmd_list(),
        Command::Data(args) => cmd_data(args),
        Command::Plot(args) => cmd_plot(args),
        Command::Trend(args) => cmd_trend(args),
        Command::Summary(args) => cmd_summary(args),
    }
}

fn cmd_list() -> Result<()> {
    print!("{}", Catalog::new().list());
    Ok(())
}

fn cmd_data(args: DataArgs) -> Result<()> {
    let flag = match (args.definitions, args.estimates) {
        (true, true) => return Err(macrodata::Error::ConflictingModes.into()),
        (true, false) => 2,
        (false, true) => -2,
        (false, false) => args.description,
    };
    let catalog = Catalog::new();
    let Some(table) = catalog.load(&args.dataset, flag)? else {
        // print modes already wrote to stdout
        return Ok(());
    };
    match args.out.as_ref() {
        Some(path) => save_table(&table, path, &args.format)?,
        None => print_head(&table, args.head),
    }
    Ok(())
}

fn cmd_plot(args: PlotArgs) -> Result<()> {
    let catalog = Catalog::new();
    let mut table = catalog.table(&args.dataset)?;
    for sel in &args.select {
        let (col, needle) = sel
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("invalid --select, expected COLUMN=VALUE"))?;
        table = table.filter_eq(col.trim(), needle.trim())?;
    }
    let ys = parse_list(&args.y);
    if ys.is_empty() {
        anyhow::bail!("no y columns given");
    }
    let shading_intervals;
    let shading = if args.shade {
        shading_intervals = catalog.recession_intervals()?;
        let opts = ShadeOptions {
            start_year: args.shade_start,
            end_year: args.shade_end,
            alpha: args.shade_alpha,
            ..ShadeOptions::default()
        };
        Some((shading_intervals.as_slice(), opts))
    } else {
        None
    };
    viz::plot_series_shaded(
        &table,
        &args.x,
        &ys,
        &args.out,
        args.width,
        args.height,
        args.title.as_deref().unwrap_or(""),
        shading,
    )?;
    eprintln!("Wrote plot to {}", args.out.display());
    Ok(())
}

fn cmd_trend(args: TrendArgs) -> Result<()> {
    let catalog = Catalog::new();
    let table = catalog.table(&args.dataset)?;
    let xi = table
        .column_index(&args.x)
        .ok_or_else(|| macrodata::Error::MissingColumn(args.x.clone()))?;
    let yi = table
        .column_index(&args.column)
        .ok_or_else(|| macrodata::Error::MissingColumn(args.column.clone()))?;

    // keep rows where both cells are present, like the published series
    let mut xs: Vec<Value> = Vec::new();
    let mut series: Vec<f64> = Vec::new();
    for row in table.rows() {
        if let Some(v) = row[yi].as_f64() {
            if !row[xi].is_null() {
                xs.push(row[xi].clone());
                series.push(v);
            }
        }
    }
    if series.is_empty() {
        anyhow::bail!("no numeric values in column `{}`", args.column);
    }
    let tau = stats::trend_with(&series, args.lambda);

    let mut out = Table::new(vec![args.x.clone(), args.column.clone(), "trend".to_string()]);
    for ((x, y), t) in xs.into_iter().zip(&series).zip(&tau) {
        out.push_row(vec![x, Value::Float(*y), Value::Float(*t)]);
    }

    match args.out.as_ref() {
        Some(path) => save_table(&out, path, &args.format)?,
        None => print_head(&out, args.head),
    }
    if let Some(plot_path) = args.plot.as_ref() {
        let ys = vec![args.column.clone(), "trend".to_string()];
        viz::plot_series(&out, &args.x, &ys, plot_path, args.width, args.height)?;
        eprintln!("Wrote plot to {}", plot_path.display());
    }
    Ok(())
}

fn cmd_summary(args: SummaryArgs) -> Result<()> {
    let catalog = Catalog::new();
    let table = catalog.table(&args.dataset)?;
    for s in stats::column_summary(&table) {
        println!(
            "{}  count={} missing={}  min={} max={} mean={} median={}",
            s.column,
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }
    Ok(())
}
