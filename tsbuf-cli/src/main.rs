//! CLI for the tsbuf time-series buffer.
//!
//! Provides commands for replaying recorded samples through a buffer and for
//! benchmarking the ingestion path.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tsbuf::{BufferConfig, Output, ReturnType, Scalar, TimeSeriesBuffer, Window};

/// tsbuf — Bounded FIFO buffer for time-series with uncertainty.
#[derive(Parser)]
#[command(name = "tsbuf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Load samples from a file into a buffer, then pop and show them.
    Replay {
        /// Input file: one sample per line, 2, 3 or 4 comma-separated columns.
        input: PathBuf,

        /// JSON buffer configuration (capacity, return_type).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Buffer capacity (overrides the config file).
        #[arg(long)]
        capacity: Option<usize>,

        /// Output layout (overrides the config file).
        #[arg(long)]
        return_type: Option<ReturnType>,

        /// Number of oldest samples to pop before showing.
        #[arg(long)]
        pop: Option<usize>,

        /// Number of newest samples to show (-1 for all).
        #[arg(long, default_value = "-1", allow_negative_numbers = true)]
        show: i64,

        /// Output format.
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Run an ingestion microbenchmark.
    Bench {
        /// Number of samples to add.
        #[arg(long, default_value = "1000000")]
        samples: u32,

        /// Buffer capacity.
        #[arg(long, default_value = "10000")]
        capacity: usize,

        /// Samples per `add` call.
        #[arg(long, default_value = "1000")]
        batch: u32,
    },
}

/// Output format for replay results.
#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text.
    Text,
    /// JSON object.
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            input,
            config,
            capacity,
            return_type,
            pop,
            show,
            format,
        } => cmd_replay(
            &input,
            config.as_deref(),
            capacity,
            return_type,
            pop,
            show,
            &format,
        ),
        Commands::Bench {
            samples,
            capacity,
            batch,
        } => cmd_bench(samples, capacity, batch),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

/// Implements `tsbuf replay <input>`.
fn cmd_replay(
    input: &Path,
    config_path: Option<&Path>,
    capacity: Option<usize>,
    return_type: Option<ReturnType>,
    pop: Option<usize>,
    show: i64,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(path) => BufferConfig::load(path)?,
        None => BufferConfig::default(),
    };
    if let Some(capacity) = capacity {
        config.capacity = capacity;
    }
    if let Some(return_type) = return_type {
        config.return_type = return_type;
    }

    let window = Window::from_signed(show)?;
    let mut buffer = TimeSeriesBuffer::with_config(&config)?;
    tracing::debug!("created {buffer} with return type {}", buffer.return_type());

    let text = std::fs::read_to_string(input)
        .map_err(|e| format!("failed to read '{}': {e}", input.display()))?;
    let rows = parse_rows(&text)?;

    let added = buffer.add_rows(rows)?;
    tracing::info!("added {added} sample(s) from {}", input.display());
    if buffer.evicted() > 0 {
        tracing::warn!(
            "{} sample(s) evicted, capacity is {}",
            buffer.evicted(),
            buffer.capacity()
        );
    }

    let popped = pop.map(|n| buffer.pop(n));
    let shown = buffer.show(window);

    match format {
        OutputFormat::Text => {
            println!("{buffer}");
            if let Some(popped) = &popped {
                println!();
                println!("# pop: {} sample(s), {}", popped.len(), popped.return_type());
                print_output(popped);
            }
            println!();
            println!("# show: {} sample(s), {}", shown.len(), shown.return_type());
            print_output(&shown);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "len": buffer.len(),
                "capacity": buffer.capacity(),
                "evicted": buffer.evicted(),
                "return_type": buffer.return_type().as_str(),
                "pop": popped.as_ref().map(Output::to_json).transpose()?,
                "show": shown.to_json()?,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Parses one row of scalars per line; blank lines and `#` comments are skipped.
fn parse_rows(text: &str) -> Result<Vec<Vec<Scalar>>, Box<dyn std::error::Error>> {
    let mut rows = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row = line
            .split(',')
            .map(str::parse::<Scalar>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("line {}: {e}", lineno + 1))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Prints an output in a layout-shaped text form.
fn print_output(output: &Output) {
    match output {
        Output::List(samples) => {
            println!("time,time_unc,value,value_unc");
            for s in samples {
                println!("{},{},{},{}", s.time, s.time_unc, s.value, s.value_unc);
            }
        }
        Output::Array(table) => {
            println!("shape: {:?}", table.shape());
            for row in table.rows() {
                let cells: Vec<String> = row.iter().map(f64::to_string).collect();
                println!("{}", cells.join(","));
            }
        }
        Output::Arrays {
            time,
            time_unc,
            value,
            value_unc,
        } => {
            println!("time:      {time}");
            println!("time_unc:  {time_unc}");
            println!("value:     {value}");
            println!("value_unc: {value_unc}");
        }
        Output::UArray(table) => {
            println!("shape: {:?}", table.shape());
            for row in table.rows() {
                println!("{},{}", row[0], row[1]);
            }
        }
        Output::UArrays { time, value } => {
            let time: Vec<String> = time.iter().map(ToString::to_string).collect();
            let value: Vec<String> = value.iter().map(ToString::to_string).collect();
            println!("time:  [{}]", time.join(", "));
            println!("value: [{}]", value.join(", "));
        }
    }
}

/// Implements `tsbuf bench`.
#[allow(clippy::cast_precision_loss)] // Benchmark stats are fine with f64 precision
fn cmd_bench(samples: u32, capacity: usize, batch: u32) -> Result<(), Box<dyn std::error::Error>> {
    println!("tsbuf ingestion benchmark");
    println!("  Samples: {samples}");
    println!("  Capacity: {capacity}");
    println!("  Batch: {batch}");
    println!();

    if batch == 0 {
        return Err("batch size must be > 0".into());
    }

    let mut buffer = TimeSeriesBuffer::new(capacity, ReturnType::Array)?;
    let batches = samples / batch;

    let start = Instant::now();

    for b in 0..batches {
        let base = f64::from(b * batch);
        let rows = (0..batch).map(|i| {
            let t = base + f64::from(i);
            [t, 1e-6, t.sin(), 0.01]
        });
        buffer.add_quads(rows)?;
    }
    let drained = buffer.pop(capacity).len();

    let elapsed = start.elapsed();
    let total = u64::from(batches) * u64::from(batch);
    let ns_per_sample = elapsed.as_nanos() as f64 / total.max(1) as f64;
    let samples_per_sec = total as f64 / elapsed.as_secs_f64();

    println!("Results:");
    println!("  Total samples: {total}");
    println!("  Evicted: {}", buffer.evicted());
    println!("  Drained: {drained}");
    println!("  Elapsed: {elapsed:.3?}");
    println!("  Avg latency: {ns_per_sample:.1} ns/sample");
    println!("  Throughput: {samples_per_sec:.0} samples/sec");

    Ok(())
}
