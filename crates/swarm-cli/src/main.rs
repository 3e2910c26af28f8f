//! Swarm demo CLI
//!
//! Small programs exercising worker pools, promises, named mutexes and
//! semaphores, plus a parallel π computation to compare against a
//! sequential one.

mod demos;
mod output;

use clap::{Parser, Subcommand};
use output::{ColorMode, StyledOutput};
use swarm_core::{Runtime, RuntimeOptions};

#[derive(Parser)]
#[command(name = "swarm")]
#[command(about = "Worker pool, promise and named lock demos", long_about = None)]
#[command(version)]
struct Cli {
    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    /// Turn off runtime diagnostics
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch a pool of sleeping workers and wait for all of them
    Workers {
        /// Number of workers
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
        /// How long each worker sleeps
        #[arg(long, default_value_t = 2000)]
        delay_ms: u64,
        /// Extra random sleep per worker, up to this many milliseconds
        #[arg(long, default_value_t = 0)]
        jitter_ms: u64,
    },

    /// Workers taking turns in a critical section guarded by a named mutex
    Mutex {
        /// Number of workers
        #[arg(short = 'n', long, default_value_t = 10)]
        workers: usize,
        /// Time spent inside the critical section
        #[arg(long, default_value_t = 500)]
        hold_ms: u64,
    },

    /// Workers sharing a named semaphore
    Semaphore {
        /// Number of workers
        #[arg(short = 'n', long, default_value_t = 6)]
        workers: usize,
        /// Permits of the semaphore
        #[arg(short, long, default_value_t = 2)]
        permits: usize,
        /// Time spent holding a permit
        #[arg(long, default_value_t = 2000)]
        hold_ms: u64,
    },

    /// A promise running next to a small worker pool
    Promise {
        /// Make the promise body reject
        #[arg(long)]
        fail: bool,
        /// How long the promise body works
        #[arg(long, default_value_t = 3000)]
        delay_ms: u64,
    },

    /// Compute π with the Leibniz series on a worker pool
    Pi {
        /// Number of series terms
        #[arg(short, long, default_value_t = 100_000_000)]
        steps: u64,
        /// Number of workers (defaults to the CPU count)
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Compute π with the Leibniz series on the current thread
    SequentialPi {
        /// Number of series terms
        #[arg(short, long, default_value_t = 100_000_000)]
        steps: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let color = output::resolve_color_choice(cli.color);
    let mut out = StyledOutput::new(color);
    let runtime = Runtime::with_options(RuntimeOptions::default().logs(!cli.quiet).color(color));

    match cli.command {
        Commands::Workers {
            count,
            delay_ms,
            jitter_ms,
        } => demos::workers::run(&runtime, &mut out, count, delay_ms, jitter_ms),

        Commands::Mutex { workers, hold_ms } => {
            demos::locks::run_mutex(&runtime, &mut out, workers, hold_ms)
        }

        Commands::Semaphore {
            workers,
            permits,
            hold_ms,
        } => demos::locks::run_semaphore(&runtime, &mut out, workers, permits, hold_ms),

        Commands::Promise { fail, delay_ms } => {
            demos::promise::run(&runtime, &mut out, fail, delay_ms)
        }

        Commands::Pi { steps, threads } => {
            let threads = threads.unwrap_or_else(num_cpus::get);
            demos::pi::run_parallel(&runtime, &mut out, steps, threads)
        }

        Commands::SequentialPi { steps } => {
            demos::pi::run_sequential(&mut out, steps);
            Ok(())
        }
    }
}
