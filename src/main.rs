use hilbert_axes::order::manhattan;
use hilbert_axes::{DomainError, HilbertCurve};

use clap::{Parser, Subcommand};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use std::error::Error;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::process::exit;
use std::time::Instant;

/// The parsed command line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Convert between Hilbert curve indices and coordinates")]
struct Args {
    /// The number of dimensions
    #[arg(short = 'n', long, default_value_t = 2)]
    dims: usize,

    /// The number of iterations; coordinates range over [0, 2^DEPTH)
    #[arg(short = 'p', long, default_value_t = 3)]
    depth: u32,

    #[command(subcommand)]
    command: Command,
}

/// What to do with the curve.
#[derive(Debug, Subcommand)]
enum Command {
    /// Print the coordinates visited at each INDEX
    Point {
        #[arg(required = true, allow_hyphen_values = true)]
        indices: Vec<String>,
    },

    /// Print the index of each comma-separated point, e.g. 4,6
    Index {
        #[arg(required = true, allow_hyphen_values = true)]
        points: Vec<String>,
    },

    /// Print every index and point in a range, in curve order
    Walk {
        /// The first index to print
        #[arg(long, allow_hyphen_values = true)]
        from: Option<String>,

        /// The last index to print
        #[arg(long, allow_hyphen_values = true)]
        to: Option<String>,
    },

    /// Check the round trip and locality at random indices
    Check {
        /// The number of indices to check
        #[arg(short = 'k', long, default_value_t = 10_000)]
        samples: u64,

        /// Seed the random number generator
        #[arg(short = 'e', long, default_value_t = 0)]
        seed: u64,
    },
}

/// Error type for this app.
#[derive(Debug)]
enum AppError {
    ArgError(clap::Error),
    RuntimeError(Box<dyn Error>),
}

impl AppError {
    /// Exit the program with this error.
    fn exit(&self) -> ! {
        match self {
            Self::ArgError(err) => err.exit(),
            Self::RuntimeError(err) => {
                eprintln!("error: {}", err);
                exit(1)
            }
        }
    }
}

impl From<clap::Error> for AppError {
    fn from(err: clap::Error) -> Self {
        Self::ArgError(err)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self::RuntimeError(Box::new(err))
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        Self::RuntimeError(Box::new(err))
    }
}

/// Result type for this app.
type AppResult<T> = Result<T, AppError>;

/// Format a point as comma-separated coordinates.
fn format_point(point: &[u64]) -> String {
    point
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Count the ways one checked index went wrong: `point` must map `back` to `index`, and `next`
/// (the point after it, if any) must be adjacent.
fn count_violations(index: u128, point: &[u64], back: u128, next: Option<&[u64]>) -> u64 {
    let mut violations = 0;

    if back != index {
        log::warn!("{} -> {:?} -> {}", index, point, back);
        violations += 1;
    }

    if let Some(next) = next {
        let distance = manhattan(point, next);
        if distance != 1 {
            log::warn!("{} -> {:?} is {} steps from {:?}", index, point, distance, next);
            violations += 1;
        }
    }

    violations
}

/// Fail if any violations were found.
fn check_verdict(violations: u64, samples: u64) -> AppResult<()> {
    if violations > 0 {
        let msg = format!("{} violations in {} samples", violations, samples);
        Err(AppError::RuntimeError(msg.into()))
    } else {
        Ok(())
    }
}

/// The application itself.
#[derive(Debug)]
struct App {
    curve: HilbertCurve,
    command: Command,
    start_time: Instant,
    /// Whether to draw a progress line on stderr.
    progress: bool,
}

impl App {
    /// Make the App.
    fn new(args: Args) -> AppResult<Self> {
        let curve = HilbertCurve::new(args.dims, args.depth)?;
        log::debug!("using the {}", curve);

        Ok(Self {
            curve,
            command: args.command,
            start_time: Instant::now(),
            progress: io::stderr().is_terminal(),
        })
    }

    fn run<W: Write>(&self, out: &mut W) -> AppResult<()> {
        match &self.command {
            Command::Point { indices } => {
                for text in indices {
                    let index = self.curve.parse_index(text)?;
                    writeln!(out, "{}", format_point(&self.curve.point(index)?))?;
                }
            }
            Command::Index { points } => {
                for text in points {
                    let point = self.curve.parse_point(text)?;
                    writeln!(out, "{}", self.curve.index(&point)?)?;
                }
            }
            Command::Walk { from, to } => {
                let from = match from {
                    Some(text) => self.curve.parse_index(text)?,
                    None => 0,
                };
                let to = match to {
                    Some(text) => self.curve.parse_index(text)?,
                    None => self.curve.max_index(),
                };

                for (index, point) in self.curve.points_in(from..=to)? {
                    writeln!(out, "{}\t{}", index, format_point(&point))?;
                }
            }
            Command::Check { samples, seed } => {
                return self.check(*samples, *seed);
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Check that random indices survive the round trip, and that their successors are adjacent.
    fn check(&self, samples: u64, seed: u64) -> AppResult<()> {
        let mut rng = Pcg64::seed_from_u64(seed);
        let max = self.curve.max_index();

        eprintln!("Checking {} indices on the {}", samples, self.curve);

        let interval = (samples / 100).max(1);
        let mut violations = 0u64;

        for i in 0..samples {
            let index = rng.gen_range(0..=max);
            let point = self.curve.point(index)?;

            let back = self.curve.index(&point)?;
            let next = if index < max {
                Some(self.curve.point(index + 1)?)
            } else {
                None
            };

            violations += count_violations(index, &point, back, next.as_deref());

            if (i + 1) % interval == 0 && i + 1 < samples {
                self.print_progress(i + 1, samples, violations)?;
            }
        }

        self.print_progress(samples, samples, violations)?;

        check_verdict(violations, samples)
    }

    fn print_progress(&self, i: u64, size: u64, violations: u64) -> io::Result<()> {
        if !self.progress {
            return Ok(());
        }

        let mut term = match term::stderr() {
            Some(term) => term,
            None => return Ok(()),
        };

        let progress = if size == 0 {
            100.0
        } else {
            100.0 * (i as f64) / (size as f64)
        };
        let mut rate = (i as f64) / self.start_time.elapsed().as_secs_f64();
        let mut unit = "idx/s";

        if rate >= 10_000.0 {
            rate /= 1_000.0;
            unit = "kidx/s";
        }

        if rate >= 10_000.0 {
            rate /= 1_000.0;
            unit = "Midx/s";
        }

        let newline = if i == size { "\n" } else { "" };

        // Terminals that can't rewrite the line just don't get a progress line
        match term.carriage_return().and_then(|_| term.delete_line()) {
            Ok(()) => {}
            Err(term::Error::NotSupported) => return Ok(()),
            Err(err) => return Err(err.into()),
        }

        write!(
            term,
            "{:>6.2}%  | {:4.0} {:>6}  | violations: {}{}",
            progress, rate, unit, violations, newline,
        )
    }
}

fn main() {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => AppError::from(e).exit(),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match App::new(args).and_then(|app| app.run(&mut out)) {
        Ok(_) => {}
        Err(e) => e.exit(),
    }
}
