use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use kana_cli::commands::train_ops::Trainer;
use kana_cli::commands::{convert_ops, rules_ops, EngineSource};
use kana_engine::table::DEFAULT_RULES_TOML;
use kana_engine::Flavor;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Parser)]
#[command(name = "kanatool", about = "Romaji typing engine diagnostics and trainer")]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,
    /// Output as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Write a JSON trace of engine spans to this directory (needs the `trace` feature)
    #[arg(long, global = true)]
    trace_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SourceArgs {
    /// Settings TOML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Rule table (.toml, or .tsv/.txt tab-separated), overriding the settings
    #[arg(long, global = true)]
    table: Option<PathBuf>,
    /// Rule flavor: any, microsoft (ms) or google
    #[arg(long, global = true)]
    flavor: Option<Flavor>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert romaji to kana
    Convert {
        /// Romaji input
        input: String,
    },
    /// Check typed input against a kana target and suggest the rest
    BestPath {
        /// Romaji typed so far (may be empty)
        input: String,
        /// Kana target
        target: String,
    },
    /// List the loaded rule table
    Rules {
        /// Only rules whose output starts with this character
        #[arg(long)]
        producing: Option<char>,
        /// Only rules with a lookahead restriction
        #[arg(long)]
        restricted: bool,
        /// Print the built-in table as TOML and exit
        #[arg(long)]
        export: bool,
    },
    /// Interactive trainer reading keys from stdin, one line at a time
    Train {
        /// Kana targets, typed in order
        targets: Vec<String>,
    },
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!(
        "{}",
        die!(serde_json::to_string_pretty(value), "Error serializing JSON: {}")
    );
}

fn main() {
    let cli = Cli::parse();

    if let Some(dir) = &cli.trace_dir {
        die!(std::fs::create_dir_all(dir), "Error creating {}: {}", dir.display());
        kana_engine::init_tracing(dir);
    }

    if let Command::Rules { export: true, .. } = cli.command {
        print!("{DEFAULT_RULES_TOML}");
        return;
    }

    let source = EngineSource {
        config: cli.source.config,
        table: cli.source.table,
        flavor: cli.source.flavor,
    };
    let (engine, options) = die!(source.open(), "Error loading rules: {}");

    match cli.command {
        Command::Convert { input } => {
            let report = convert_ops::convert(&engine, &options, &input);
            if cli.json {
                print_json(&report);
            } else {
                println!("{}", convert_ops::format_convert(&report));
            }
        }

        Command::BestPath { input, target } => {
            let report = convert_ops::best_path(&engine, &options, &input, &target);
            if cli.json {
                print_json(&report);
            } else {
                println!("{}", convert_ops::format_best_path(&report));
            }
            if !report.valid {
                process::exit(2);
            }
        }

        Command::Rules {
            producing,
            restricted,
            ..
        } => {
            let rows = rules_ops::list(&engine, producing, restricted);
            if cli.json {
                print_json(&rows);
            } else {
                print!("{}", rules_ops::format_table(&rows));
            }
        }

        Command::Train { targets } => {
            let stdout = io::stdout();
            let out = LineFlush(BufWriter::new(stdout.lock()));
            let trainer = Trainer::new(Arc::new(engine), options, targets, out);
            let summary = die!(trainer.run(io::stdin().lock()), "Error: {}");
            if cli.json {
                print_json(&summary);
            }
        }
    }
}

/// Flushes after every line so prompts show up before stdin blocks.
struct LineFlush<W: Write>(W);

impl<W: Write> Write for LineFlush<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.0.write(buf)?;
        if buf[..n].contains(&b'\n') {
            self.0.flush()?;
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}
