mod autopilot;
mod export;
mod render;
mod settings;
mod theme;

use autopilot::{Autopilot, CycleCache, Game, Outcome};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use hamcycle_core::{CycleConfig, HamiltonianCycle, OddGridPolicy};
use settings::Settings;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use theme::Theme;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "hamcycle")]
#[command(version, about = "Build Hamiltonian cycles on grids and drive a snake along them")]
struct Cli {
    #[command(flatten)]
    grid: GridArgs,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Grid options; anything left out comes from the settings file and environment
#[derive(Args)]
struct GridArgs {
    /// Number of rows
    #[arg(long, global = true)]
    rows: Option<usize>,

    /// Number of columns
    #[arg(long, global = true)]
    cols: Option<usize>,

    /// Largest block solved by exhaustive search
    #[arg(long, value_name = "CELLS", global = true)]
    max_block_size: Option<usize>,

    /// Merge blocks in grid order instead of a random order
    #[arg(long, global = true)]
    no_shuffle: bool,

    /// Seed for the merge order
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// On odd x odd grids, leave (0, 0) out of the cycle
    #[arg(long, global = true)]
    exclude_corner: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Draw the cycle in the terminal
    Show {
        /// Also draw the block partition
        #[arg(long)]
        blocks: bool,

        #[arg(long, value_enum, default_value = "dark")]
        theme: ThemeChoice,

        /// Plain text without colors
        #[arg(long)]
        no_color: bool,
    },
    /// Write the cycle as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
    /// Let the autopilot play snake games on the cycle
    Play {
        /// Number of games; the cycle is built once and reused
        #[arg(long, default_value = "1")]
        games: usize,

        /// Stop a game after this many moves
        #[arg(long, default_value = "1000000")]
        max_steps: usize,

        /// Seed for food placement
        #[arg(long)]
        food_seed: Option<u64>,
    },
    /// Print the effective settings as JSON
    Settings {
        /// Store them as the new defaults
        #[arg(long)]
        save: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeChoice {
    Dark,
    Light,
    HighContrast,
}

impl ThemeChoice {
    fn theme(self) -> Theme {
        match self {
            ThemeChoice::Dark => Theme::dark(),
            ThemeChoice::Light => Theme::light(),
            ThemeChoice::HighContrast => Theme::high_contrast(),
        }
    }
}

impl GridArgs {
    /// Settings with command-line values laid over them
    fn settings(&self) -> Settings {
        let mut settings = Settings::load();
        if let Some(rows) = self.rows {
            settings.rows = rows;
        }
        if let Some(cols) = self.cols {
            settings.cols = cols;
        }
        if let Some(max) = self.max_block_size {
            settings.max_block_size = max;
        }
        if self.no_shuffle {
            settings.shuffle = false;
        }
        settings
    }

    fn config(&self, settings: &Settings) -> CycleConfig {
        let mut config = settings.to_config();
        if let Some(seed) = self.seed {
            config = config.seed(seed);
        }
        if self.exclude_corner {
            config = config.odd_grid(OddGridPolicy::ExcludeCorner);
        }
        config
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = cli.grid.settings();
    let config = cli.grid.config(&settings);

    match cli.command {
        Command::Show {
            blocks,
            theme,
            no_color,
        } => {
            let cycle = HamiltonianCycle::build(&config)?;
            let theme = (!no_color).then(|| theme.theme());
            let mut stdout = io::stdout().lock();
            if blocks {
                render::draw_blocks(&mut stdout, &cycle, theme.as_ref())?;
                writeln!(stdout)?;
            }
            render::draw_cycle(&mut stdout, &cycle, theme.as_ref())?;
        }
        Command::Export { output, pretty } => {
            let cycle = HamiltonianCycle::build(&config)?;
            match output {
                Some(path) => {
                    let mut file = BufWriter::new(File::create(&path)?);
                    export::write_json(&mut file, &cycle, pretty)?;
                    file.flush()?;
                    info!(path = %path.display(), "exported cycle");
                }
                None => export::write_json(&mut io::stdout().lock(), &cycle, pretty)?,
            }
        }
        Command::Play {
            games,
            max_steps,
            food_seed,
        } => {
            let mut cycles = CycleCache::new();
            for game_no in 0..games {
                let autopilot = Autopilot::new(cycles.get_or_build(&config)?);
                let seed = food_seed.map(|seed| seed.wrapping_add(game_no as u64));
                let report = Game::new(&autopilot, seed).play(&autopilot, max_steps);
                let verdict = match report.outcome {
                    Outcome::Filled => "board filled".to_string(),
                    Outcome::StepLimit => "step limit".to_string(),
                    Outcome::Crashed(cell) => format!("crashed at {}", cell),
                };
                println!(
                    "game {}: score {} in {} steps, length {} ({})",
                    game_no + 1,
                    report.score,
                    report.steps,
                    report.length,
                    verdict
                );
            }
            info!(games, cycles = cycles.len(), "finished playing");
        }
        Command::Settings { save } => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            if save {
                let path = settings.save()?;
                eprintln!("Saved to {}", path.display());
            }
        }
    }

    Ok(())
}
