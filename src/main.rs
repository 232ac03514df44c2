use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use snake_engine::config::Config;
use snake_engine::{
    autopilot, consts, BoundaryMode, LevelSize, Phase, Session, SnakeSimulation, Speed,
};
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: snake-engine [<options>]

Play games of Snake without a display, steered by a simple autopilot

Options:
  --config <PATH>     Read configuration from the given file
  --size <SIZE>       Level size: small, medium, or large
  --wrap              Let the snake pass through the edges of the grid
  --speed <N>         Simulation speed in ticks per second (1-30)
  --games <N>         Stop after this many games have ended [default: 1]
  --seed <N>          Seed the random number generator
  --json              Print a JSON snapshot of the game after every tick
  -h, --help          Display this help message and exit
  -V, --version       Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Arguments),
    Help,
    Version,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    size: Option<LevelSize>,
    wrap: bool,
    speed: Option<Speed>,
    games: u32,
    seed: Option<u64>,
    json: bool,
}

impl Default for Arguments {
    fn default() -> Arguments {
        Arguments {
            config: None,
            size: None,
            wrap: false,
            speed: None,
            games: 1,
            seed: None,
            json: false,
        }
    }
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("config") => args.config = Some(PathBuf::from(parser.value()?)),
                Arg::Long("size") => args.size = Some(parser.value()?.parse()?),
                Arg::Long("wrap") => args.wrap = true,
                Arg::Long("speed") => args.speed = Some(parser.value()?.parse()?),
                Arg::Long("games") => args.games = parser.value()?.parse()?,
                Arg::Long("seed") => args.seed = Some(parser.value()?.parse()?),
                Arg::Long("json") => args.json = true,
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(args))
    }
}

impl Arguments {
    fn run(self) -> anyhow::Result<()> {
        let mut config = match self.config.as_deref() {
            Some(path) => Config::load(path, false),
            None => Config::load(&Config::default_path()?, true),
        }
        .context("failed to load configuration")?;
        if let Some(size) = self.size {
            config
                .game
                .set_level_size(size)
                .context("invalid level size")?;
        }
        if self.wrap {
            config.game.boundary = BoundaryMode::Wrapping;
        }
        if let Some(speed) = self.speed {
            config.game.speed = speed;
        }
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let simulation =
            SnakeSimulation::new_with_rng(config.settings(), config.score_store(), rng)
                .context("failed to start game")?;
        let mut session =
            Session::new(simulation, config.game.speed).with_auto_restart(config.game.auto_restart);
        tracing::info!(
            grid = %config.settings().grid,
            boundary = %config.game.boundary,
            speed = %config.game.speed,
            games = self.games,
            "Starting headless session"
        );
        let mut stdout = io::stdout().lock();
        let mut finished = 0;
        let mut last = Instant::now();
        while finished < self.games {
            std::thread::sleep(consts::FRAME_INTERVAL);
            let now = Instant::now();
            let elapsed = now.duration_since(last);
            last = now;
            let Some(snapshot) = session.frame(elapsed) else {
                continue;
            };
            if self.json {
                serde_json::to_writer(&mut stdout, &snapshot).map_err(io::Error::from)?;
                writeln!(stdout)?;
                stdout.flush()?;
            }
            if let Phase::Terminated(cause) = snapshot.state.phase() {
                finished += 1;
                tracing::info!(
                    game = finished,
                    %cause,
                    score = snapshot.state.score(),
                    ticks = snapshot.tick,
                    best_score = snapshot.best_score,
                    "Game over"
                );
                if !session.auto_restart() && finished < self.games {
                    session.reset();
                }
            } else if let Some(direction) = autopilot::steer(&snapshot) {
                let _ = session.request_direction(direction);
            }
        }
        Ok(())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    match Command::from_parser(Parser::from_env()) {
        Ok(Command::Run(args)) => {
            init_tracing();
            exit(args.run())
        }
        Ok(Command::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Command::Version) => {
            println!("snake-engine {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("snake-engine: {e}\n\n{USAGE}");
            ExitCode::from(2)
        }
    }
}

fn exit(r: anyhow::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e.downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("snake-engine: {e:#}");
            ExitCode::from(2)
        }
    }
}
