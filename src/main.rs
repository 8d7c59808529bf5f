use log::{info, warn};
use mate_trainer::build_info;
use mate_trainer::cli::board::render_board;
use mate_trainer::cli::{parse_command, Command, HELP};
use mate_trainer::config::{AppConfig, PuzzleSource};
use mate_trainer::puzzle::{HttpRepository, MemoryRepository, PuzzleRepository};
use mate_trainer::rules::ChessEngineRules;
use mate_trainer::session::{
    FailReason, MoveReport, SessionController, SessionError, Status, TickOutcome,
};
use mate_trainer::stats::{format_clock, PuzzleStats, ResultTracker, StatsStore};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut free_play = false;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_string());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("Mate Trainer - Checkmate Puzzles in the Terminal\n");
                println!("Usage: mate-trainer [options]\n");
                println!("Options:");
                println!("  --config <path>  Read settings from this file");
                println!("  --free           Start in free play");
                println!("  --version        Show version information");
                println!("  --help           Show this help message");
                println!("\nSet RUST_LOG=debug for session logs.");
                std::process::exit(0);
            }
            "--free" => free_play = true,
            "--config" => match rest.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--config needs a path");
                    std::process::exit(1);
                }
            },
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'mate-trainer --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    let mut config = match config_path {
        Some(path) => AppConfig::load_from(&path)?,
        None => AppConfig::load(),
    };
    if free_play {
        config.free_play = true;
    }

    match config.source.clone() {
        PuzzleSource::Builtin => Trainer::new(MemoryRepository::builtin(), &config).run(),
        PuzzleSource::File { path } => {
            let repository = MemoryRepository::from_json_file(&path)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            Trainer::new(repository, &config).run()
        }
        PuzzleSource::Http { base_url } => {
            let repository = HttpRepository::new(&base_url);
            info!("puzzles from {}", repository.base_url());
            Trainer::new(repository, &config).run()
        }
    }
}

/// Interactive loop around one controller.
struct Trainer<R: PuzzleRepository> {
    controller: SessionController<ChessEngineRules, R>,
    stats: PuzzleStats,
    store: Option<StatsStore>,
    tracker: ResultTracker,
    tick: Duration,
}

impl<R: PuzzleRepository> Trainer<R> {
    fn new(repository: R, config: &AppConfig) -> Self {
        let store = match StatsStore::new() {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("statistics will not be saved: {}", e);
                None
            }
        };
        let stats = match store.as_ref().map(StatsStore::load_or_default) {
            Some(Ok(stats)) => stats,
            Some(Err(e)) => {
                warn!("could not read statistics, starting fresh: {}", e);
                PuzzleStats::default()
            }
            None => PuzzleStats::default(),
        };

        Self {
            controller: SessionController::new(
                ChessEngineRules::new(),
                repository,
                config.controller_options(),
            ),
            stats,
            store,
            tracker: ResultTracker::new(),
            tick: Duration::from_millis(config.tick_millis),
        }
    }

    fn run(&mut self) -> io::Result<()> {
        println!("Mate Trainer. Type 'help' for commands.\n");
        match self.controller.load_new() {
            Ok(()) => self.on_loaded(),
            Err(e) => println!("{}", e),
        }

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("> ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;

            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            if let Err(e) = self.execute(command) {
                println!("{}", e);
            }
            self.wait_for_reply();
            self.record_finish();
        }

        self.save_stats();
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<(), SessionError> {
        match command {
            Command::Move {
                from,
                to,
                promotion,
            } => {
                let report = self.controller.attempt_move(from, to, promotion)?;
                print_move(&report);
                if report.reply.is_none() {
                    self.show_board();
                }
            }
            Command::Undo => {
                let undo = self.controller.undo()?;
                println!("Took back {} ply(s).", undo.plies_removed);
                if undo.reply.is_none() {
                    self.show_board();
                }
            }
            Command::Reset => {
                self.controller.reset()?;
                self.begin_tracking();
                println!("Puzzle reset.");
                self.show_board();
            }
            Command::Hint => println!("Hint: {}", self.controller.request_hint()?),
            Command::Solution => {
                let solution = self.controller.reveal_solution()?;
                if solution.is_empty() {
                    println!("No solution on record for this puzzle.");
                } else {
                    let moves: Vec<&str> = solution.iter().map(|m| m.san.as_str()).collect();
                    println!("Solution: {}", moves.join(" "));
                }
            }
            Command::SetMode(mode) => {
                self.controller.set_mode(mode)?;
                println!("Mode: {}", mode);
                if self.controller.puzzle().is_some() {
                    self.on_loaded();
                }
            }
            Command::Next => {
                self.controller.next()?;
                self.on_loaded();
            }
            Command::Previous => {
                self.controller.previous()?;
                self.on_loaded();
            }
            Command::Goto(number) => {
                self.controller.load_by_index(number - 1)?;
                self.on_loaded();
            }
            Command::New => {
                self.controller.load_new()?;
                self.on_loaded();
            }
            Command::GiveUp => {
                self.controller.abandon()?;
            }
            Command::Status => self.show_status(),
            Command::Stats => println!("{}", self.stats.summary()),
            Command::Board => self.show_board(),
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
        Ok(())
    }

    /// Drive the clock until the opponent has replied.
    fn wait_for_reply(&mut self) {
        if !self.controller.is_thinking() {
            return;
        }
        println!("Opponent is thinking...");
        loop {
            thread::sleep(self.tick);
            match self.controller.tick() {
                TickOutcome::Thinking { .. } => continue,
                TickOutcome::Replied(report) => {
                    print_move(&report);
                    self.show_board();
                }
                TickOutcome::NoReply(e) => println!("{}. Try 'undo'.", e),
                TickOutcome::Idle => {}
            }
            break;
        }
    }

    /// Count each finished result once, and announce it.
    fn record_finish(&mut self) {
        let Some(session) = self.controller.session() else {
            return;
        };
        let status = session.status();
        let Some(elapsed) = self.tracker.observe(session.id(), status, &mut self.stats) else {
            return;
        };
        info!("recorded {} in {}s", status, elapsed);

        let message = match status {
            Status::Solved => format!("Puzzle solved in {}!", format_clock(elapsed)),
            Status::Failed(FailReason::OpponentMated) => {
                "The opponent delivered mate. Try 'undo' or 'reset'.".to_string()
            }
            Status::Failed(FailReason::MoveLimitReached) => {
                "No mate within the move limit. Try 'undo' or 'reset'.".to_string()
            }
            Status::Drawn => "Draw. Try 'undo' or 'reset'.".to_string(),
            Status::Aborted => "Puzzle abandoned. Type 'new' for another.".to_string(),
            Status::InProgress => return,
        };
        println!("{}", message);
        self.save_stats();
    }

    fn begin_tracking(&mut self) {
        if let Some(session) = self.controller.session() {
            self.tracker.begin(session.id());
        }
    }

    fn on_loaded(&mut self) {
        self.begin_tracking();
        if let Some(puzzle) = self.controller.puzzle() {
            println!("\n{} [{}]", puzzle.label(), self.controller.mode());
        }
        if let Some(session) = self.controller.session() {
            println!("{} to move.", session.player_side());
        }
        self.show_board();
    }

    fn show_board(&self) {
        let (Some(position), Some(session)) =
            (self.controller.current_position(), self.controller.session())
        else {
            println!("No puzzle loaded.");
            return;
        };
        println!("\n{}\n", render_board(position, session.player_side()));
        if let Some(summary) = self.controller.position_summary() {
            println!("{}", summary);
        }
    }

    fn show_status(&self) {
        let (Some(puzzle), Some(session)) = (self.controller.puzzle(), self.controller.session())
        else {
            println!("No puzzle loaded.");
            return;
        };
        println!("Puzzle:  {}", puzzle.label());
        println!("Mode:    {}", session.mode());
        println!("Ply:     {}", session.ply_count());
        if let Some(left) = session.plies_remaining() {
            println!("Left:    {} ply(s)", left);
        }
        println!("Status:  {}", session.status());
        println!("Time:    {}", format_clock(self.tracker.timer().elapsed_secs()));
    }

    fn save_stats(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.stats) {
                warn!("could not save statistics: {}", e);
            }
        }
    }
}

fn print_move(report: &MoveReport) {
    println!("{}. {} plays {}", report.ply, report.mover, report.notation);
}
