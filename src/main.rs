use clap::{Parser, Subcommand};
use crossbeam_channel::unbounded;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use libras_quiz::{
    App, AppConfig, OperandRange, OperationRanges, QuestionGenerator, SqliteStore, TierPlan, logger,
    spawn_stats_worker, teacher, ui,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "libras-quiz", version, about = "Arithmetic quiz with LIBRAS number signs")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Seed for question generation
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Keep new accounts blocked until `confirm` is run
    #[arg(long, global = true)]
    require_confirmation: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the terminal quiz (default)
    Play,

    /// Print a generated question set as JSON
    Generate {
        /// Three questions per operation from the given ranges instead of
        /// the tiered default session
        #[arg(long)]
        teacher: bool,

        /// Addition operand range, e.g. 1..20
        #[arg(long, value_parser = parse_range)]
        add: Option<OperandRange>,

        /// Subtraction operand range
        #[arg(long, value_parser = parse_range)]
        sub: Option<OperandRange>,

        /// Multiplication operand range
        #[arg(long, value_parser = parse_range)]
        mul: Option<OperandRange>,

        /// Division quotient range
        #[arg(long, value_parser = parse_range)]
        div: Option<OperandRange>,
    },

    /// Mark an account's email as confirmed
    Confirm { email: String },
}

fn parse_range(s: &str) -> Result<OperandRange, String> {
    let (min, max) = s
        .split_once("..")
        .ok_or_else(|| format!("expected MIN..MAX, got '{}'", s))?;
    let min = min
        .trim()
        .parse()
        .map_err(|_| format!("invalid minimum '{}'", min))?;
    let max = max
        .trim()
        .parse()
        .map_err(|_| format!("invalid maximum '{}'", max))?;
    Ok(OperandRange::new(min, max))
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().map_err(io::Error::other)?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.require_confirmation {
        config.require_confirmation = true;
    }

    logger::init_at(&config.log_path);
    logger::log(&format!("Starting with {:?}", config));

    let seed = config.seed.unwrap_or_else(rand::random);
    let generator = QuestionGenerator::with_rng(ChaCha8Rng::seed_from_u64(seed))
        .with_max_attempts(config.max_attempts);

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => play(&config, generator),
        Command::Generate {
            teacher: custom,
            add,
            sub,
            mul,
            div,
        } => {
            let mut ranges = if custom {
                teacher::default_ranges()
            } else {
                OperationRanges::default()
            };
            ranges.addition = add.unwrap_or(ranges.addition);
            ranges.subtraction = sub.unwrap_or(ranges.subtraction);
            ranges.multiplication = mul.unwrap_or(ranges.multiplication);
            ranges.division = div.unwrap_or(ranges.division);
            generate(generator, custom, ranges)
        }
        Command::Confirm { email } => {
            let store = open_store(&config)?;
            store
                .confirm_email(email.trim())
                .map_err(io::Error::other)?;
            println!("Email confirmado: {}", email.trim());
            Ok(())
        }
    }
}

fn open_store(config: &AppConfig) -> io::Result<SqliteStore> {
    SqliteStore::open(&config.db_path)
        .map(|store| store.with_confirmation(config.require_confirmation))
        .map_err(io::Error::other)
}

fn generate(
    mut generator: QuestionGenerator<ChaCha8Rng>,
    custom: bool,
    ranges: OperationRanges,
) -> io::Result<()> {
    let questions = if custom {
        teacher::generate_from_ranges(&mut generator, &ranges)
    } else {
        generator.default_session(&TierPlan {
            ranges,
            ..TierPlan::default()
        })
    }
    .map_err(io::Error::other)?;

    let json = serde_json::to_string_pretty(&questions).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

fn play(config: &AppConfig, generator: QuestionGenerator<ChaCha8Rng>) -> io::Result<()> {
    let store = open_store(config)?;
    let worker_store = open_store(config)?;

    let (stats_tx, stats_rx) = unbounded();
    let (response_tx, response_rx) = unbounded();
    let worker = spawn_stats_worker(worker_store, response_tx, stats_rx)?;

    let mut app = App::new(store, generator, stats_tx, response_rx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Dropping the app closes the request channel so the worker can finish
    // pending writes and exit.
    drop(app);
    if worker.join().is_err() {
        logger::error("Stats worker panicked");
    }

    if let Err(e) = &result {
        logger::error(&format!("Terminal loop failed: {}", e));
    }
    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App<SqliteStore>) -> io::Result<()> {
    loop {
        app.poll_stats();

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
