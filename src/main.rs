use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use refrain::{
    app_dirs::AppDirs,
    catalog::Catalog,
    config::{Config, ConfigStore, FileConfigStore},
    dictation::{DictationScore, PhraseBank},
    leaderboard::{GameMode, Leaderboard, ScoreId},
    reference::{Transcript, TranscriptSource},
    runtime::{ChannelSource, Countdown, FixedTicker, Runner, SessionEvent, StopReason},
    scoring::{score_with, Score},
    session::{RecognitionEvent, RecordingSession},
    word::{to_words, RawWord},
};
use serde::Serialize;
use std::{
    error::Error,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// score sung or spoken refrains against reference lyrics
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Align recognized words against a reference refrain and score accuracy, recognizer confidence and timing or rhythm."
)]
pub struct Cli {
    /// config file to use instead of the per-user one
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// leaderboard database path
    #[clap(long, global = true)]
    db: Option<PathBuf>,

    /// directory of song files to use instead of the built-in refrains
    #[clap(long, global = true)]
    catalog: Option<PathBuf>,

    /// more logging (-v info, -vv debug, -vvv trace)
    #[clap(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// list the songs in the catalog
    Songs,

    /// score a list of recognized words against a song
    Score {
        /// song key from the catalog (defaults to the configured song)
        #[clap(short = 's', long)]
        song: Option<String>,

        /// JSON array of recognized words, or - for stdin
        #[clap(short = 'w', long)]
        words: PathBuf,

        /// transcript file to score against instead of a catalog song
        #[clap(short = 'r', long, conflicts_with = "song")]
        reference: Option<PathBuf>,

        /// print the score as JSON
        #[clap(long)]
        json: bool,

        /// record the result on the leaderboard
        #[clap(long)]
        save: bool,
    },

    /// replay a recorded stream of recognition events and score it
    Replay {
        /// song key from the catalog (defaults to the configured song)
        #[clap(short = 's', long)]
        song: Option<String>,

        /// newline-delimited JSON recognition events
        #[clap(short = 'e', long)]
        events: PathBuf,

        /// recording window in seconds (defaults to the song's own)
        #[clap(long)]
        secs: Option<u32>,

        /// print the score as JSON
        #[clap(long)]
        json: bool,

        /// record the result on the leaderboard
        #[clap(long)]
        save: bool,
    },

    /// print a random phrase for the dictation game
    Phrase,

    /// score a typed answer to a dictated phrase
    Dictation {
        /// the phrase that was played
        #[clap(short = 'p', long)]
        phrase: String,

        /// what the player typed
        #[clap(short = 'a', long)]
        answer: String,

        /// seconds the player took to answer
        #[clap(long, default_value_t = 0.0, value_parser = parse_response_secs)]
        secs: f64,

        /// print the score as JSON
        #[clap(long)]
        json: bool,

        /// record the result on the leaderboard
        #[clap(long)]
        save: bool,
    },

    /// put a name on a saved result
    Claim {
        /// id printed when the result was saved
        #[clap(long)]
        id: String,

        /// player name
        #[clap(short = 'n', long)]
        name: String,
    },

    /// show the best named results
    Leaderboard {
        #[clap(short = 'm', long, value_enum, default_value_t = GameMode::Singing)]
        mode: GameMode,

        /// number of entries (defaults to the configured size)
        #[clap(short = 'l', long)]
        limit: Option<usize>,

        /// write the whole board to a CSV file instead
        #[clap(long)]
        csv: Option<PathBuf>,
    },
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn db_path(&self) -> PathBuf {
        self.db.clone().unwrap_or_else(AppDirs::db_path)
    }

    fn load_catalog(&self) -> Result<Catalog, Box<dyn Error>> {
        let catalog = match &self.catalog {
            Some(dir) => Catalog::load_dir(dir)?,
            None => Catalog::builtin()?,
        };
        Ok(catalog)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = cli.config_store().load();
    init_logging(cli.verbose, &config)?;

    match cli.command.clone() {
        Command::Songs => list_songs(&cli.load_catalog()?),
        Command::Score {
            song,
            words,
            reference,
            json,
            save,
        } => {
            let (song_key, transcript) = match reference {
                Some(path) => (None, read_transcript(&path)?),
                None => {
                    let key = resolve_song(song, &config);
                    let catalog = cli.load_catalog()?;
                    let transcript = catalog.get(&key)?.transcript.clone();
                    (Some(key), transcript)
                }
            };

            let raw: Vec<RawWord> = serde_json::from_str(&read_input(&words)?)?;
            let score = score_with(&to_words(&raw), &transcript.reference, &config.scoring);
            let id = save
                .then(|| save_result(&cli, GameMode::Singing, song_key.as_deref(), score.overall))
                .transpose()?;
            print_score(&score, json, id.as_ref())
        }
        Command::Replay {
            song,
            events,
            secs,
            json,
            save,
        } => {
            let key = resolve_song(song, &config);
            let catalog = cli.load_catalog()?;
            let transcript = &catalog.get(&key)?.transcript;
            let events = read_events(&events)?;
            let secs = secs.unwrap_or(transcript.duration_secs);

            let (session, reason) = replay(events, secs);
            match reason {
                StopReason::StreamClosed => log::info!("replay finished before the window"),
                StopReason::TimeUp => log::info!("replay cut off after {secs}s"),
            }

            if !json {
                println!("heard: {}", session.transcript().trim_end());
            }
            let score = session.score(&transcript.reference, &config.scoring);
            let id = save
                .then(|| save_result(&cli, GameMode::Singing, Some(&key), score.overall))
                .transpose()?;
            print_score(&score, json, id.as_ref())
        }
        Command::Phrase => {
            let bank = PhraseBank::builtin()?;
            match bank.random(&mut rand::thread_rng()) {
                Some(phrase) => println!("{phrase}"),
                None => log::warn!("phrase bank {} is empty", bank.name),
            }
            Ok(())
        }
        Command::Dictation {
            phrase,
            answer,
            secs,
            json,
            save,
        } => {
            let score = DictationScore::compute(&phrase, &answer, secs);
            let id = save
                .then(|| save_result(&cli, GameMode::Dictation, None, score.total))
                .transpose()?;

            if json {
                return print_json(&score, id.as_ref());
            }
            println!("distance    {}", score.distance);
            println!("accuracy    {}", score.accuracy);
            println!("time bonus  {}", score.time_bonus);
            println!("total       {}", score.total);
            print_saved(id.as_ref());
            Ok(())
        }
        Command::Claim { id, name } => {
            if name.trim().is_empty() {
                let mut cmd = Cli::command();
                cmd.error(ErrorKind::InvalidValue, "name must not be empty")
                    .exit();
            }
            let board = Leaderboard::open(cli.db_path())?;
            let id = ScoreId::from(id.as_str());
            if board.claim(&id, &name)? {
                println!("claimed {id} as {}", name.trim());
            } else {
                println!("no unclaimed result with id {id}");
            }
            Ok(())
        }
        Command::Leaderboard { mode, limit, csv } => {
            let board = Leaderboard::open(cli.db_path())?;
            if let Some(path) = csv {
                let file = fs::File::create(&path)?;
                board.export_csv(mode, file)?;
                println!("wrote {mode} leaderboard to {}", path.display());
                return Ok(());
            }

            let entries = board.top(mode, limit.unwrap_or(config.leaderboard_size))?;
            if entries.is_empty() {
                println!("no named {mode} results yet");
            }
            for (rank, entry) in entries.iter().enumerate() {
                println!(
                    "{:>3}. {:<20} {:>3}  {:<22} {}",
                    rank + 1,
                    entry.name,
                    entry.points,
                    entry.song_key.as_deref().unwrap_or("-"),
                    entry.recorded_at.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }
    }
}

fn parse_response_secs(raw: &str) -> Result<f64, String> {
    let secs: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if secs.is_finite() && secs >= 0.0 {
        Ok(secs)
    } else {
        Err(format!("{raw} is not a non-negative number of seconds"))
    }
}

fn init_logging(verbose: u8, config: &Config) -> Result<(), Box<dyn Error>> {
    let level = match verbose {
        0 => config.level_filter(),
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    simple_logger::SimpleLogger::new()
        .with_level(level)
        .with_colors(true)
        .with_local_timestamps()
        .init()?;
    Ok(())
}

fn list_songs(catalog: &Catalog) -> Result<(), Box<dyn Error>> {
    for song in catalog.songs() {
        let kind = if song.transcript.reference.is_timed() {
            "timed"
        } else {
            "plain"
        };
        println!(
            "{:<22} {:<28} {:<5} {:<5} {}s",
            song.key, song.title, kind, song.transcript.language, song.transcript.duration_secs
        );
    }
    Ok(())
}

fn resolve_song(song: Option<String>, config: &Config) -> String {
    match song.or_else(|| config.default_song.clone()) {
        Some(key) => key,
        None => {
            let mut cmd = Cli::command();
            cmd.error(
                ErrorKind::MissingRequiredArgument,
                "no --song given and no default_song configured",
            )
            .exit();
        }
    }
}

fn read_input(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn read_transcript(path: &Path) -> Result<Transcript, Box<dyn Error>> {
    let source: TranscriptSource = serde_json::from_str(&read_input(path)?)?;
    Ok(source.into())
}

fn read_events(path: &Path) -> Result<Vec<RecognitionEvent>, Box<dyn Error>> {
    let mut events = Vec::new();
    for (n, line) in read_input(path)?.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(line)
            .map_err(|e| format!("{}:{}: {e}", path.display(), n + 1))?;
        events.push(event);
    }
    Ok(events)
}

/// Feeds the events from a producer thread, the way a live recognizer would.
fn replay(events: Vec<RecognitionEvent>, secs: u32) -> (RecordingSession, StopReason) {
    let (tx, rx) = mpsc::channel();
    let producer = thread::spawn(move || {
        for event in events {
            if tx.send(SessionEvent::Recognition(event)).is_err() {
                break;
            }
        }
    });

    let runner = Runner::new(
        ChannelSource::new(rx),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let mut session = RecordingSession::new();
    let reason = runner.record(&mut session, Countdown::from_secs(secs));

    drop(runner);
    if producer.join().is_err() {
        log::error!("event producer panicked");
    }
    (session, reason)
}

/// Pretty JSON on stdout; a saved result's id rides along as `scoreId`.
fn print_json<T: Serialize>(value: &T, id: Option<&ScoreId>) -> Result<(), Box<dyn Error>> {
    let mut value = serde_json::to_value(value)?;
    if let (Some(id), Some(object)) = (id, value.as_object_mut()) {
        object.insert("scoreId".to_string(), id.as_str().into());
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_saved(id: Option<&ScoreId>) {
    if let Some(id) = id {
        println!("saved as {id} (claim with: refrain claim --id {id} --name <NAME>)");
    }
}

fn print_score(score: &Score, json: bool, id: Option<&ScoreId>) -> Result<(), Box<dyn Error>> {
    if json {
        return print_json(score, id);
    }

    println!("overall     {}", score.overall);
    println!("accuracy    {}", score.accuracy);
    println!("confidence  {}", score.confidence);
    println!(
        "{:<11} {}",
        score.cadence.label().to_lowercase(),
        score.cadence.points()
    );
    print_saved(id);
    Ok(())
}

fn save_result(
    cli: &Cli,
    mode: GameMode,
    song_key: Option<&str>,
    points: u8,
) -> Result<ScoreId, Box<dyn Error>> {
    let board = Leaderboard::open(cli.db_path())?;
    Ok(board.record(mode, song_key, points)?)
}
