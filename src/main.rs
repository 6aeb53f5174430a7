use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use questline::{
    LevelConfig, LoadError, LoggingSoundBackend, QuestJournal, QuestObserver, QuestRegistry,
    SoundObserver,
};

const USAGE: &str = "usage: questline-demo [DATA_DIR] [--json]";

struct CliOptions {
    data_dir: PathBuf,
    json: bool,
}

impl CliOptions {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut data_dir = None;
        let mut json = false;

        for arg in args {
            match arg.as_str() {
                "--json" => json = true,
                "-h" | "--help" => return Err(USAGE.to_string()),
                flag if flag.starts_with('-') => {
                    return Err(format!("unknown option '{flag}'\n{USAGE}"));
                }
                path if data_dir.is_none() => data_dir = Some(PathBuf::from(path)),
                extra => return Err(format!("unexpected argument '{extra}'\n{USAGE}")),
            }
        }

        Ok(Self {
            data_dir: data_dir.unwrap_or_else(|| PathBuf::from("data")),
            json,
        })
    }
}

fn main() {
    let options = match CliOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    // The level config carries the log filter, so it is read before logging starts
    let level = match LevelConfig::load_from_directory(&options.data_dir) {
        Ok(level) => level,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    init_logging(level.log_filter.as_deref());

    if let Err(err) = run(&options, level) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(extra: Option<&str>) {
    let mut filter = EnvFilter::from_default_env();
    for directive in std::iter::once("questline=info").chain(extra) {
        match directive.parse::<Directive>() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(err) => eprintln!("Ignoring log filter '{directive}': {err}"),
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(options: &CliOptions, level: LevelConfig) -> Result<(), LoadError> {
    let mut registry = QuestRegistry::new();
    registry.load_from_directory(&options.data_dir)?;

    let backend = Arc::new(LoggingSoundBackend::new());
    let journal = Arc::new(QuestJournal::new());
    let observers: Vec<Arc<dyn QuestObserver>> = vec![
        Arc::new(SoundObserver::new(level.sounds.clone(), backend.clone())),
        journal.clone(),
    ];

    let mut handler = registry.instantiate(level.player.progression(), &observers)?;
    info!(
        "Level '{}' ready: {} quests ({} starting), {} scripted events",
        level.name,
        registry.count(),
        registry.starting_quests().count(),
        level.events.len()
    );

    for (step, event) in level.events.iter().enumerate() {
        let outcome = handler.handle(event);
        if options.json {
            match serde_json::to_string(&outcome) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!("Failed to serialize outcome: {}", err),
            }
        } else {
            println!(
                "[{}] {:?} -> goals completed {:?}, quests completed {:?}, activated {:?}, +{} exp",
                step + 1,
                event,
                outcome.goals_completed,
                outcome.quests_completed,
                outcome.quests_activated,
                outcome.exp_granted()
            );
        }
    }

    if options.json {
        match serde_json::to_string(&journal.snapshot()) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!("Failed to serialize journal: {}", err),
        }
        return Ok(());
    }

    println!("\nJournal:");
    for line in journal.lines() {
        println!("  {line}");
    }
    println!("Sounds played: {:?}", backend.played());

    let progression = handler.progression();
    println!(
        "Player: level {} ({} exp, {:.0}% of level, {} to next), {} items",
        progression.level,
        progression.exp,
        progression.level_progress() * 100.0,
        progression.exp_to_next_level(),
        progression.inventory.len()
    );
    if handler.is_complete() {
        println!("All quests completed");
    }

    Ok(())
}
