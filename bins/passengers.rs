use std::{path::Path, process::ExitCode};

use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

use common::{env::env_override, utils::logging};
use configs::AppConfig;
use service::{JsonFileStorage, PassengerStore, ServiceError};

const USAGE: &str = "usage: passengers <list | show <id> | remove <id> | migrate>";

enum Command {
    List,
    Show(String),
    Remove(String),
    Migrate,
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        match args {
            [cmd] if cmd == "list" => Some(Command::List),
            [cmd] if cmd == "migrate" => Some(Command::Migrate),
            [cmd, id] if cmd == "show" => Some(Command::Show(id.clone())),
            [cmd, id] if cmd == "remove" => Some(Command::Remove(id.clone())),
            _ => None,
        }
    }
}

fn init_logging() {
    // .env may carry RUST_LOG / PASSENGERS_LOG_FORMAT
    dotenv().ok();
    match env_override("PASSENGERS_LOG_FORMAT").as_deref() {
        Some("json") => logging::init_logging_json(),
        _ => logging::init_logging_default(),
    }
}

fn run(cmd: Command, cfg: &AppConfig) -> anyhow::Result<ExitCode> {
    let data_file = Path::new(&cfg.storage.data_file);
    common::env::ensure_data_dir(data_file)?;
    let storage = JsonFileStorage::open(data_file)?;
    let store = PassengerStore::from_config(storage, cfg);

    match cmd {
        Command::List => {
            for p in store.load() {
                println!("{}\t{}\t{}", p.id, store.display_name(&p), store.document_line(&p));
            }
        }
        Command::Show(id) => {
            let Some(p) = store.get_by_id(&id) else {
                error!(%id, event = "show_failed", error = %ServiceError::not_found("passenger"), "no such passenger");
                return Ok(ExitCode::FAILURE);
            };
            println!("{}", serde_json::to_string_pretty(&p)?);
        }
        Command::Remove(id) => {
            let removed = store.remove(&id)?;
            info!(%id, removed, event = "remove", "remove finished");
        }
        Command::Migrate => {
            let count = store.load().len();
            info!(count, key = store.storage_key(), event = "migrate", "passenger list is in current shape");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging();

    let run_id = Uuid::new_v4();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "passengers", event = "panic", %run_id, message = %info, "unhandled panic occurred");
    }));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(cmd) = Command::parse(&args) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let cfg = match AppConfig::load_or_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "passengers", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(service = "passengers", event = "start", %run_id, version, data_file = %cfg.storage.data_file, "passengers starting");

    match run(cmd, &cfg) {
        Ok(code) => code,
        Err(e) => {
            error!(service = "passengers", event = "run_failed", %run_id, error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}
