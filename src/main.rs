//! Bingo Engine native entry point
//!
//! The browser build is driven from JavaScript through `WebSession`; natively
//! this runs a short in-memory session:
//!
//! ```text
//! bingo-engine [prizes.csv] [draws]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bingo engine (native) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> bingo_engine::Result<()> {
    use bingo_engine::prizes::{export_csv, import_csv};
    use bingo_engine::{
        DrawError, DrawOptions, EngineConfig, MemoryStorage, SessionLifecycle, StartOptions,
        VersionedStore, session::SessionError,
    };

    let mut args = std::env::args().skip(1);
    let csv_path = args.next();
    let draws: usize = args.next().and_then(|n| n.parse().ok()).unwrap_or(5);

    let config = EngineConfig::default();
    let store = VersionedStore::new(MemoryStorage::new(), config.storage_prefix.clone());
    let session = SessionLifecycle::new(store, config);

    if let Some(path) = csv_path {
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Could not read {path}: {e}");
                String::new()
            }
        };
        let (prizes, result) = import_csv(&[], &path, &text, chrono::Utc::now())?;
        session.save_prizes(&prizes)?;
        println!("Imported {} prizes from {}", result.added_count, result.source_name);
        for skip in &result.skipped {
            println!("  skipped {:?}: {}", skip.id, skip.reason.as_str());
        }
    }

    let envelope = session.start_session(StartOptions::default())?;
    println!("Session started with {} prizes", envelope.prizes.len());

    for _ in 0..draws {
        match session.draw_and_persist(DrawOptions::default()) {
            Ok(state) => {
                if let Some(n) = state.current_number {
                    println!("#{:>2}: {n}", state.draw_history.len());
                }
            }
            Err(SessionError::Draw(DrawError::NoAvailableNumbers)) => {
                println!("All numbers drawn!");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(resumed) = session.resume_session() {
        println!("{}", serde_json::to_string_pretty(&resumed)?);
    }
    println!("{}", export_csv(&session.load_prizes()));
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_start in the library, this is just to satisfy the compiler
}
