// Small admin utility: drive timetable generation against a database file
// without the host application.
//
// Usage:
//   timetable-admin <db_path|-> init
//   timetable-admin <db_path|-> generate <class_id>
//   timetable-admin <db_path|-> clear <class_id>
//   timetable-admin <db_path|-> validate <class_id> <candidate.json>
//
// Pass "-" as db_path to use the default data directory. `generate` prints
// the result and saves it on success; `validate` checks an externally
// proposed candidate (a JSON array of placements) without writing anything.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use school_timetable::api::{ApiError, TimetableApi};
use school_timetable::config::ConfigManager;
use school_timetable::db::{init_schema, open_sqlite_connection};
use school_timetable::domain::Timetable;
use school_timetable::engine::SchedulerError;
use school_timetable::repository::{ClassRepository, CommitmentRepository, TimetableRepository};
use school_timetable::{logging, APP_NAME};

fn default_db_path() -> Result<String, Box<dyn std::error::Error>> {
    let mut dir: PathBuf = dirs::data_dir().ok_or("no data directory on this platform")?;
    dir.push("school-timetable");
    std::fs::create_dir_all(&dir)?;
    dir.push("school.db");
    Ok(dir.to_string_lossy().into_owned())
}

fn usage() -> ! {
    eprintln!("{APP_NAME}");
    eprintln!("usage: timetable-admin <db_path|-> <init|generate|clear|validate> [class_id] [candidate.json]");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let db_arg = args.next().unwrap_or_else(|| usage());
    let command = args.next().unwrap_or_else(|| usage());

    let db_path = if db_arg == "-" {
        default_db_path()?
    } else {
        db_arg
    };

    let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path)?));

    if command == "init" {
        let guard = conn.lock().unwrap();
        init_schema(&guard)?;
        println!("schema initialized at {db_path}");
        return Ok(());
    }

    let class_id: i64 = args
        .next()
        .ok_or("missing class_id")?
        .parse()
        .map_err(|e| format!("bad class_id: {e}"))?;

    let api = TimetableApi::new(
        Arc::new(ClassRepository::new(conn.clone())),
        Arc::new(CommitmentRepository::new(conn.clone())),
        Arc::new(TimetableRepository::new(conn.clone())),
        Arc::new(ConfigManager::from_connection(conn.clone())?),
    );

    match command.as_str() {
        "generate" => {
            match api.generate(class_id) {
                Ok(timetable) => {
                    for placement in &timetable {
                        println!("{placement}");
                    }
                    api.save_timetable(class_id, &timetable)?;
                    println!("saved {} lessons for class {class_id}", timetable.len());
                }
                Err(ApiError::Scheduler(SchedulerError::PartialFailure(partial))) => {
                    eprintln!("generation incomplete: {partial}");
                    for unit in &partial.unplaced {
                        eprintln!(
                            "  unplaced: subject {} teacher {} ({})",
                            unit.subject_id, unit.teacher_id, unit.reason
                        );
                    }
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
        "clear" => {
            api.clear_timetable(class_id)?;
            println!("cleared timetable for class {class_id}");
        }
        "validate" => {
            let path = args.next().ok_or("missing candidate.json path")?;
            let raw = std::fs::read_to_string(&path)?;
            let candidate: Timetable = serde_json::from_str(&raw)?;
            let violations = api.validate(class_id, &candidate)?;
            if violations.is_empty() {
                println!("candidate accepted ({} lessons)", candidate.len());
            } else {
                for violation in &violations {
                    eprintln!("{violation}");
                }
                eprintln!("{} violation(s)", violations.len());
                std::process::exit(1);
            }
        }
        _ => usage(),
    }

    Ok(())
}
