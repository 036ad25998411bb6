/// Resolve Quest: completes a quest and reports the character's progress.
///
/// Usage: resolve_quest [request.json] [--templates-dir <dir>]
///
/// The request is `{"quest": {...}, "character_sheet": {...},
/// "completed_quests": [...]}`; every member is optional.

use quest_engine::adapter::{init_tracing, read_input, ResolveRequest};
use quest_engine::core::pipeline::{EngineError, QuestEngine};
use std::process;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    let mut input_path = None;
    let mut templates_dir = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("Usage: resolve_quest [request.json] [--templates-dir <dir>]");
                return;
            }
            "--templates-dir" if i + 1 < args.len() => {
                i += 1;
                templates_dir = Some(args[i].clone());
            }
            arg if !arg.starts_with("--") && input_path.is_none() => {
                input_path = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input = match read_input(input_path.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&input, templates_dir.as_deref()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(input: &str, templates_dir: Option<&str>) -> Result<(), EngineError> {
    let mut builder = QuestEngine::builder();
    if let Some(dir) = templates_dir {
        builder = builder.templates_dir(dir);
    }
    let engine = builder.build()?;

    let request: ResolveRequest = serde_json::from_str(input)?;
    let resolution = engine.resolve(
        &request.quest,
        &request.character_sheet,
        &request.completed_quests,
    )?;

    println!("{}", serde_json::to_string_pretty(&resolution)?);
    Ok(())
}
