/// Generate Quests: turns calendar events into quests.
///
/// Usage: generate_quests [events.json] [--templates-dir <dir>] [--source <label>]
///
/// Reads a calendar payload from the file, or from stdin when no file is
/// given, and prints the quests as a JSON array.

use quest_engine::adapter::{init_tracing, parse_events, read_input};
use quest_engine::core::pipeline::QuestEngine;
use std::process;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    let mut input_path = None;
    let mut templates_dir = None;
    let mut source = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return;
            }
            "--templates-dir" if i + 1 < args.len() => {
                i += 1;
                templates_dir = Some(args[i].clone());
            }
            "--source" if i + 1 < args.len() => {
                i += 1;
                source = Some(args[i].clone());
            }
            arg if !arg.starts_with("--") && input_path.is_none() => {
                input_path = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut builder = QuestEngine::builder();
    if let Some(ref dir) = templates_dir {
        builder = builder.templates_dir(dir);
    }
    if let Some(ref label) = source {
        builder = builder.source(label);
    }
    let engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let events = match read_input(input_path.as_deref()).and_then(|input| parse_events(&input)) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let quests = match engine.synthesize_all(&events) {
        Ok(quests) => quests,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&quests) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Usage: generate_quests [events.json] [--templates-dir <dir>] [--source <label>]");
}
