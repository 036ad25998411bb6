/// Template Linter: validates template pool coverage and slot usage.
///
/// Usage: template_linter [<file_or_dir>] [--over-builtin]
///
/// Without a path the built-in pools are checked. `--over-builtin` merges
/// the loaded files over the built-in pools first, the way the engine does.

use quest_engine::core::templates::TemplateSet;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut target = None;
    let mut over_builtin = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("Usage: template_linter [<file_or_dir>] [--over-builtin]");
                process::exit(0);
            }
            "--over-builtin" => over_builtin = true,
            arg if target.is_none() => target = Some(arg.to_string()),
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut templates = if over_builtin || target.is_none() {
        match TemplateSet::builtin() {
            Ok(set) => set,
            Err(e) => {
                eprintln!("ERROR: Failed to parse built-in templates: {}", e);
                process::exit(1);
            }
        }
    } else {
        TemplateSet::default()
    };

    if let Some(ref target) = target {
        let path = Path::new(target);
        if path.is_file() {
            match TemplateSet::load_from_ron(path) {
                Ok(set) => templates.merge(set),
                Err(e) => {
                    eprintln!("ERROR: Failed to load template file: {}", e);
                    process::exit(1);
                }
            }
        } else if path.is_dir() {
            if !load_templates_recursive(path, &mut templates) {
                process::exit(1);
            }
        } else {
            eprintln!("ERROR: Path '{}' does not exist", target);
            process::exit(1);
        }
    }

    let entries: usize = templates.pools.values().map(|pool| pool.len()).sum();
    println!(
        "Loaded {} template pools ({} templates)",
        templates.pools.len(),
        entries
    );

    let report = templates.lint();

    println!("\n=== Template Lint Report ===\n");

    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &report.warnings {
        println!("WARNING: {}", warning);
    }

    for error in &report.errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        report.errors.len(),
        report.warnings.len()
    );

    if report.is_clean() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

/// Merge every `.ron` file under `dir`. Returns false if any file failed to
/// load.
fn load_templates_recursive(dir: &Path, templates: &mut TemplateSet) -> bool {
    let mut ok = true;
    let Ok(entries) = std::fs::read_dir(dir) else {
        eprintln!("ERROR: Cannot read directory '{}'", dir.display());
        return false;
    };
    let mut paths: Vec<_> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            ok &= load_templates_recursive(&path, templates);
        } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            match TemplateSet::load_from_ron(&path) {
                Ok(set) => {
                    println!("  Loaded: {}", path.display());
                    templates.merge(set);
                }
                Err(e) => {
                    eprintln!("  ERROR loading {}: {}", path.display(), e);
                    ok = false;
                }
            }
        }
    }
    ok
}
