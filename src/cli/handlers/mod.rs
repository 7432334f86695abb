use std::error::Error;
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::host::{AssumeYes, InfoSource, MenuSource, OperationResult, Prompt, RecordingCache};
use crate::io::config_io;
use crate::model::{ActionKind, Config, Entry, MenuAction, MenuItem, Selection};
use crate::module;
use crate::ops::{Activation, Extension};
use crate::tui::{EditorExit, Screen, TerminalPrompt};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = config_io::read_config(cli.config.as_deref().map(Path::new))?;
    module::initialize(&config)?;
    let result = run_command(&cli, &config);
    module::shutdown();
    result
}

fn run_command(cli: &Cli, config: &Config) -> Result<(), Box<dyn Error>> {
    let store = config_io::open_store(config, cli.store.as_deref().map(Path::new));
    let ext = Extension::new(store, config, config_io::home_dir());
    let json = cli.json;

    match &cli.command {
        Commands::Menu(args) => cmd_menu(&ext, args, json),
        Commands::Background(args) => cmd_background(&ext, args, json),
        Commands::Annotate(args) => cmd_annotate(&ext, args),
        Commands::Erase(args) => cmd_erase(&ext, args),
        Commands::Show(args) => cmd_show(&ext, args, json),
        Commands::Emblems(args) => cmd_emblems(&ext, args, json),
    }
}

// ---------------------------------------------------------------------------
// Selection helpers
// ---------------------------------------------------------------------------

fn resolve_entry(path: &str) -> Result<Entry, Box<dyn Error>> {
    let abs = std::fs::canonicalize(path)
        .map_err(|e| format!("cannot resolve '{}': {}", path, e))?;
    Ok(Entry::from_disk(&abs)?)
}

fn resolve_selection(paths: &[String]) -> Result<Selection, Box<dyn Error>> {
    paths.iter().map(|p| resolve_entry(p)).collect()
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_menu(ext: &Extension, args: &PathsArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let selection = resolve_selection(&args.paths)?;
    print_menu(&ext.file_items(&selection), json)
}

fn cmd_background(
    ext: &Extension,
    args: &BackgroundArgs,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let folder = resolve_entry(&args.dir)?;
    if !folder.is_directory() {
        return Err(format!("'{}' is not a directory", args.dir).into());
    }
    print_menu(&ext.background_items(&folder), json)
}

fn print_menu(items: &[MenuItem], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        let out: Vec<MenuItemJson> = items.iter().map(menu_item_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", format_menu(items));
    }
    Ok(())
}

fn cmd_show(ext: &Extension, args: &ShowArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let entry = resolve_entry(&args.path)?;
    let annotation = ext.store().get(&entry.path)?;
    if json {
        let out = AnnotationJson {
            path: path_string(&entry.path),
            annotation,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if let Some(text) = annotation {
        println!("{}", text);
    } else {
        eprintln!("{} has no annotation", entry.path.display());
    }
    Ok(())
}

fn cmd_emblems(ext: &Extension, args: &PathsArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let selection = resolve_selection(&args.paths)?;
    let mut rows = Vec::new();
    for entry in &selection {
        let mut emblems: Vec<String> = Vec::new();
        let result = ext.update_file_info(entry, &mut emblems);
        rows.push(EmblemsJson {
            path: path_string(&entry.path),
            emblems,
            complete: result == OperationResult::Complete,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            let emblems = if row.complete {
                row.emblems.join(", ")
            } else {
                "?".to_string()
            };
            println!("{}\t{}", row.path, emblems);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_annotate(ext: &Extension, args: &PathsArgs) -> Result<(), Box<dyn Error>> {
    let action = MenuAction {
        kind: ActionKind::Annotate,
        selection: resolve_selection(&args.paths)?,
    };
    run_action(ext, &action, &mut TerminalPrompt)
}

fn cmd_erase(ext: &Extension, args: &EraseArgs) -> Result<(), Box<dyn Error>> {
    let action = MenuAction {
        kind: ActionKind::Erase,
        selection: resolve_selection(&args.paths)?,
    };
    if args.yes {
        run_action(ext, &action, &mut AssumeYes)
    } else {
        run_action(ext, &action, &mut TerminalPrompt)
    }
}

/// Activate a menu action the way a file manager would: show the editor for
/// a session, then refresh the emblems of every rewritten entry.
fn run_action(
    ext: &Extension,
    action: &MenuAction,
    prompt: &mut dyn Prompt,
) -> Result<(), Box<dyn Error>> {
    let cache = RecordingCache::new();
    let (verb, report) = match ext.activate(action, &cache, prompt)? {
        Activation::Session(session) => {
            // The screen is restored before anything is written
            let exit = Screen::enter()?.run_editor(session);
            match exit {
                EditorExit::Closed(session) => ("annotated", session.close(ext.store(), &cache)),
                EditorExit::Discarded => {
                    println!("changes discarded");
                    return Ok(());
                }
            }
        }
        Activation::Erased(report) => ("erased", report),
        Activation::Declined => {
            println!("nothing changed");
            return Ok(());
        }
    };

    for path in cache.invalidated() {
        if let Some(entry) = action.selection.iter().find(|e| e.path == path) {
            let mut emblems: Vec<String> = Vec::new();
            ext.update_file_info(entry, &mut emblems);
            println!("{}", format_refreshed(verb, &entry.path, &emblems));
        }
    }

    if report.failures.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} entries could not be written",
            report.failures.len(),
            action.selection.len()
        )
        .into())
    }
}
