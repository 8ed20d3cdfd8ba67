use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use training_record_server::training_store::{SqliteTrainingStore, TableSet, TrainingStore};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite training database file.
    #[clap(env = "TRAINING_DB_PATH", value_parser = parse_path)]
    pub path: PathBuf,
}

#[derive(Parser)]
#[command(name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Creates a body part with the given name and display color.
    AddPart {
        part_name: String,
        part_color: String,
    },

    /// Shows all parts.
    Parts,

    /// Shows all menus.
    Menus,

    /// Shows all workout records with their sets.
    Records,

    /// Shows all archived parts.
    ArchivedParts,

    /// Shows all archived menus.
    ArchivedMenus,

    /// Shows all archived workout records with their sets.
    ArchivedRecords,

    /// Shows the path of the current training db.
    Where,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

const PROMPT: &str = ">> ";

fn print_parts(store: &SqliteTrainingStore, tables: TableSet) -> Result<()> {
    let parts = store.get_parts(tables)?;
    if parts.is_empty() {
        println!("(no parts)");
    }
    for part in parts {
        println!(
            "{:>4}  {:<20} {}",
            part.part_id, part.part_name, part.part_color
        );
    }
    Ok(())
}

fn print_menus(store: &SqliteTrainingStore, tables: TableSet) -> Result<()> {
    let menus = store.get_menus(tables)?;
    if menus.is_empty() {
        println!("(no menus)");
    }
    for menu in menus {
        println!(
            "{:>4}  part {:<4} {}",
            menu.menu_id, menu.part_id, menu.menu_name
        );
    }
    Ok(())
}

fn print_records(store: &SqliteTrainingStore, tables: TableSet) -> Result<()> {
    let records = store.get_records(tables)?;
    if records.is_empty() {
        println!("(no records)");
    }
    for record in records {
        let part = record
            .part
            .as_ref()
            .map(|p| p.part_name.as_str())
            .unwrap_or("?");
        let menu = record
            .menu
            .as_ref()
            .map(|m| m.menu_name.as_str())
            .unwrap_or("(no menu)");
        println!(
            "{:>4}  {}  {} / {}  {} sets",
            record.record_id, record.create_date, part, menu, record.set_count
        );
        for set in record.set_details.iter() {
            println!("        #{} {} x {}", set.current_set, set.weight, set.reps);
        }
        if let Some(note) = record.note.as_ref() {
            println!("        note: {}", note);
        }
    }
    Ok(())
}

fn execute_command(line: String, store: &SqliteTrainingStore) -> CommandExecutionResult {
    if line.is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    let result = match cli {
        Ok(cli) => {
            println!("{} {}", PROMPT, &line);
            match cli.command {
                InnerCommand::AddPart {
                    part_name,
                    part_color,
                } => store
                    .insert_part(&part_name, &part_color)
                    .map(|part_id| println!("Created part {} with id {}", part_name, part_id)),
                InnerCommand::Parts => print_parts(store, TableSet::Current),
                InnerCommand::Menus => print_menus(store, TableSet::Current),
                InnerCommand::Records => print_records(store, TableSet::Current),
                InnerCommand::ArchivedParts => print_parts(store, TableSet::Archive),
                InnerCommand::ArchivedMenus => print_menus(store, TableSet::Archive),
                InnerCommand::ArchivedRecords => print_records(store, TableSet::Archive),
                InnerCommand::Where => {
                    println!("{}", store.db_path().display());
                    Ok(())
                }
                InnerCommand::Exit => return CommandExecutionResult::Exit,
            }
        }
        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => CommandExecutionResult::Ok,
        Err(err) => CommandExecutionResult::Error(format!("{:#}", err)),
    }
}

#[derive(rustyline_derive::Hinter)]
struct PartsHelper {
    commands_names: Vec<String>,
}

impl PartsHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        PartsHelper { commands_names }
    }
}

impl Completer for PartsHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for PartsHelper {}
impl Validator for PartsHelper {}
impl Helper for PartsHelper {}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let store = SqliteTrainingStore::new(&cli_args.path)?;

    InnerCli::command().print_long_help()?;

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<PartsHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(PartsHelper::new()));

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &store) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => {
                        eprintln!("Error: {}", err);
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }
    Ok(())
}
