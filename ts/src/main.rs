//! `ts` - poke at a task store file without the conversational layer.

use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;

use taskstore::cli::{Cli, Command};
use taskstore::{JsonFileStore, Task, TaskStore, default_tasks_file};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let path = cli.file.clone().unwrap_or_else(default_tasks_file);
    let store = JsonFileStore::open(&path)?;

    info!("using task store at {}", path.display());

    match cli.command {
        Command::List => {
            let tasks = store.load();
            if tasks.is_empty() {
                println!("No tasks found");
            } else {
                for task in &tasks {
                    println!("{}", render_line(task));
                }
            }
        }
        Command::Add { title, due } => {
            if title.trim().is_empty() {
                bail!("title must not be empty");
            }
            let task = store.add(title.trim(), due.as_deref())?;
            println!("{} Added: {} {}", "✓".green(), task.title, short(&task));
        }
        Command::Complete { id } => match store.complete(&id)? {
            Some(task) => println!("{} Completed: {} {}", "✓".green(), task.title, short(&task)),
            None => bail!("no task found with id: {id}"),
        },
        Command::Delete { id } => match store.delete(&id)? {
            Some(task) => println!("{} Deleted: {} {}", "✓".green(), task.title, short(&task)),
            None => bail!("no task found with id: {id}"),
        },
    }

    Ok(())
}

fn short(task: &Task) -> ColoredString {
    format!("({})", task.short_id()).dimmed()
}

fn render_line(task: &Task) -> String {
    let mark = if task.is_completed() { "✓".green() } else { "○".yellow() };
    let mut line = format!("{mark} {} {}", task.title, short(task));
    if let Some(due) = &task.due {
        line.push_str(&format!(" {}", format!("due: {due}").cyan()));
    }
    line
}
