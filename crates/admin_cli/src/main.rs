use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, EngineError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

type AdminResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "gastos_admin")]
#[command(about = "Admin utilities for Gastos (users and schema)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./gastos.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Migrate(Migrate),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user; the password is asked interactively.
    Create(UserCreateArgs),
    List,
    /// Delete a user with all of its data.
    Delete(UserDeleteArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    /// Display name.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct UserDeleteArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Migrate {
    #[command(subcommand)]
    command: MigrateCommand,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Roll back the last migration.
    Down,
    /// Drop every table and migrate from scratch.
    Fresh,
    Status,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> AdminResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn print_line(message: &str) -> AdminResult<()> {
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

/// Read a line without echoing it, printing `*` per character.
fn prompt_password(prompt: &str) -> AdminResult<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_none() {
                    continue;
                }
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => continue,
        }
        out.flush()?;
    }

    Ok(buf)
}

fn prompt_new_password() -> AdminResult<String> {
    for _ in 0..3 {
        let first = prompt_password("Password: ")?;
        if first.is_empty() {
            print_line("Password must not be empty.")?;
            continue;
        }
        if prompt_password("Confirm password: ")? == first {
            return Ok(first);
        }
        print_line("Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

async fn engine(db: &DatabaseConnection) -> AdminResult<Engine> {
    Migrator::up(db, None).await?;
    Ok(Engine::builder().database(db.clone()).build().await?)
}

async fn run_user(db: &DatabaseConnection, command: UserCommand) -> AdminResult<()> {
    let engine = engine(db).await?;
    match command {
        UserCommand::Create(args) => {
            let password = prompt_new_password()?;
            match engine
                .create_user(&args.username, &password, args.name.as_deref())
                .await
            {
                Ok(user) => println!("created user: {}", user.username),
                Err(EngineError::ExistingKey(_)) => {
                    return Err(format!("user already exists: {}", args.username).into());
                }
                Err(err) => return Err(err.into()),
            }
        }
        UserCommand::List => {
            for user in engine.list_users().await? {
                match user.name {
                    Some(name) => println!("{}\t{name}\t{}", user.username, user.created_at),
                    None => println!("{}\t-\t{}", user.username, user.created_at),
                }
            }
        }
        UserCommand::Delete(args) => match engine.delete_user(&args.username).await {
            Ok(()) => println!("deleted user: {}", args.username),
            Err(EngineError::KeyNotFound(_)) => {
                return Err(format!("user not found: {}", args.username).into());
            }
            Err(err) => return Err(err.into()),
        },
    }
    Ok(())
}

async fn run_migrate(db: &DatabaseConnection, command: MigrateCommand) -> AdminResult<()> {
    match command {
        MigrateCommand::Up => Migrator::up(db, None).await?,
        MigrateCommand::Down => Migrator::down(db, Some(1)).await?,
        MigrateCommand::Fresh => Migrator::fresh(db).await?,
        MigrateCommand::Status => Migrator::status(db).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> AdminResult<()> {
    let cli = Cli::parse();

    let db = Database::connect(&cli.database_url).await?;

    let result = match cli.command {
        Command::User(User { command }) => run_user(&db, command).await,
        Command::Migrate(Migrate { command }) => run_migrate(&db, command).await,
    };

    db.close().await?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_user_delete() {
        let cli = Cli::try_parse_from([
            "gastos_admin",
            "--database-url",
            "sqlite::memory:",
            "user",
            "delete",
            "--username",
            "bob",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::User(User {
                command: UserCommand::Delete(UserDeleteArgs { ref username })
            }) if username == "bob"
        ));
    }

    #[tokio::test]
    async fn unknown_user_is_an_error_and_keeps_the_connection() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        let err = run_user(
            &db,
            UserCommand::Delete(UserDeleteArgs {
                username: "ghost".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "user not found: ghost");

        run_user(&db, UserCommand::List).await.unwrap();
        db.close().await.unwrap();
    }
}
