//! Terminal shell for the record manager.
//!
//! # Responsibility
//! - Map subcommands onto screen controller messages.
//! - Print the resulting list, form rejection or notice.

use clap::{Args, Parser, Subcommand};
use rms_core::{
    default_log_level, init_logging, FormStatus, Notice, Record, RecordField, RecordId,
    RecordService, RecordStore, Screen, ScreenController, ScreenMessage, StoreConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "rms", version, about = "Personal record manager")]
struct Cli {
    /// SQLite file backing the record store.
    #[arg(long, global = true, env = "RMS_DB_PATH")]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the store if it does not exist yet.
    Init,
    /// List every record.
    List,
    /// Show one record.
    Show { id: RecordId },
    /// Add a new record.
    Add(FieldArgs),
    /// Overwrite an existing record; omitted fields keep their value.
    Edit {
        id: RecordId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a record.
    Delete {
        id: RecordId,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

impl FieldArgs {
    fn into_messages(self) -> Vec<ScreenMessage> {
        [
            (RecordField::Name, self.name),
            (RecordField::Age, self.age),
            (RecordField::Address, self.address),
            (RecordField::Contact, self.contact),
            (RecordField::Email, self.email),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| ScreenMessage::SetField(field, value)))
        .collect()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let store = RecordStore::new(StoreConfig::resolve(cli.db.as_deref()));
    if let Err(err) = store.initialize() {
        eprintln!("error: cannot open {}: {err}", store.db_path().display());
        return ExitCode::FAILURE;
    }

    let mut controller = ScreenController::new(RecordService::new(store));
    if run(&mut controller, cli.command) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run(controller: &mut ScreenController<RecordStore>, command: Command) -> bool {
    match command {
        Command::Init => {
            println!(
                "store ready at {}",
                controller.service().repository().db_path().display()
            );
            true
        }
        Command::List => {
            controller.dispatch(ScreenMessage::ShowList);
            if report_notice(controller) {
                print_list(controller.records());
                true
            } else {
                false
            }
        }
        Command::Show { id } => match controller.service().get_record(id) {
            Ok(Some(record)) => {
                print_record(&record);
                true
            }
            Ok(None) => {
                eprintln!("error: Record {id} no longer exists.");
                false
            }
            Err(err) => {
                eprintln!("error: {err}");
                false
            }
        },
        Command::Add(fields) => {
            controller.dispatch(ScreenMessage::OpenCreate);
            submit_form(controller, fields)
        }
        Command::Edit { id, fields } => {
            controller.dispatch(ScreenMessage::OpenEdit(id));
            if !matches!(controller.screen(), Screen::Form { .. }) {
                report_notice(controller);
                return false;
            }
            submit_form(controller, fields)
        }
        Command::Delete { id, yes } => {
            controller.dispatch(ScreenMessage::RequestDelete(id));
            if !yes && !confirm(&format!("Delete record {id}?")) {
                controller.dispatch(ScreenMessage::CancelDelete);
                println!("cancelled");
                return true;
            }
            controller.dispatch(ScreenMessage::ConfirmDelete);
            report_notice(controller)
        }
    }
}

fn submit_form(controller: &mut ScreenController<RecordStore>, fields: FieldArgs) -> bool {
    for message in fields.into_messages() {
        controller.dispatch(message);
    }
    controller.dispatch(ScreenMessage::Submit);

    let screen = controller.screen();
    match screen {
        Screen::List { .. } => report_notice(controller),
        Screen::Form { status, .. } => {
            let reason = screen.form_reason().unwrap_or_default();
            match status {
                FormStatus::Rejected(kind) => eprintln!("rejected ({}): {reason}", kind.code()),
                _ => eprintln!("error: {reason}"),
            }
            false
        }
    }
}

/// Prints the last notice; returns `false` when it was an error.
fn report_notice(controller: &ScreenController<RecordStore>) -> bool {
    match controller.notice() {
        Some(Notice::Info(message)) => {
            println!("{message}");
            true
        }
        Some(Notice::Error(message)) => {
            eprintln!("error: {message}");
            false
        }
        None => true,
    }
}

fn confirm(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_list(records: &[Record]) {
    if records.is_empty() {
        println!("no records");
        return;
    }
    println!(
        "{:>4}  {:<24} {:>4}  {:<11}  {:<28} {}",
        "ID", "NAME", "AGE", "CONTACT", "EMAIL", "ADDRESS"
    );
    for record in records {
        println!(
            "{:>4}  {:<24} {:>4}  {:<11}  {:<28} {}",
            record.id, record.name, record.age, record.contact, record.email, record.address
        );
    }
}

fn print_record(record: &Record) {
    println!("id:      {}", record.id);
    println!("name:    {}", record.name);
    println!("age:     {}", record.age);
    println!("address: {}", record.address);
    println!("contact: {}", record.contact);
    println!("email:   {}", record.email);
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, FieldArgs};
    use clap::Parser;
    use rms_core::{RecordField, ScreenMessage};

    #[test]
    fn add_command_parses_field_flags() {
        let cli = Cli::try_parse_from([
            "rms", "--db", "/tmp/x.db", "add", "--name", "John Doe", "--age", "30",
        ])
        .unwrap();
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/x.db")));
        match cli.command {
            Command::Add(fields) => {
                assert_eq!(fields.name.as_deref(), Some("John Doe"));
                assert!(fields.email.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn only_provided_fields_become_messages() {
        let fields = FieldArgs {
            age: Some("31".to_string()),
            ..FieldArgs::default()
        };
        assert_eq!(
            fields.into_messages(),
            vec![ScreenMessage::SetField(RecordField::Age, "31".to_string())]
        );
    }

    #[test]
    fn delete_accepts_yes_flag() {
        let cli = Cli::try_parse_from(["rms", "delete", "4", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Delete { id: 4, yes: true }));
    }
}
