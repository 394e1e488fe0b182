use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use contactbook::{
    config::StoreConfig,
    contact::Contact,
    persist::{sqlite::SqliteRecordStore, RecordStore},
    service::{ContactService, ServiceError, ServiceResult},
    types::ContactId,
};

#[derive(Parser, Debug)]
#[command(name = "contactbook")]
#[command(version = "0.1")]
#[command(about = "Contact book manager", long_about = None)]
struct Options {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE", env = "CONTACTBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the database file
    #[arg(short, long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Database name
    #[arg(short, long)]
    schema: Option<String>,

    /// Skip the confirmation prompt for update and delete
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a new contact
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// List all contacts
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing contact. Omitted fields keep their value; an empty
    /// value clears phone or email.
    Update {
        #[arg(long)]
        id: ContactId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a contact
    Delete {
        #[arg(long)]
        id: ContactId,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let opts = Options::parse();

    let cfg = match store_config(&opts, |key| std::env::var(key).ok()) {
        Ok(cfg) => cfg,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let service = SqliteRecordStore::open(&cfg)
        .map_err(ServiceError::from)
        .and_then(ContactService::new);
    let mut service = match service {
        Ok(service) => service,
        Err(err) => {
            error!("startup failed: {err}");
            eprintln!("Failed to open the contact book. Check the logs.");
            return ExitCode::FAILURE;
        }
    };

    let assume_yes = opts.yes;
    match opts.command {
        Commands::Add { name, phone, email } => {
            let Some(name) = required_name(&name) else {
                return ExitCode::FAILURE;
            };
            if service.create(name, optional(phone), optional(email)).is_err() {
                eprintln!("Failed to add contact. Check the logs.");
                return ExitCode::FAILURE;
            }
            println!("Contact added successfully!");
            print_table(&service.list());
        }
        Commands::List { json } => {
            let contacts = service.list();
            if json {
                match serde_json::to_string_pretty(&contacts) {
                    Ok(text) => println!("{text}"),
                    Err(err) => {
                        error!("encoding contacts failed: {err}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print_table(&contacts);
            }
        }
        Commands::Update {
            id,
            name,
            phone,
            email,
        } => {
            let Some(name) = required_name(&name) else {
                return ExitCode::FAILURE;
            };
            let prompt = format!("Update contact {id} to '{name}'?");
            if !assume_yes && !confirm_stdin(&prompt) {
                println!("Update cancelled.");
                return ExitCode::SUCCESS;
            }
            if update_contact(&mut service, id, name, phone, email).is_err() {
                eprintln!("Failed to update contact. Check the logs.");
                return ExitCode::FAILURE;
            }
            println!("Contact updated successfully!");
            print_table(&service.list());
        }
        Commands::Delete { id } => {
            let label = service.get(id).map_or_else(|| id.to_string(), |c| c.name);
            let prompt = format!("Delete contact '{label}'?");
            if !assume_yes && !confirm_stdin(&prompt) {
                println!("Delete cancelled.");
                return ExitCode::SUCCESS;
            }
            if service.delete(id).is_err() {
                eprintln!("Failed to delete contact. Check the logs.");
                return ExitCode::FAILURE;
            }
            println!("Contact deleted successfully!");
            print_table(&service.list());
        }
    }

    ExitCode::SUCCESS
}

// File first, then environment, then command-line flags.
fn store_config(
    opts: &Options,
    env: impl Fn(&str) -> Option<String>,
) -> Result<StoreConfig, String> {
    let cfg = match &opts.config {
        Some(path) => StoreConfig::load(path).map_err(|e| e.to_string())?,
        None => StoreConfig::default(),
    }
    .with_env_from(env)
    .with_overrides(opts.data_dir.clone(), opts.schema.clone());

    cfg.validate().map_err(|e| e.to_string())?;
    Ok(cfg)
}

fn required_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        eprintln!("Name cannot be empty.");
        return None;
    }
    Some(name.to_string())
}

// Blank form fields are stored as absent.
fn optional(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// An omitted flag keeps the current value; a given one replaces it.
fn edited(flag: Option<String>, current: Option<String>) -> Option<String> {
    match flag {
        Some(value) => optional(Some(value)),
        None => current,
    }
}

fn update_contact<S: RecordStore>(
    service: &mut ContactService<S>,
    id: ContactId,
    name: String,
    phone: Option<String>,
    email: Option<String>,
) -> ServiceResult<()> {
    let (cur_phone, cur_email) = service
        .get(id)
        .map(|c| (c.phone, c.email))
        .unwrap_or_default();
    service.update(id, name, edited(phone, cur_phone), edited(email, cur_email))
}

fn confirm_stdin(prompt: &str) -> bool {
    let stdin = io::stdin();
    let stdout = io::stdout();
    confirm(prompt, &mut stdin.lock(), &mut stdout.lock()).unwrap_or(false)
}

fn confirm(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn print_table(contacts: &[Contact]) {
    if contacts.is_empty() {
        println!("No contacts.");
        return;
    }

    let name_w = contacts.iter().map(|c| c.name.len()).max().unwrap_or(0).max(4);
    let phone_w = contacts
        .iter()
        .map(|c| c.phone.as_deref().unwrap_or("").len())
        .max()
        .unwrap_or(0)
        .max(5);

    println!("{:>5}  {:<name_w$}  {:<phone_w$}  Email", "ID", "Name", "Phone");
    for c in contacts {
        println!(
            "{:>5}  {:<name_w$}  {:<phone_w$}  {}",
            c.id,
            c.name,
            c.phone.as_deref().unwrap_or(""),
            c.email.as_deref().unwrap_or(""),
        );
    }
}
