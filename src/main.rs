use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::*;
use uuid::Uuid;

use crate::{
    config::Config,
    models::{
        contact::ContactPatch,
        project::{DerivedStatus, ProjectPatch, ProjectStatus},
        store::Store,
    },
    services::{
        contacts::{
            CreateContactError, CreateContactParameters, DeleteContactError, FindContactError,
            UpdateContactError, create_contact, delete_contact, find_contact, update_contact,
        },
        lists::{
            AddItemsError, CreateListError, CreateListParameters, DeleteItemError, DeleteListError,
            FindListError, add_items, create_list, delete_item, delete_list, find_list,
        },
        projects::{
            CreateProjectError, CreateProjectParameters, DeleteProjectError, FindProjectError,
            SyncOwnersError, UpdateProjectError, UpdateProjectParameters, create_project,
            delete_project, find_project, sync_owner_names, update_project,
        },
        seed::{SeedError, SeedMode, seed},
    },
    storage::{Storage, json::JsonFileStorage},
};

mod config;
mod models;
mod services;
mod storage;
mod ui;
mod watch;

#[derive(Parser)]
#[command(
    name = "ergon",
    about = "Contacts, projects and pick-lists for an energy-retrofit consultancy, from your terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard (counts, overdue projects, recent activity)
    Dashboard,

    /// Manage contacts
    #[command(subcommand)]
    Contact(ContactCommands),

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Manage custom pick-lists
    #[command(subcommand)]
    List(ListCommands),

    /// Populate the store with demonstration data
    Seed {
        /// fresh-only: skip collections that already have documents;
        /// upsert: per-record existence checks (idempotent)
        #[arg(long, default_value = "upsert")]
        mode: SeedMode,
    },

    /// Keep a live dashboard open, refreshed whenever the store changes
    Watch {
        /// Seconds between checks of the store file
        #[arg(long, default_value_t = 2)]
        interval: u64,
    },

    /// Projects grouped by derived status
    Report,
}

#[derive(Debug, Subcommand)]
enum ContactCommands {
    /// Create a new contact
    New {
        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        /// Company name (enough on its own for company contacts)
        #[arg(long, default_value = "")]
        company: String,

        /// Role (e.g. Πελάτης, Συνεργάτης, Προμηθευτής)
        #[arg(long)]
        role: Option<String>,

        /// Specialty (e.g. Αρχιτέκτονας, Πολιτικός Μηχανικός)
        #[arg(long = "type")]
        contact_type: Option<String>,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        city: Option<String>,

        /// VAT number (ΑΦΜ)
        #[arg(long)]
        vat: Option<String>,

        /// Tax office (ΔΟΥ)
        #[arg(long)]
        tax_office: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List contacts, one page at a time
    List {
        /// Page size
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Cursor from the previous page (printed with its last row)
        #[arg(long)]
        after: Option<Uuid>,
    },

    /// Show one contact
    View { query: String },

    /// Edit fields of a contact
    Edit {
        query: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long = "type")]
        contact_type: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        vat: Option<String>,

        #[arg(long)]
        tax_office: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a contact permanently
    Delete {
        query: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum ProjectCommands {
    /// Create a new project
    New {
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Programme application number
        #[arg(long)]
        application_number: Option<String>,

        /// Owning contact (fuzzy query; the display name is copied onto the project)
        #[arg(long)]
        owner: Option<String>,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,

        /// offer | active | completed | cancelled
        #[arg(long)]
        status: Option<ProjectStatus>,
    },

    /// List projects, newest first
    List,

    /// Show one project
    View { query: String },

    /// Edit fields of a project
    Edit {
        query: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        application_number: Option<String>,

        /// New owning contact (re-copies the display name)
        #[arg(long)]
        owner: Option<String>,

        /// Unlink the owning contact
        #[arg(long)]
        clear_owner: bool,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,

        /// Remove the deadline
        #[arg(long)]
        clear_deadline: bool,

        /// offer | active | completed | cancelled
        #[arg(long)]
        status: Option<ProjectStatus>,
    },

    /// Delete a project permanently
    Delete {
        query: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Re-copy every owner's current display name onto their projects
    SyncOwners,
}

#[derive(Debug, Subcommand)]
enum ListCommands {
    /// Create a new pick-list
    New {
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Initial values, semicolon-delimited (e.g. "Πελάτης; Συνεργάτης")
        #[arg(long)]
        items: Option<String>,
    },

    /// Show all pick-lists
    All,

    /// Show one list with its items
    Show { query: String },

    /// Add a value (or a semicolon-delimited batch) to a list
    AddItem { query: String, values: String },

    /// Remove one item, by value or id
    DeleteItem { query: String, value: String },

    /// Delete a list and all of its items
    Delete {
        query: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Resolve where the store lives before touching anything. A broken
    // configuration is a banner and an exit, never a panic.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            ui::render_config_banner(&e.to_string());
            std::process::exit(2);
        }
    };

    // Create parent directory if it doesn't exist
    if let Some(parent) = config.store_path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| {
            eprintln!("Error: Failed to create data directory: {}", e);
            std::process::exit(1);
        });
    }

    let storage = JsonFileStorage::new(config.store_path);

    let mut store = match storage.load() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", ui::describe_storage_error(&e));
            std::process::exit(1);
        }
    };

    match cli.command {
        None | Some(Commands::Dashboard) => {
            render_dashboard(&store);
        }
        Some(Commands::Contact(command)) => run_contact_command(&mut store, &storage, command),
        Some(Commands::Project(command)) => run_project_command(&mut store, &storage, command),
        Some(Commands::List(command)) => run_list_command(&mut store, &storage, command),
        Some(Commands::Seed { mode }) => match seed(&mut store, &storage, mode) {
            Ok(report) => {
                if report.created_anything() {
                    println!("✓ Seeded demonstration data");
                    println!("  {} contact(s)", report.contacts_created);
                    println!("  {} project(s)", report.projects_created);
                    println!(
                        "  {} list(s) with {} item(s)",
                        report.lists_created, report.items_created
                    );
                    if report.skipped > 0 {
                        println!("  {} record(s) already present, skipped", report.skipped);
                    }
                } else {
                    println!("Nothing to seed: every record is already present");
                }
            }
            Err(SeedError::Storage(e)) => {
                eprintln!("Error: {}", ui::describe_storage_error(&e));
                std::process::exit(1);
            }
        },
        Some(Commands::Watch { interval }) => {
            let mut feed = watch::SnapshotFeed::new();
            feed.subscribe(Box::new(|snapshot: &Store| {
                println!("\n  {}", "─".repeat(40).dimmed());
                render_dashboard(snapshot);
            }));

            println!(
                "Watching the store (checking every {}s, Ctrl-C to stop)",
                interval
            );
            if let Err(e) =
                watch::watch_store(&storage, &mut feed, Duration::from_secs(interval), None)
            {
                eprintln!("Error: {}", ui::describe_storage_error(&e));
                std::process::exit(1);
            }
        }
        Some(Commands::Report) => {
            render_report(&store);
        }
    }
}

fn render_dashboard(store: &Store) {
    let today = jiff::Zoned::now().date();

    println!(
        "\n  {}  {} contacts • {} projects • {} lists\n",
        "ERGON".cyan().bold(),
        store.contacts.len(),
        store.projects.len(),
        store.lists.len()
    );

    let overdue: Vec<_> = store
        .projects_ordered()
        .into_iter()
        .filter(|p| p.is_overdue(today))
        .cloned()
        .collect();

    if !overdue.is_empty() {
        ui::render_section_header(&format!("Overdue ({})", overdue.len()));
        for project in &overdue {
            ui::render_project_line(project, today);
        }
    }

    let recent: Vec<_> = store
        .projects_ordered()
        .into_iter()
        .filter(|p| !p.is_overdue(today))
        .take(5)
        .cloned()
        .collect();

    if recent.is_empty() && overdue.is_empty() {
        println!("  No projects yet. Try `ergon project new` or `ergon seed`.");
    } else if !recent.is_empty() {
        ui::render_section_header("Recent projects");
        for project in &recent {
            ui::render_project_line(project, today);
        }
    }
}

fn render_report(store: &Store) {
    let today = jiff::Zoned::now().date();

    if store.projects.is_empty() {
        println!("No projects found");
        return;
    }

    let order = [
        DerivedStatus::Overdue,
        DerivedStatus::OnSchedule,
        DerivedStatus::Offer,
        DerivedStatus::Completed,
        DerivedStatus::Cancelled,
    ];

    ui::render_view_header("Report", store.projects.len(), "project");

    for status in order {
        let group: Vec<_> = store
            .projects_ordered()
            .into_iter()
            .filter(|p| p.derived_status(today) == status)
            .cloned()
            .collect();
        if group.is_empty() {
            continue;
        }
        ui::render_section_header(&format!("{} ({})", status, group.len()));
        for project in &group {
            ui::render_project_line(project, today);
        }
    }
}

fn resolve_contact(store: &Store, query: &str) -> crate::models::contact::Contact {
    match find_contact(store, query) {
        Ok(contact) => contact,
        Err(FindContactError::NotFound(query)) => {
            eprintln!("Error: Contact '{}' not found", query);

            let contacts = store.contacts_ordered();
            if !contacts.is_empty() {
                eprintln!("\nKnown contacts:");
                for contact in contacts {
                    eprintln!("  - {}", contact.display_name());
                }
            } else {
                eprintln!("\nNo contacts exist yet. Create one with `ergon contact new`.");
            }
            std::process::exit(1);
        }
        Err(FindContactError::Ambiguous(names)) => {
            eprintln!("Error: Contact query is ambiguous. Multiple contacts found:");
            for name in names {
                eprintln!("  - {}", name);
            }
            eprintln!("\nPlease be more specific.");
            std::process::exit(1);
        }
    }
}

fn resolve_project(store: &Store, query: &str) -> crate::models::project::Project {
    match find_project(store, query) {
        Ok(project) => project,
        Err(FindProjectError::NotFound(query)) => {
            eprintln!("Error: Project '{}' not found", query);

            let projects = store.projects_ordered();
            if !projects.is_empty() {
                eprintln!("\nKnown projects:");
                for project in projects {
                    eprintln!("  - {}", project.title);
                }
            }
            std::process::exit(1);
        }
        Err(FindProjectError::Ambiguous(titles)) => {
            eprintln!("Error: Project query is ambiguous. Multiple projects found:");
            for title in titles {
                eprintln!("  - {}", title);
            }
            eprintln!("\nPlease be more specific or use the application number.");
            std::process::exit(1);
        }
    }
}

fn resolve_list(store: &Store, query: &str) -> crate::models::custom_list::CustomList {
    match find_list(store, query) {
        Ok(list) => list,
        Err(FindListError::NotFound(query)) => {
            eprintln!("Error: List '{}' not found", query);

            let lists = store.lists_ordered();
            if !lists.is_empty() {
                eprintln!("\nKnown lists:");
                for list in lists {
                    eprintln!("  - {} ({})", list.title, list.slug);
                }
            }
            std::process::exit(1);
        }
        Err(FindListError::Ambiguous(titles)) => {
            eprintln!("Error: List query is ambiguous. Multiple lists found:");
            for title in titles {
                eprintln!("  - {}", title);
            }
            eprintln!("\nPlease be more specific or use the slug.");
            std::process::exit(1);
        }
    }
}

fn run_contact_command(store: &mut Store, storage: &JsonFileStorage, command: ContactCommands) {
    match command {
        ContactCommands::New {
            first_name,
            last_name,
            company,
            role,
            contact_type,
            phone,
            email,
            address,
            city,
            vat,
            tax_office,
            notes,
        } => {
            let params = CreateContactParameters {
                first_name,
                last_name,
                company_name: company,
                role,
                contact_type,
                phone,
                email,
                address,
                city,
                vat_number: vat,
                tax_office,
                notes,
            };

            match create_contact(store, storage, params) {
                Ok(contact) => {
                    println!("✓ Contact added: {}", contact.display_name());
                    if let Some(role) = &contact.role {
                        println!("  Role: {}", role);
                    }
                }
                Err(CreateContactError::MissingName) => {
                    eprintln!("Error: A contact needs a first name, a last name or a company name");
                    eprintln!("\nExample: ergon contact new --company 'PRIMASUN I.K.E.'");
                    std::process::exit(1);
                }
                Err(CreateContactError::Storage(e)) => {
                    eprintln!("Error: {}", ui::describe_storage_error(&e));
                    std::process::exit(1);
                }
            }
        }
        ContactCommands::List { limit, after } => {
            let page = store.contacts_page(after, limit.max(1));

            if page.contacts.is_empty() {
                println!("No contacts found");
                return;
            }

            ui::render_view_header("Contacts", store.contacts.len(), "contact");
            for contact in &page.contacts {
                ui::render_contact_line(contact);
            }

            if page.has_more {
                if let Some(cursor) = page.next_cursor {
                    println!(
                        "\n  More contacts available. Continue with:\n    ergon contact list --limit {} --after {}",
                        limit, cursor
                    );
                }
            }
        }
        ContactCommands::View { query } => {
            let contact = resolve_contact(store, &query);

            ui::render_view_header(&contact.display_name(), 1, "contact");
            ui::render_field("Role", contact.role.as_deref().unwrap_or(""));
            ui::render_field("Specialty", contact.contact_type.as_deref().unwrap_or(""));
            ui::render_field("Phone", &contact.phone);
            ui::render_field("Email", &contact.email);
            ui::render_field("Address", contact.address.as_deref().unwrap_or(""));
            ui::render_field("City", contact.city.as_deref().unwrap_or(""));
            ui::render_field("VAT", contact.vat_number.as_deref().unwrap_or(""));
            ui::render_field("Tax office", contact.tax_office.as_deref().unwrap_or(""));
            ui::render_field("Notes", contact.notes.as_deref().unwrap_or(""));
            ui::render_field("Id", &contact.id.to_string());

            let owned: Vec<_> = store.projects_for_owner(contact.id).collect();
            if !owned.is_empty() {
                ui::render_section_header(&format!("Projects ({})", owned.len()));
                let today = jiff::Zoned::now().date();
                for project in owned {
                    ui::render_project_line(project, today);
                }
            }
        }
        ContactCommands::Edit {
            query,
            first_name,
            last_name,
            company,
            role,
            contact_type,
            phone,
            email,
            address,
            city,
            vat,
            tax_office,
            notes,
        } => {
            let contact = resolve_contact(store, &query);
            let patch = ContactPatch {
                first_name,
                last_name,
                company_name: company,
                role,
                contact_type,
                phone,
                email,
                address,
                city,
                vat_number: vat,
                tax_office,
                notes,
            };

            match update_contact(store, storage, contact.id, patch) {
                Ok(updated) => {
                    println!("✓ Contact updated: {}", updated.display_name());
                }
                Err(UpdateContactError::EmptyPatch) => {
                    eprintln!("Error: Nothing to update: no fields were given");
                    std::process::exit(1);
                }
                Err(UpdateContactError::MissingName) => {
                    eprintln!(
                        "Error: This edit would leave the contact without any name. Keep at least one of first name, last name or company."
                    );
                    std::process::exit(1);
                }
                Err(UpdateContactError::NotFound) => {
                    eprintln!("Error: Contact '{}' not found", query);
                    std::process::exit(1);
                }
                Err(UpdateContactError::Storage(e)) => {
                    eprintln!("Error: {}", ui::describe_storage_error(&e));
                    std::process::exit(1);
                }
            }
        }
        ContactCommands::Delete { query, yes } => {
            let contact = resolve_contact(store, &query);

            if !yes {
                eprintln!(
                    "This permanently deletes '{}'. Re-run with --yes to confirm.",
                    contact.display_name()
                );
                std::process::exit(1);
            }

            match delete_contact(store, storage, contact.id) {
                Ok(result) => {
                    println!("✓ Contact deleted: {}", result.contact.display_name());
                    match result.next_selected {
                        Some(next) => println!("  Now at: {}", next.display_name()),
                        None => println!("  No contacts left"),
                    }

                    let orphaned = store.projects_for_owner(result.contact.id).count();
                    if orphaned > 0 {
                        println!(
                            "  {} project(s) still reference this contact by its copied name",
                            orphaned
                        );
                    }
                }
                Err(DeleteContactError::NotFound) => {
                    eprintln!("Error: Contact '{}' not found", query);
                    std::process::exit(1);
                }
                Err(DeleteContactError::Storage(e)) => {
                    eprintln!("Error: {}", ui::describe_storage_error(&e));
                    std::process::exit(1);
                }
            }
        }
    }
}

fn run_project_command(store: &mut Store, storage: &JsonFileStorage, command: ProjectCommands) {
    match command {
        ProjectCommands::New {
            title,
            description,
            application_number,
            owner,
            deadline,
            status,
        } => {
            let params = CreateProjectParameters {
                title,
                description,
                application_number,
                owner,
                deadline,
                status,
            };

            match create_project(store, storage, params) {
                Ok(project) => {
                    println!("✓ Project added: {}", project.title);
                    println!("  Status: {}", project.status);
                    if let Some(owner_name) = &project.owner_name {
                        println!("  Owner: {}", owner_name);
                    }
                    if let Some(deadline) = project.deadline {
                        println!("  Deadline: {}", ui::format_date(deadline));
                    }
                }
                Err(CreateProjectError::MissingTitle) => {
                    eprintln!("Error: A project needs a title");
                    std::process::exit(1);
                }
                Err(CreateProjectError::OwnerNotFound(name)) => {
                    eprintln!("Error: Owner contact '{}' not found", name);

                    let contacts = store.contacts_ordered();
                    if !contacts.is_empty() {
                        eprintln!("\nKnown contacts:");
                        for contact in contacts {
                            eprintln!("  - {}", contact.display_name());
                        }
                    } else {
                        eprintln!(
                            "\nNo contacts exist yet. Create one first or omit --owner."
                        );
                    }
                    std::process::exit(1);
                }
                Err(CreateProjectError::AmbiguousOwner(names)) => {
                    eprintln!("Error: Owner query is ambiguous. Multiple contacts found:");
                    for name in names {
                        eprintln!("  - {}", name);
                    }
                    eprintln!("\nPlease be more specific.");
                    std::process::exit(1);
                }
                Err(CreateProjectError::InvalidDeadline(date_str, error)) => {
                    eprintln!("Error: Invalid deadline '{}': {}", date_str, error);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2025-09-30)");
                    std::process::exit(1);
                }
                Err(CreateProjectError::Storage(e)) => {
                    eprintln!("Error: {}", ui::describe_storage_error(&e));
                    std::process::exit(1);
                }
            }
        }
        ProjectCommands::List => {
            let projects = store.projects_ordered();

            if projects.is_empty() {
                println!("No projects found");
                return;
            }

            let today = jiff::Zoned::now().date();
            ui::render_view_header("Projects", projects.len(), "project");
            for project in projects {
                ui::render_project_line(project, today);
            }
        }
        ProjectCommands::View { query } => {
            let project = resolve_project(store, &query);
            let today = jiff::Zoned::now().date();

            ui::render_view_header(&project.title, 1, "project");
            ui::render_field("Status", &project.status.to_string());
            ui::render_field("Shown as", &project.derived_status(today).to_string());
            ui::render_field(
                "Application no.",
                project.application_number.as_deref().unwrap_or(""),
            );
            ui::render_field("Owner", project.owner_name.as_deref().unwrap_or(""));
            if let Some(deadline) = project.deadline {
                ui::render_field("Deadline", &ui::format_date(deadline));
            }
            ui::render_field("Description", project.description.as_deref().unwrap_or(""));
            ui::render_field("Id", &project.id.to_string());
        }
        ProjectCommands::Edit {
            query,
            title,
            description,
            application_number,
            owner,
            clear_owner,
            deadline,
            clear_deadline,
            status,
        } => {
            let project = resolve_project(store, &query);

            // The deadline string is validated here; the rest of the patch
            // is validated by the service.
            let parsed_deadline = match deadline {
                Some(deadline_str) => match deadline_str.parse::<jiff::civil::Date>() {
                    Ok(date) => Some(date),
                    Err(e) => {
                        eprintln!("Error: Invalid deadline '{}': {}", deadline_str, e);
                        eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2025-09-30)");
                        std::process::exit(1);
                    }
                },
                None => None,
            };

            let params = UpdateProjectParameters {
                patch: ProjectPatch {
                    title,
                    description,
                    application_number,
                    deadline: parsed_deadline,
                    clear_deadline,
                    status,
                },
                owner,
                clear_owner,
            };

            match update_project(store, storage, project.id, params) {
                Ok(updated) => {
                    println!("✓ Project updated: {}", updated.title);
                    println!("  Status: {}", updated.status);
                    if let Some(owner_name) = &updated.owner_name {
                        println!("  Owner: {}", owner_name);
                    }
                }
                Err(UpdateProjectError::EmptyPatch) => {
                    eprintln!("Error: Nothing to update: no fields were given");
                    std::process::exit(1);
                }
                Err(UpdateProjectError::MissingTitle) => {
                    eprintln!("Error: A project needs a title");
                    std::process::exit(1);
                }
                Err(UpdateProjectError::OwnerNotFound(name)) => {
                    eprintln!("Error: Owner contact '{}' not found", name);
                    std::process::exit(1);
                }
                Err(UpdateProjectError::AmbiguousOwner(names)) => {
                    eprintln!("Error: Owner query is ambiguous. Multiple contacts found:");
                    for name in names {
                        eprintln!("  - {}", name);
                    }
                    std::process::exit(1);
                }
                Err(UpdateProjectError::NotFound) => {
                    eprintln!("Error: Project '{}' not found", query);
                    std::process::exit(1);
                }
                Err(UpdateProjectError::Storage(e)) => {
                    eprintln!("Error: {}", ui::describe_storage_error(&e));
                    std::process::exit(1);
                }
            }
        }
        ProjectCommands::Delete { query, yes } => {
            let project = resolve_project(store, &query);

            if !yes {
                eprintln!(
                    "This permanently deletes '{}'. Re-run with --yes to confirm.",
                    project.title
                );
                std::process::exit(1);
            }

            match delete_project(store, storage, project.id) {
                Ok(result) => {
                    println!("✓ Project deleted: {}", result.project.title);
                    match result.next_selected {
                        Some(next) => println!("  Now at: {}", next.title),
                        None => println!("  No projects left"),
                    }
                }
                Err(DeleteProjectError::NotFound) => {
                    eprintln!("Error: Project '{}' not found", query);
                    std::process::exit(1);
                }
                Err(DeleteProjectError::Storage(e)) => {
                    eprintln!("Error: {}", ui::describe_storage_error(&e));
                    std::process::exit(1);
                }
            }
        }
        ProjectCommands::SyncOwners => match sync_owner_names(store, storage) {
            Ok(0) => println!("All owner names are already up to date"),
            Ok(patched) => println!("✓ Refreshed the owner name on {} project(s)", patched),
            Err(SyncOwnersError::Storage(e)) => {
                eprintln!("Error: {}", ui::describe_storage_error(&e));
                std::process::exit(1);
            }
        },
    }
}

fn run_list_command(store: &mut Store, storage: &JsonFileStorage, command: ListCommands) {
    match command {
        ListCommands::New {
            title,
            description,
            items,
        } => {
            let params = CreateListParameters {
                title,
                description,
                items,
            };

            match create_list(store, storage, params) {
                Ok(result) => {
                    println!(
                        "✓ List {} created with slug {}",
                        result.list.title, result.list.slug
                    );
                    if result.items_created > 0 {
                        println!("  {} item(s) added", result.items_created);
                    }
                }
                Err(CreateListError::MissingTitle) => {
                    eprintln!("Error: A list needs a title");
                    std::process::exit(1);
                }
                Err(CreateListError::Storage(e)) => {
                    eprintln!("Error: {}", ui::describe_storage_error(&e));
                    std::process::exit(1);
                }
            }
        }
        ListCommands::All => {
            let lists = store.lists_ordered();

            if lists.is_empty() {
                println!("No lists found");
                return;
            }

            ui::render_view_header("Custom lists", lists.len(), "list");
            for list in lists {
                let item_count = store.items_for_list(list.id).len();
                println!("  {} {}", "•".green(), list.title.bold());
                if let Some(description) = &list.description {
                    println!("    {}", description.dimmed());
                }
                let noun = if item_count == 1 { "item" } else { "items" };
                println!(
                    "    {} {} {} {}",
                    item_count.to_string().dimmed(),
                    noun.dimmed(),
                    "•".dimmed(),
                    list.slug.dimmed()
                );
                println!();
            }
        }
        ListCommands::Show { query } => {
            let list = resolve_list(store, &query);
            let items = store.items_for_list(list.id);

            ui::render_view_header(&list.title, items.len(), "item");
            if let Some(description) = &list.description {
                println!("  {}\n", description.dimmed());
            }
            for item in items {
                println!("  {} {}", "•".green(), item.value);
            }
        }
        ListCommands::AddItem { query, values } => {
            let list = resolve_list(store, &query);

            match add_items(store, storage, list.id, &values) {
                Ok(created) => {
                    println!(
                        "✓ Added {} item(s) to {}",
                        created.len(),
                        list.title
                    );
                    for item in created {
                        println!("  {} {}", "•".green(), item.value);
                    }
                }
                Err(AddItemsError::NoValues) => {
                    eprintln!("Error: No values given: every segment was empty after trimming");
                    eprintln!("\nExample: ergon list add-item {} 'Κουφώματα; Υδραυλικά'", list.slug);
                    std::process::exit(1);
                }
                Err(AddItemsError::ListNotFound) => {
                    eprintln!("Error: List '{}' not found", query);
                    std::process::exit(1);
                }
                Err(AddItemsError::Storage(e)) => {
                    eprintln!("Error: {}", ui::describe_storage_error(&e));
                    std::process::exit(1);
                }
            }
        }
        ListCommands::DeleteItem { query, value } => {
            let list = resolve_list(store, &query);

            match delete_item(store, storage, list.id, &value) {
                Ok(removed) => {
                    println!("✓ Removed '{}' from {}", removed.value, list.title);
                }
                Err(DeleteItemError::ItemNotFound(value)) => {
                    eprintln!("Error: No item '{}' in list '{}'", value, list.title);

                    let items = store.items_for_list(list.id);
                    if !items.is_empty() {
                        eprintln!("\nItems in this list:");
                        for item in items {
                            eprintln!("  - {}", item.value);
                        }
                    }
                    std::process::exit(1);
                }
                Err(DeleteItemError::ListNotFound) => {
                    eprintln!("Error: List '{}' not found", query);
                    std::process::exit(1);
                }
                Err(DeleteItemError::Storage(e)) => {
                    eprintln!("Error: {}", ui::describe_storage_error(&e));
                    std::process::exit(1);
                }
            }
        }
        ListCommands::Delete { query, yes } => {
            let list = resolve_list(store, &query);
            let item_count = store.items_for_list(list.id).len();

            if !yes {
                eprintln!(
                    "This permanently deletes '{}' and its {} item(s). Re-run with --yes to confirm.",
                    list.title, item_count
                );
                std::process::exit(1);
            }

            match delete_list(store, storage, list.id) {
                Ok(result) => {
                    println!("✓ List deleted: {}", result.list.title);
                    if result.removed_items > 0 {
                        println!("  └─ {} item(s) also deleted", result.removed_items);
                    }
                }
                Err(DeleteListError::NotFound) => {
                    eprintln!("Error: List '{}' not found", query);
                    std::process::exit(1);
                }
                Err(DeleteListError::Storage(e)) => {
                    eprintln!("Error: {}", ui::describe_storage_error(&e));
                    std::process::exit(1);
                }
            }
        }
    }
}
