use colored::*;
use jiff::civil::Date;

use crate::models::{contact::Contact, project::{DerivedStatus, Project}};
use crate::storage::StorageError;

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Status glyph for a project, colored by its derived status
pub fn get_status_glyph(status: DerivedStatus) -> ColoredString {
    match status {
        DerivedStatus::Overdue => "●".red(),
        DerivedStatus::Completed => "✓".dimmed(),
        DerivedStatus::Cancelled => "✕".dimmed(),
        DerivedStatus::Offer => "◦".yellow(),
        DerivedStatus::OnSchedule => "○".normal(),
    }
}

/// Render a single line with the main text left-aligned and dimmed metadata
/// pushed to the right edge when the terminal is wide enough.
fn render_line(glyph: ColoredString, left: &str, right: &str, dim_left: bool) {
    let terminal_width = get_terminal_width();

    let left_section = format!("  {}  {}", glyph, left);
    let styled_left = if dim_left {
        left_section.bold().dimmed()
    } else {
        left_section.bold()
    };

    if right.is_empty() {
        println!("{}", styled_left);
        return;
    }

    // Widths by char count; ANSI codes are applied after measuring
    let left_visible = 5 + left.chars().count();
    let right_visible = right.chars().count();
    let total_content = left_visible + right_visible;

    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", styled_left, " ".repeat(padding), right.dimmed());
    } else {
        println!("{}", styled_left);
        println!("       {}", right.dimmed());
    }
}

/// Render one contact row: display name left, role and city right.
pub fn render_contact_line(contact: &Contact) {
    let mut meta_parts = vec![];
    if let Some(role) = &contact.role {
        if !role.is_empty() {
            meta_parts.push(role.clone());
        }
    }
    if let Some(city) = &contact.city {
        if !city.is_empty() {
            meta_parts.push(city.clone());
        }
    }
    let right = meta_parts.join(" • ");

    render_line("○".green(), &contact.display_name(), &right, false);
}

/// Render one project row: title left, derived status and deadline right.
pub fn render_project_line(project: &Project, today: Date) {
    let derived = project.derived_status(today);

    let mut meta_parts = vec![derived.to_string()];
    if let Some(deadline) = project.deadline {
        meta_parts.push(format_date(deadline));
    }
    if let Some(owner) = &project.owner_name {
        meta_parts.push(owner.clone());
    }
    let right = meta_parts.join(" • ");

    let dim = matches!(
        derived,
        DerivedStatus::Completed | DerivedStatus::Cancelled
    );
    render_line(get_status_glyph(derived), &project.title, &right, dim);
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize, noun: &str) {
    let noun_plural = if count == 1 {
        noun.to_string()
    } else {
        format!("{}s", noun)
    };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, noun_plural);
}

/// Render a section header (e.g., "Overdue")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Render a labeled field of a detail view, skipping empty values
pub fn render_field(label: &str, value: &str) {
    if !value.trim().is_empty() {
        println!("  {:<22} {}", format!("{}:", label).dimmed(), value);
    }
}

/// Format a deadline the way the practice writes dates
pub fn format_date(date: Date) -> String {
    date.strftime("%d/%m/%Y").to_string()
}

/// Persistent red banner for configuration problems, printed before any
/// store access happens.
pub fn render_config_banner(message: &str) {
    eprintln!();
    eprintln!("  {}", "─".repeat(60).red());
    eprintln!("  {}  {}", "CONFIGURATION ERROR".red().bold(), message);
    eprintln!("  {}", "─".repeat(60).red());
    eprintln!();
}

/// Map a storage failure to actionable guidance. Classification keys on the
/// underlying io::ErrorKind where one exists, with a text fallback for the
/// rest, and always includes the raw error for the curious.
pub fn describe_storage_error(error: &StorageError) -> String {
    match error {
        StorageError::LoadFailed { source, .. } | StorageError::SaveFailed { source, .. } => {
            match source.kind() {
                std::io::ErrorKind::PermissionDenied => format!(
                    "Access to the data file was denied. Check the permissions on the data directory. ({})",
                    error
                ),
                std::io::ErrorKind::NotFound => format!(
                    "The data directory is missing or unreachable. Check the configured data location. ({})",
                    error
                ),
                _ => format!("The store could not be reached. ({})", error),
            }
        }
        StorageError::ParseFailed { path, .. } => format!(
            "The store file is not valid JSON and could not be read. A recent copy may exist under '{}'. ({})",
            path.parent()
                .map(|p| p.join("backups").display().to_string())
                .unwrap_or_else(|| "backups".to_string()),
            error
        ),
        StorageError::BackupFailed { .. } | StorageError::CleanupFailed { .. } => format!(
            "The store was not saved because its backup rotation failed. ({})",
            error
        ),
        StorageError::FutureVersion(_) | StorageError::UnsupportedVersion(_) => error.to_string(),
        StorageError::SerializeFailed { .. } => {
            format!("Failed to serialize the store. ({})", error)
        }
    }
}
