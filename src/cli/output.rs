//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::substitute::RunReport;
use crate::vault::SecretStore;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of secrets (ID, Secret, Description, Created).
pub fn print_secrets_table(store: &SecretStore) {
    if store.is_empty() {
        info("No secrets in this store yet.");
        tip("Run `uu-secret-manager add <SECRET>` to add your first secret.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Secret", "Description", "Created"]);

    for entry in store.entries() {
        table.add_row(vec![
            entry.id.clone(),
            entry.record.secret.clone(),
            entry.record.description.clone().unwrap_or_default(),
            entry
                .record
                .created
                .map(|c| c.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        ]);
    }

    println!("{table}");
}

/// Print the per-file lines and warnings of a `replace`/`reverse` run.
///
/// `verb` is the past-tense action shown per file, e.g. "Replaced".
pub fn print_run_report(report: &RunReport, verb: &str, dry_run: bool) {
    let prefix = if dry_run { "Would update" } else { "Updated" };
    for change in &report.changed {
        println!(
            "{prefix} {} ({verb} {} occurrence(s))",
            change.path.display(),
            change.replacements
        );
    }

    for path in &report.skipped {
        warning(&format!("Skipped non-UTF-8 file {}", path.display()));
    }

    for (path, id) in &report.unknown_placeholders {
        warning(&format!(
            "Unknown placeholder '{id}' in {} left unchanged",
            path.display()
        ));
    }
}
