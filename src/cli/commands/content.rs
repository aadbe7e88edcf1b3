use std::path::Path;

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::storage::ContentStore;

use super::{print_backups, resolve_backup_reference, select_backup};

const USAGE: &str = "content [path|export <file>|import <file>|backup [note]|backups|restore [name|#]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "content",
        "Manage the site content document",
        USAGE,
        cmd_content,
    )
    .with_examples(&[
        "content export ~/site.json",
        "content backup \"before price update\"",
        "content restore 1",
    ])]
}

fn cmd_content(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("path") => {
            let path = context.store.path();
            let state = if path.exists() { "stored" } else { "built-in, not yet saved" };
            io::print_info(format!("Content document: {} ({state})", path.display()));
            io::print_info(format!("Backups: {}", context.store.backups_dir().display()));
            Ok(())
        }
        Some("export") => {
            let target = file_argument(args, "usage: content export <file>")?;
            context.store.export_to_path(Path::new(target))?;
            io::print_success(format!("Content exported to {target}."));
            Ok(())
        }
        Some("import") => {
            let source = file_argument(args, "usage: content import <file>")?;
            context.store.import_from_path(Path::new(source))?;
            context.reload_catalog()?;
            io::print_success(format!("Content imported from {source}."));
            report_issues(context);
            Ok(())
        }
        Some("backup") => {
            let note = (args.len() > 1).then(|| args[1..].join(" "));
            let name = context.store.backup(note.as_deref())?;
            io::print_success(format!("Backup created: {name}"));
            Ok(())
        }
        Some("backups") => {
            print_backups(&context.store.list_backups()?);
            Ok(())
        }
        Some("restore") => {
            let backups = context.store.list_backups()?;
            let name = match args.get(1) {
                Some(reference) => resolve_backup_reference(&backups, reference)?,
                None if context.mode() == CliMode::Script => {
                    return Err(CommandError::InvalidArguments(
                        "usage: content restore <name|#>".into(),
                    ))
                }
                None if backups.is_empty() => {
                    return Err(CommandError::Message("No content backups found.".into()))
                }
                None => match select_backup(context, "Select content backup:", &backups)? {
                    Some(name) => name,
                    None => {
                        io::print_info("Operation cancelled.");
                        return Ok(());
                    }
                },
            };
            context.store.restore(&name)?;
            context.reload_catalog()?;
            io::print_success(format!("Content restored from {name}."));
            report_issues(context);
            Ok(())
        }
        Some(_) => Err(CommandError::InvalidArguments(format!("usage: {USAGE}"))),
    }
}

fn file_argument<'a>(args: &[&'a str], usage: &str) -> Result<&'a str, CommandError> {
    args.get(1)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(usage.into()))
}

fn report_issues(context: &ShellContext) {
    let issues = context.catalog.check();
    if !issues.is_empty() {
        io::print_warning(format!(
            "{} catalog issue(s); run `catalog check` for details.",
            issues.len()
        ));
    }
}
