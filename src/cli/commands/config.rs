use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::config::{Config, CONFIG_KEYS};

use super::{print_backups, resolve_backup_reference, select_backup};

const USAGE: &str = "config [show|set <key> <value>|backup [note]|backups|restore [name|#]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage preferences",
        USAGE,
        cmd_config,
    )
    .with_examples(&[
        "config set whatsapp_phone \"+62 811 000 111\"",
        "config set currency_display code",
        "config restore 2",
    ])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 2 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> [value]",
                    CONFIG_KEYS.join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            let mut updated = context.config.clone();
            updated
                .set(&key, &value)
                .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
            apply(context, updated)?;
            io::print_success(format!("Configuration `{key}` updated."));
            Ok(())
        }
        "backup" => {
            let note = (args.len() > 1).then(|| args[1..].join(" "));
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            io::print_success(format!("Configuration backup created: {name}"));
            Ok(())
        }
        "backups" => {
            print_backups(&context.config_manager.list_backups()?);
            Ok(())
        }
        "restore" => {
            let backups = context.config_manager.list_backups()?;
            let name = match args.get(1) {
                Some(reference) => resolve_backup_reference(&backups, reference)?,
                None if context.mode() == CliMode::Script => {
                    return Err(CommandError::InvalidArguments(
                        "usage: config restore <name|#>".into(),
                    ))
                }
                None if backups.is_empty() => {
                    return Err(CommandError::Message(
                        "No configuration backups found.".into(),
                    ))
                }
                None => match select_backup(context, "Select configuration backup:", &backups)? {
                    Some(name) => name,
                    None => {
                        io::print_info("Operation cancelled.");
                        return Ok(());
                    }
                },
            };
            let restored = context.config_manager.restore(&name)?;
            apply(context, restored)?;
            io::print_success(format!("Configuration restored from {name}."));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(format!("usage: {USAGE}"))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    for (key, value) in context.config.entries() {
        io::print_info(format!("  {:<18} {}", key, value));
    }
    io::print_info(format!(
        "  {:<18} {}",
        "file",
        context.config_manager.path().display()
    ));
    Ok(())
}

/// Saves `updated` and rebuilds whatever depends on the changed values.
fn apply(context: &mut ShellContext, updated: Config) -> CommandResult {
    let previous = std::mem::replace(&mut context.config, updated);
    context.persist_config()?;
    io::apply_config(&context.config);
    if previous.content_path != context.config.content_path
        || previous.whatsapp_phone != context.config.whatsapp_phone
    {
        context.reopen_store()?;
    }
    Ok(())
}
