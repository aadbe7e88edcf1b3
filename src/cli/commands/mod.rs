pub mod catalog;
pub mod config;
pub mod content;
pub mod estimate;
pub mod system;

use dialoguer::Select;

use crate::cli::core::{CommandError, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        estimate::definitions(),
        catalog::definitions(),
        content::definitions(),
        config::definitions(),
        system::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}

/// Accepts a backup file name or its 1-based position in `backups`.
pub(crate) fn resolve_backup_reference(
    backups: &[String],
    reference: &str,
) -> Result<String, CommandError> {
    if let Ok(index) = reference.parse::<usize>() {
        return backups
            .get(index.wrapping_sub(1))
            .cloned()
            .ok_or_else(|| CommandError::Message(format!("No backup at position {index}.")));
    }
    backups
        .iter()
        .find(|name| name.as_str() == reference || name.trim_end_matches(".json") == reference)
        .cloned()
        .ok_or_else(|| CommandError::Message(format!("Backup `{reference}` not found.")))
}

/// Lets the user pick a backup; `None` when cancelled.
pub(crate) fn select_backup(
    context: &ShellContext,
    prompt: &str,
    backups: &[String],
) -> Result<Option<String>, CommandError> {
    let picked = Select::with_theme(&context.theme)
        .with_prompt(prompt)
        .items(backups)
        .default(0)
        .interact_opt()?;
    Ok(picked.map(|index| backups[index].clone()))
}

pub(crate) fn print_backups(backups: &[String]) {
    if backups.is_empty() {
        io::print_info("No backups found.");
        return;
    }
    for (index, name) in backups.iter().enumerate() {
        io::print_info(format!("  {:>2}. {}", index + 1, name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups() -> Vec<String> {
        vec![
            "content_20261018_0930_auto.json".to_string(),
            "content_20261017_1200.json".to_string(),
        ]
    }

    #[test]
    fn backup_reference_by_position() {
        assert_eq!(
            resolve_backup_reference(&backups(), "2").unwrap(),
            "content_20261017_1200.json"
        );
        assert!(resolve_backup_reference(&backups(), "0").is_err());
        assert!(resolve_backup_reference(&backups(), "3").is_err());
    }

    #[test]
    fn backup_reference_by_name_with_or_without_extension() {
        assert_eq!(
            resolve_backup_reference(&backups(), "content_20261018_0930_auto").unwrap(),
            "content_20261018_0930_auto.json"
        );
        assert!(resolve_backup_reference(&backups(), "missing.json").is_err());
    }
}
