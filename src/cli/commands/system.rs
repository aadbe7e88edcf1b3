use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::pricing::CONTINGENCY_MARGIN;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "version",
            "Show build and catalog details",
            "version",
            cmd_version,
        ),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    let leaves = context
        .catalog
        .services()
        .iter()
        .flat_map(|service| &service.sub_services)
        .map(|sub| sub.sub_details().map_or(1, <[_]>::len))
        .sum::<usize>();
    let rows = [
        ("Margin", format!("x{CONTINGENCY_MARGIN}")),
        (
            "Catalog",
            format!(
                "{} services, {} priced items, {} quality tiers",
                context.catalog.services().len(),
                leaves,
                context.catalog.quality_options().len()
            ),
        ),
        ("Content", context.store.path().display().to_string()),
        ("Build", format!("{} ({})", meta.git_hash, meta.git_status)),
        ("Built at", meta.timestamp.to_string()),
        ("Target", format!("{} / {}", meta.target, meta.profile)),
        ("Rustc", meta.rustc.to_string()),
    ];

    output_section(format!("Cost Simulator {}", meta.version));
    for (label, value) in rows {
        io::print_info(format!("  {label:<9} {value}"));
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
