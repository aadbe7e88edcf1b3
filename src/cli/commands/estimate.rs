use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::wizard_runner::{
    print_result, run_wizard, DialoguerInteraction, ScriptedInteraction, WizardRun,
};
use crate::wizard::PreSeed;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "estimate",
            "Walk through the estimate wizard",
            "estimate [service-id]",
            cmd_estimate,
        )
        .with_examples(&["estimate", "estimate interior"]),
        CommandEntry::new(
            "quote",
            "Compute an estimate without prompts",
            "quote <service> <sub-service> [sub-detail] [quality=<tier>] [field=value...]",
            cmd_quote,
        )
        .with_examples(&[
            "quote konstruksi bangun-rumah quality=Menengah luas=150",
            "quote konstruksi renovasi-sebagian ganti-keramik quality=Premium luas=20",
            "quote mep instalasi-listrik jumlah=25",
        ]),
    ]
}

fn cmd_estimate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if context.mode() == CliMode::Script {
        return Err(CommandError::InvalidArguments(
            "estimate needs an interactive terminal; use `quote` in scripts".into(),
        ));
    }
    if args.len() > 1 {
        return Err(CommandError::InvalidArguments(
            "usage: estimate [service-id]".into(),
        ));
    }

    let preseed = args
        .first()
        .map(|id| PreSeed::service(*id))
        .unwrap_or_default();
    if let Some(id) = args.first() {
        if context.catalog.service(id).is_none() {
            io::print_warning(format!("Unknown service `{id}`, starting from the first step."));
        }
    }

    let mut wizard = context.new_wizard(&preseed);
    let mut interaction = DialoguerInteraction::new(&context.theme);
    match run_wizard(&mut wizard, &mut interaction)? {
        WizardRun::Completed(result) => {
            print_result(&result);
            Ok(())
        }
        WizardRun::Cancelled => {
            io::print_info("Operation cancelled.");
            Ok(())
        }
    }
}

fn cmd_quote(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: quote <service> <sub-service> [sub-detail] [quality=<tier>] [field=value...]"
                .into(),
        ));
    }

    let mut wizard = context.new_wizard(&PreSeed::default());
    let mut interaction = ScriptedInteraction::from_args(args);
    let run = run_wizard(&mut wizard, &mut interaction)?;

    if let Some(reason) = interaction.failure() {
        return Err(CommandError::Message(reason.to_string()));
    }
    match run {
        WizardRun::Completed(result) => {
            let unused = interaction.unused();
            if !unused.is_empty() {
                io::print_warning(format!("Ignored arguments: {}", unused.join(" ")));
            }
            print_result(&result);
            Ok(())
        }
        WizardRun::Cancelled => Err(CommandError::Message("Estimate not completed.".into())),
    }
}
