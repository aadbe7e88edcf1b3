use crate::catalog::{LeafPricing, Price, SubServiceShape};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::currency::MoneyFormatter;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "catalog",
        "Browse services and prices",
        "catalog [list|show <service-id>|tiers|check]",
        cmd_catalog,
    )
    .with_examples(&["catalog", "catalog show repair", "catalog check"])]
}

fn cmd_catalog(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("list") => list_services(context),
        Some("show") => {
            let id = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments("usage: catalog show <service-id>".into())
            })?;
            show_service(context, id)
        }
        Some("tiers") => list_tiers(context),
        Some("check") => check_catalog(context),
        Some(_) => Err(CommandError::InvalidArguments(
            "usage: catalog [list|show <service-id>|tiers|check]".into(),
        )),
    }
}

fn list_services(context: &ShellContext) -> CommandResult {
    output_section("Services");
    for service in context.catalog.services() {
        io::print_info(format!(
            "  {:<14} {} ({} options)",
            service.id,
            service.label,
            service.sub_services.len()
        ));
    }
    Ok(())
}

fn show_service(context: &ShellContext, id: &str) -> CommandResult {
    let service = context
        .catalog
        .service(id)
        .ok_or_else(|| CommandError::Message(format!("Unknown service `{id}`")))?;
    let formatter = context.money_formatter();
    let tiers: Vec<&str> = context
        .catalog
        .quality_options()
        .iter()
        .map(|option| option.title.as_str())
        .collect();

    output_section(&service.label);
    if !service.description.is_empty() {
        io::print_info(&service.description);
    }
    for sub in &service.sub_services {
        match &sub.shape {
            SubServiceShape::Leaf(pricing) => {
                output::highlight(format!(
                    "  {:<22} {}",
                    sub.id,
                    describe_price(pricing, &formatter, &tiers)
                ));
            }
            SubServiceShape::Branch(details) => {
                output::highlight(format!("  {:<22} {}", sub.id, sub.label));
                for detail in details {
                    io::print_info(format!(
                        "    {:<22} {}",
                        detail.id,
                        describe_price(&detail.pricing, &formatter, &tiers)
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Tiers follow `tier_order`; tiers it does not name come last.
fn describe_price(pricing: &LeafPricing, formatter: &MoneyFormatter, tier_order: &[&str]) -> String {
    let unit = if pricing.unit.is_empty() {
        String::new()
    } else {
        format!(" / {}", pricing.unit)
    };
    match &pricing.price {
        Price::Flat(amount) => format!("{}{unit}", formatter.format(*amount)),
        Price::Tiered(tiers) => {
            let mut ordered: Vec<(&String, &f64)> = tiers.iter().collect();
            ordered.sort_by_key(|(tier, _)| {
                tier_order
                    .iter()
                    .position(|known| *known == tier.as_str())
                    .unwrap_or(tier_order.len())
            });
            let parts: Vec<String> = ordered
                .into_iter()
                .map(|(tier, amount)| format!("{tier} {}", formatter.format(*amount)))
                .collect();
            format!("{}{unit}", parts.join(" | "))
        }
    }
}

fn list_tiers(context: &ShellContext) -> CommandResult {
    output_section("Material quality");
    for option in context.catalog.quality_options() {
        io::print_info(format!("  {:<10} {}", option.title, option.description));
    }
    Ok(())
}

fn check_catalog(context: &ShellContext) -> CommandResult {
    let issues = context.catalog.check();
    if issues.is_empty() {
        io::print_success("Catalog is consistent.");
        return Ok(());
    }
    output_section(format!("{} catalog issue(s)", issues.len()));
    for issue in issues {
        io::print_warning(issue);
    }
    Ok(())
}
