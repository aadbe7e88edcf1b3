use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};

const QUICK_START: [&str; 3] = [
    "estimate                 walk through the calculator step by step",
    "catalog show konstruksi  see what a service offers and its prices",
    "quote mep instalasi-listrik jumlah=25",
];

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Available commands");
    let width = registry.list().map(|entry| entry.name.len()).max().unwrap_or(0);
    for entry in registry.list() {
        io::print_info(format!("  {:<width$}  {}", entry.name, entry.description));
    }
    output_section("Quick start");
    for line in QUICK_START {
        io::print_info(format!("  {line}"));
    }
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    io::print_info(format!("  {}", entry.description));
    io::print_info(format!("  Usage: {}", entry.usage));
    if !entry.examples.is_empty() {
        io::print_info("  Examples:");
        for example in entry.examples {
            io::print_info(format!("    {example}"));
        }
    }
}
