use std::{
    fmt,
    io::{self, BufRead},
    sync::Arc,
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::catalog::{Catalog, SubServiceShape};
use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output::{self, info as output_info};

/// Set to read commands from stdin without prompts.
pub const SCRIPT_ENV: &str = "COST_SIMULATOR_CLI_SCRIPT";

const CATALOG_VIEWS: [&str; 4] = ["list", "show", "tiers", "check"];
const CONTENT_ACTIONS: [&str; 6] = ["path", "export", "import", "backup", "backups", "restore"];
const CONFIG_ACTIONS: [&str; 5] = ["show", "set", "backup", "backups", "restore"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(
        context.command_names(),
        Arc::clone(&context.catalog),
    )));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::section("Simulasi Biaya Konstruksi");
    output_info(format!(
        "{} services loaded. Type `estimate` to start or `help` for commands.",
        context.catalog.services().len()
    ));

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                match context.process_line(trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
                // `content import`/`restore` swap the catalog under the completer.
                if let Some(helper) = editor.helper_mut() {
                    helper.catalog = Arc::clone(&context.catalog);
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if !context.running {
            break;
        }
        match context.process_line(&line?) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

/// Tab completion for command names and the catalog ids they take.
struct CommandHelper {
    commands: Vec<String>,
    catalog: Arc<Catalog>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>, catalog: Arc<Catalog>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands, catalog }
    }

    /// Candidates for the word being typed at the end of `prefix`, plus where it starts.
    fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        let needle = prefix[start..].to_lowercase();

        let pool: Vec<String> = match words.as_slice() {
            [] => self.commands.clone(),
            [command, rest @ ..] => self.arguments(&command.to_lowercase(), rest),
        };
        let matches = pool
            .into_iter()
            .filter(|candidate| candidate.to_lowercase().starts_with(&needle))
            .collect();
        (start, matches)
    }

    fn arguments(&self, command: &str, done: &[&str]) -> Vec<String> {
        match (command, done) {
            ("estimate", []) | ("quote", []) | ("catalog", ["show"]) => self.service_ids(),
            ("quote", [service]) => self.sub_service_ids(service),
            ("quote", [service, sub, rest @ ..]) => self.leaf_arguments(service, sub, rest),
            ("catalog", []) => owned(&CATALOG_VIEWS),
            ("content", []) => owned(&CONTENT_ACTIONS),
            ("config", []) => owned(&CONFIG_ACTIONS),
            ("help", []) => self.commands.clone(),
            _ => Vec::new(),
        }
    }

    fn service_ids(&self) -> Vec<String> {
        self.catalog
            .services()
            .iter()
            .map(|service| service.id.clone())
            .collect()
    }

    fn sub_service_ids(&self, service_id: &str) -> Vec<String> {
        self.catalog
            .service(service_id)
            .map(|service| service.sub_services.iter().map(|sub| sub.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Sub-detail ids first for branches, then `quality=` and `<field>=` pairs.
    fn leaf_arguments(&self, service_id: &str, sub_id: &str, rest: &[&str]) -> Vec<String> {
        let Some(sub) = self.catalog.sub_service(service_id, sub_id) else {
            return Vec::new();
        };
        let leaf = match (&sub.shape, rest.first()) {
            (SubServiceShape::Branch(details), None) => {
                return details.iter().map(|detail| detail.id.clone()).collect();
            }
            (SubServiceShape::Branch(_), Some(detail_id)) => sub
                .sub_detail(detail_id)
                .map(|detail| &detail.pricing),
            (SubServiceShape::Leaf(pricing), _) => Some(pricing),
        };
        let Some(leaf) = leaf else {
            return Vec::new();
        };

        let mut pairs = Vec::new();
        if leaf.is_tiered() {
            pairs.extend(
                self.catalog
                    .quality_options()
                    .iter()
                    .map(|option| format!("quality={}", option.title)),
            );
        }
        pairs.extend(leaf.fields.iter().map(|field| format!("{}=", field.id)));
        pairs.retain(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !rest.iter().any(|done| done.starts_with(&format!("{key}=")))
        });
        pairs
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> CommandHelper {
        CommandHelper::new(
            vec!["quote", "estimate", "quote", "exit", "catalog"],
            Arc::new(Catalog::builtin().unwrap()),
        )
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line("quote konstruksi bangun-rumah \"luas=150\"").unwrap();
        assert_eq!(tokens, vec!["quote", "konstruksi", "bangun-rumah", "luas=150"]);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line("quote \"konstruksi").is_err());
    }

    #[test]
    fn command_names_are_sorted_and_unique() {
        assert_eq!(helper().commands, vec!["catalog", "estimate", "exit", "quote"]);
        assert_eq!(
            helper().candidates("e"),
            (0, vec!["estimate".to_string(), "exit".to_string()])
        );
    }

    #[test]
    fn service_and_sub_service_ids_complete() {
        let helper = helper();
        assert_eq!(
            helper.candidates("estimate kon"),
            (9, vec!["konsultasi".to_string(), "konstruksi".to_string()])
        );
        let (start, subs) = helper.candidates("quote konstruksi bangun-");
        assert_eq!(start, 17);
        assert_eq!(subs, ["bangun-rumah", "bangun-ruko"]);
        assert_eq!(helper.candidates("catalog show sm").1, ["smart"]);
    }

    #[test]
    fn quote_offers_details_tiers_and_fields() {
        let helper = helper();
        let details = helper.candidates("quote konstruksi renovasi-sebagian ").1;
        assert!(details.contains(&"ganti-keramik".to_string()));

        let pairs = helper.candidates("quote konstruksi bangun-rumah ").1;
        assert!(pairs.contains(&"quality=Menengah".to_string()));
        assert!(pairs.contains(&"luas=".to_string()));

        let remaining = helper
            .candidates("quote konstruksi bangun-rumah quality=Premium ")
            .1;
        assert_eq!(remaining, ["luas="]);
        assert!(helper.candidates("quote mep instalasi-listrik q").1.is_empty());
    }
}
