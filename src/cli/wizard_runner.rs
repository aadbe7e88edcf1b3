//! Drives a [`Wizard`] from its step views through an interaction backend.
//!
//! The interactive backend renders dialoguer menus; the scripted backend
//! answers from command arguments so `quote` and the tests share one loop.

use std::collections::{BTreeMap, VecDeque};
use std::io;

use crossterm::{cursor, terminal, ExecutableCommand};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use tracing::debug;

use crate::catalog::FieldKind;
use crate::cli::core::CommandError;
use crate::cli::output;
use crate::wizard::view::{BACK_LABEL, SELECT_PLACEHOLDER};
use crate::wizard::{
    ChoiceView, FieldView, FormView, ResultView, StepView, Wizard, WizardError, WizardStep,
};

const FINISH_LABEL: &str = "Selesai";
const BACK_TOKEN: &str = "<";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceResponse {
    Choose(String),
    Back,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldResponse {
    Value(String),
    Back,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultResponse {
    Restart,
    Back,
    Finish,
}

/// Outcome of a wizard session.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardRun {
    Completed(ResultView),
    Cancelled,
}

/// Answers the prompts of each wizard step.
pub trait StepInteraction {
    fn choose(&mut self, view: &ChoiceView) -> Result<ChoiceResponse, CommandError>;

    fn fill_field(
        &mut self,
        form: &FormView,
        field: &FieldView,
    ) -> Result<FieldResponse, CommandError>;

    fn show_result(&mut self, view: &ResultView) -> Result<ResultResponse, CommandError>;

    /// A rejected action; the wizard stays on the same step.
    fn notify(&mut self, message: &str);
}

pub fn run_wizard<I: StepInteraction>(
    wizard: &mut Wizard,
    interaction: &mut I,
) -> Result<WizardRun, CommandError> {
    loop {
        let view = wizard.view().map_err(WizardError::from)?;
        match view {
            StepView::Choice(choice) => match interaction.choose(&choice)? {
                ChoiceResponse::Choose(id) => {
                    if let Err(err) = wizard.choose(&id) {
                        interaction.notify(&err.to_string());
                    }
                }
                ChoiceResponse::Back => {
                    if wizard.back().is_err() {
                        return Ok(WizardRun::Cancelled);
                    }
                }
                ChoiceResponse::Cancel => return Ok(WizardRun::Cancelled),
            },
            StepView::Form(form) => {
                if !fill_form(wizard, &form, interaction)? {
                    return Ok(WizardRun::Cancelled);
                }
            }
            StepView::Result(result) => match interaction.show_result(&result)? {
                ResultResponse::Restart => {
                    wizard.restart()?;
                }
                ResultResponse::Back => {
                    wizard.back()?;
                }
                ResultResponse::Finish => return Ok(WizardRun::Completed(result)),
            },
        }
    }
}

/// Collects every field, then submits. `false` means the user cancelled.
fn fill_form<I: StepInteraction>(
    wizard: &mut Wizard,
    form: &FormView,
    interaction: &mut I,
) -> Result<bool, CommandError> {
    let mut index = 0;
    while index < form.fields.len() {
        let field = &form.fields[index];
        match interaction.fill_field(form, field)? {
            FieldResponse::Value(value) => {
                wizard.set_field_value(&field.id, value)?;
                index += 1;
            }
            FieldResponse::Back if index == 0 => {
                wizard.back()?;
                return Ok(true);
            }
            FieldResponse::Back => index -= 1,
            FieldResponse::Cancel => return Ok(false),
        }
    }

    if let Err(err) = wizard.submit() {
        debug!(error = %err, "form submission refused");
        interaction.notify(&err.to_string());
    }
    Ok(true)
}

/// Terminal prompts backed by dialoguer.
pub struct DialoguerInteraction<'a> {
    theme: &'a ColorfulTheme,
    /// Warning from a refused action, shown on the next screen.
    pending_notice: Option<String>,
}

impl<'a> DialoguerInteraction<'a> {
    pub fn new(theme: &'a ColorfulTheme) -> Self {
        Self {
            theme,
            pending_notice: None,
        }
    }

    /// Clears the terminal, then repeats any pending warning on the fresh screen.
    fn redraw(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout
            .execute(terminal::Clear(terminal::ClearType::All))
            .and_then(|out| out.execute(cursor::MoveTo(0, 0)));
        if let Some(notice) = self.pending_notice.take() {
            output::warning(notice);
        }
    }
}

impl StepInteraction for DialoguerInteraction<'_> {
    fn choose(&mut self, view: &ChoiceView) -> Result<ChoiceResponse, CommandError> {
        self.redraw();
        output::section(format!("Langkah {}/6", view.step.number()));
        output::highlight(&view.title);
        if let Some(subtitle) = &view.subtitle {
            output::info(subtitle);
        }

        let mut labels: Vec<String> = view.options.iter().map(|option| option.menu_label()).collect();
        if view.can_go_back {
            labels.push(BACK_LABEL.to_string());
        }

        let picked = Select::with_theme(self.theme)
            .items(&labels)
            .default(0)
            .interact_opt()?;

        Ok(match picked {
            Some(index) if index < view.options.len() => {
                ChoiceResponse::Choose(view.options[index].id.clone())
            }
            Some(_) => ChoiceResponse::Back,
            None => ChoiceResponse::Cancel,
        })
    }

    fn fill_field(
        &mut self,
        form: &FormView,
        field: &FieldView,
    ) -> Result<FieldResponse, CommandError> {
        if field.id == form.fields.first().map(|first| first.id.as_str()).unwrap_or_default() {
            self.redraw();
            output::section(format!("Langkah 5/6: {}", form.title));
            output::highlight(&form.leaf_label);
            if let Some(tier) = &form.quality_tier {
                output::info(format!("Kualitas material: {tier}"));
            }
            output::hint(format!("Ketik `{BACK_TOKEN}` untuk kembali."));
        }

        match &field.kind {
            FieldKind::Numeric { placeholder } => {
                let prompt = if form.unit.is_empty() || !field.primary {
                    field.label.clone()
                } else {
                    format!("{} ({})", field.label, form.unit)
                };
                let mut input = Input::<String>::with_theme(self.theme)
                    .with_prompt(prompt)
                    .allow_empty(true);
                if let Some(value) = &field.value {
                    input = input.with_initial_text(value.clone());
                } else if let Some(placeholder) = placeholder {
                    output::hint(format!("contoh: {placeholder}"));
                }
                let text = input.interact_text()?;
                if text.trim() == BACK_TOKEN {
                    Ok(FieldResponse::Back)
                } else {
                    Ok(FieldResponse::Value(text))
                }
            }
            FieldKind::Select { options } => {
                let mut labels = options.clone();
                labels.push(BACK_LABEL.to_string());
                let default = field
                    .value
                    .as_ref()
                    .and_then(|value| options.iter().position(|option| option == value))
                    .unwrap_or(0);
                let picked = Select::with_theme(self.theme)
                    .with_prompt(format!("{} ({SELECT_PLACEHOLDER})", field.label))
                    .items(&labels)
                    .default(default)
                    .interact_opt()?;
                Ok(match picked {
                    Some(index) if index < options.len() => {
                        FieldResponse::Value(options[index].clone())
                    }
                    Some(_) => FieldResponse::Back,
                    None => FieldResponse::Cancel,
                })
            }
        }
    }

    fn show_result(&mut self, view: &ResultView) -> Result<ResultResponse, CommandError> {
        self.redraw();
        print_result(view);
        let labels = [view.restart_label.as_str(), BACK_LABEL, FINISH_LABEL];
        let picked = Select::with_theme(self.theme)
            .items(&labels)
            .default(2)
            .interact_opt()?;
        Ok(match picked {
            Some(0) => ResultResponse::Restart,
            Some(1) => ResultResponse::Back,
            _ => ResultResponse::Finish,
        })
    }

    fn notify(&mut self, message: &str) {
        self.pending_notice = Some(message.to_string());
    }
}

/// Prints the result block shared by `estimate` and `quote`.
pub fn print_result(view: &ResultView) {
    output::section(&view.title);
    output::highlight(&view.result);
    if !view.disclaimer.is_empty() {
        output::info(&view.disclaimer);
    }
    match &view.whatsapp_link {
        Some(link) => output::hint(format!("{}: {}", view.cta_label, link)),
        None => output::hint(&view.cta_label),
    }
}

/// Answers from command arguments: positional choices for the selection
/// steps, a quality tier, and field values by id.
#[derive(Debug, Default)]
pub struct ScriptedInteraction {
    choices: VecDeque<String>,
    quality: Option<String>,
    fields: BTreeMap<String, String>,
    used_fields: Vec<String>,
    quality_used: bool,
    failure: Option<String>,
}

impl ScriptedInteraction {
    pub fn new(
        choices: Vec<String>,
        quality: Option<String>,
        fields: BTreeMap<String, String>,
    ) -> Self {
        Self {
            choices: choices.into(),
            quality,
            fields,
            ..Self::default()
        }
    }

    /// Splits `quote` arguments: `key=value` pairs are fields, `quality=` is
    /// the tier, anything else is a positional choice.
    pub fn from_args(args: &[&str]) -> Self {
        let mut choices = Vec::new();
        let mut quality = None;
        let mut fields = BTreeMap::new();
        for arg in args {
            match arg.split_once('=') {
                Some(("quality", tier)) => quality = Some(tier.to_string()),
                Some((key, value)) => {
                    fields.insert(key.to_string(), value.to_string());
                }
                None => choices.push(arg.to_string()),
            }
        }
        Self::new(choices, quality, fields)
    }

    /// Why the run stopped early, if it did.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Arguments the wizard never asked for.
    pub fn unused(&self) -> Vec<String> {
        let mut unused: Vec<String> = self.choices.iter().cloned().collect();
        if let Some(tier) = self.quality.as_ref().filter(|_| !self.quality_used) {
            unused.push(format!("quality={tier}"));
        }
        unused.extend(
            self.fields
                .iter()
                .filter(|(key, _)| !self.used_fields.contains(key))
                .map(|(key, value)| format!("{key}={value}")),
        );
        unused
    }

    fn fail(&mut self, message: String) {
        if self.failure.is_none() {
            self.failure = Some(message);
        }
    }
}

impl StepInteraction for ScriptedInteraction {
    fn choose(&mut self, view: &ChoiceView) -> Result<ChoiceResponse, CommandError> {
        if self.failure.is_some() {
            return Ok(ChoiceResponse::Cancel);
        }
        let answer = if view.step == WizardStep::QualitySelect {
            self.quality_used = true;
            self.quality.clone()
        } else {
            self.choices.pop_front()
        };
        match answer {
            Some(id) => Ok(ChoiceResponse::Choose(id)),
            None => {
                let expected = if view.step == WizardStep::QualitySelect {
                    "quality=<tier>".to_string()
                } else {
                    "an id".to_string()
                };
                let options: Vec<&str> = view.options.iter().map(|o| o.id.as_str()).collect();
                self.fail(format!(
                    "{} needs {expected}; options: {}",
                    view.step,
                    options.join(", ")
                ));
                Ok(ChoiceResponse::Cancel)
            }
        }
    }

    fn fill_field(
        &mut self,
        _form: &FormView,
        field: &FieldView,
    ) -> Result<FieldResponse, CommandError> {
        if self.failure.is_some() {
            return Ok(FieldResponse::Cancel);
        }
        match self.fields.get(&field.id) {
            Some(value) => {
                self.used_fields.push(field.id.clone());
                Ok(FieldResponse::Value(value.clone()))
            }
            None => {
                let hint = match &field.kind {
                    FieldKind::Select { options } => format!(" ({})", options.join("|")),
                    FieldKind::Numeric { .. } => String::new(),
                };
                self.fail(format!("missing value `{}=...`{hint}", field.id));
                Ok(FieldResponse::Cancel)
            }
        }
    }

    fn show_result(&mut self, _view: &ResultView) -> Result<ResultResponse, CommandError> {
        Ok(ResultResponse::Finish)
    }

    fn notify(&mut self, message: &str) {
        self.fail(message.to_string());
    }
}
