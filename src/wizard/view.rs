//! Presentation model of the current wizard step.

use tracing::warn;

use crate::catalog::{
    Displayable, FieldKind, Identifiable, NamedEntity, QualityOption, ServiceIcon,
};
use crate::wizard::navigation::{next_step_after, ConfigurationGap};
use crate::wizard::state::WizardStep;
use crate::wizard::Wizard;

pub const BACK_LABEL: &str = "Kembali";
pub const RESTART_LABEL: &str = "Buat Estimasi Lain";
pub const SELECT_PLACEHOLDER: &str = "Pilih Opsi...";

#[derive(Debug, Clone, PartialEq)]
pub enum StepView {
    Choice(ChoiceView),
    Form(FormView),
    Result(ResultView),
}

/// Steps 1 to 4: a list of cards to pick from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceView {
    pub step: WizardStep,
    pub title: String,
    pub subtitle: Option<String>,
    pub options: Vec<ChoiceOption>,
    pub can_go_back: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub icon: Option<ServiceIcon>,
}

impl ChoiceOption {
    fn from_entry<T>(entry: &T, description: Option<&str>) -> Self
    where
        T: Identifiable + NamedEntity,
    {
        Self {
            id: entry.id().to_string(),
            label: entry.name().to_string(),
            description: description
                .filter(|text| !text.is_empty())
                .map(str::to_string),
            icon: None,
        }
    }

    /// `label - description`, or just the label.
    pub fn menu_label(&self) -> String {
        match &self.description {
            Some(description) => format!("{} - {}", self.label, description),
            None => self.label.clone(),
        }
    }
}

/// Step 5: the quantity form of the selected leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub title: String,
    pub leaf_label: String,
    pub unit: String,
    pub quality_tier: Option<String>,
    pub fields: Vec<FieldView>,
    pub submit_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    pub primary: bool,
    pub value: Option<String>,
}

/// Step 6: the estimate or the resolver's message.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub title: String,
    pub result: String,
    pub disclaimer: String,
    pub cta_label: String,
    pub whatsapp_link: Option<String>,
    pub restart_label: String,
}

fn or_default(text: &str, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text.to_string()
    }
}

impl Wizard {
    /// Describes what the current step shows. A catalog gap yields no view.
    pub fn view(&self) -> Result<StepView, ConfigurationGap> {
        let derived = next_step_after(self.catalog(), self.selection()).map_err(|gap| {
            warn!(step = ?self.step(), %gap, "cannot render wizard step");
            gap
        })?;
        let step = self.step();
        let page = self.catalog().page();
        let can_go_back = step != WizardStep::CategorySelect;
        let dangling = || ConfigurationGap::DanglingSelection {
            id: format!("step {}", step.number()),
        };

        let view = match step {
            WizardStep::CategorySelect => StepView::Choice(ChoiceView {
                step,
                title: step.title().to_string(),
                subtitle: Some(page.intro.paragraph.clone()).filter(|text| !text.is_empty()),
                options: self
                    .catalog()
                    .services()
                    .iter()
                    .map(|service| ChoiceOption {
                        icon: Some(service.icon.clone()),
                        ..ChoiceOption::from_entry(service, Some(service.description.as_str()))
                    })
                    .collect(),
                can_go_back,
            }),
            WizardStep::ServiceSelect => {
                let service = self.selected_service().ok_or_else(dangling)?;
                StepView::Choice(ChoiceView {
                    step,
                    title: step.title().to_string(),
                    subtitle: Some(format!(
                        "Pilih layanan spesifik di bawah kategori \"{}\".",
                        service.label
                    )),
                    options: service
                        .sub_services
                        .iter()
                        .map(|sub| ChoiceOption::from_entry(sub, None))
                        .collect(),
                    can_go_back,
                })
            }
            WizardStep::SubDetailSelect => {
                let sub = self.selected_sub_service().ok_or_else(dangling)?;
                StepView::Choice(ChoiceView {
                    step,
                    title: step.title().to_string(),
                    subtitle: Some(format!(
                        "Pilih jenis pekerjaan spesifik untuk \"{}\".",
                        sub.label
                    )),
                    options: sub
                        .sub_details()
                        .unwrap_or_default()
                        .iter()
                        .map(|detail| ChoiceOption::from_entry(detail, None))
                        .collect(),
                    can_go_back,
                })
            }
            WizardStep::QualitySelect => StepView::Choice(ChoiceView {
                step,
                title: or_default(&page.form.quality_label, step.title()),
                subtitle: None,
                options: self
                    .catalog()
                    .quality_options()
                    .iter()
                    .map(|option: &QualityOption| {
                        ChoiceOption::from_entry(option, Some(option.description.as_str()))
                    })
                    .collect(),
                can_go_back,
            }),
            WizardStep::QuantityForm => {
                let leaf = self.selected_leaf().ok_or_else(dangling)?;
                let primary_id = leaf.primary_field().map(|field| field.id.as_str());
                StepView::Form(FormView {
                    title: or_default(&page.form.title, step.title()),
                    leaf_label: self.leaf_label(),
                    unit: leaf.unit.clone(),
                    quality_tier: self.selection().quality_tier.clone(),
                    fields: leaf
                        .fields
                        .iter()
                        .map(|field| FieldView {
                            id: field.id.clone(),
                            label: field.label.clone(),
                            kind: field.kind.clone(),
                            primary: Some(field.id.as_str()) == primary_id,
                            value: self.selection().field_values.get(&field.id).cloned(),
                        })
                        .collect(),
                    submit_label: or_default(&page.form.button_text, "Hitung Estimasi Biaya"),
                })
            }
            WizardStep::Result => StepView::Result(ResultView {
                title: or_default(&page.results.title, step.title()),
                result: self.result().unwrap_or_default().to_string(),
                disclaimer: page.results.disclaimer.clone(),
                cta_label: or_default(&page.results.cta_button_text, "Dapatkan Penawaran Detail"),
                whatsapp_link: self.whatsapp_link(),
                restart_label: RESTART_LABEL.to_string(),
            }),
        };

        if derived < step {
            warn!(step = ?step, derived = ?derived, "wizard step ahead of its selection");
            return Err(dangling());
        }
        Ok(view)
    }

    fn leaf_label(&self) -> String {
        let sub = self.selected_sub_service();
        let detail = sub.and_then(|sub| sub.sub_detail(self.selection().sub_detail_id.as_deref()?));
        match (sub, detail) {
            (_, Some(detail)) => detail.display_label(),
            (Some(sub), None) => sub.display_label(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::Catalog;

    fn wizard() -> Wizard {
        Wizard::new(Arc::new(Catalog::builtin().unwrap()))
    }

    #[test]
    fn category_view_lists_services_with_icons() {
        let view = wizard().view().unwrap();
        let StepView::Choice(choice) = view else {
            panic!("expected choice view");
        };
        assert_eq!(choice.title, "Pilih Kategori Layanan");
        assert_eq!(choice.options.len(), 7);
        assert_eq!(choice.options[1].id, "konstruksi");
        assert_eq!(choice.options[1].icon, Some(ServiceIcon::BuildingOffice));
        assert!(!choice.can_go_back);
    }

    #[test]
    fn quality_view_uses_global_tiers() {
        let mut wizard = wizard();
        wizard.select_service("konstruksi").unwrap();
        wizard.select_sub_service("bangun-rumah").unwrap();
        let StepView::Choice(choice) = wizard.view().unwrap() else {
            panic!("expected choice view");
        };
        let ids: Vec<&str> = choice.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["Standar", "Menengah", "Premium"]);
        assert_eq!(choice.title, "Kualitas Material");
    }

    #[test]
    fn form_view_marks_primary_field_and_values() {
        let mut wizard = wizard();
        wizard.select_service("mep").unwrap();
        wizard.select_sub_service("instalasi-listrik").unwrap();
        wizard.set_field_value("jumlah", "12").unwrap();
        let StepView::Form(form) = wizard.view().unwrap() else {
            panic!("expected form view");
        };
        assert_eq!(form.unit, "titik");
        assert_eq!(form.submit_label, "Hitung Estimasi Biaya");
        assert!(form.fields[0].primary);
        assert_eq!(form.fields[0].value.as_deref(), Some("12"));
    }

    #[test]
    fn result_view_carries_copy_and_link() {
        let mut wizard = wizard();
        wizard.select_service("mep").unwrap();
        wizard.select_sub_service("instalasi-listrik").unwrap();
        wizard.set_field_value("jumlah", "25").unwrap();
        wizard.submit().unwrap();
        let StepView::Result(result) = wizard.view().unwrap() else {
            panic!("expected result view");
        };
        assert_eq!(result.title, "Estimasi Biaya Proyek Anda");
        assert_eq!(result.result, "Rp\u{a0}11.250.000 - Rp\u{a0}14.062.500");
        assert_eq!(result.cta_label, "Dapatkan Penawaran Detail");
        assert_eq!(result.restart_label, RESTART_LABEL);
        assert!(result.whatsapp_link.is_some());
    }
}
