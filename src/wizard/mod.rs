//! Six-step estimation wizard: service, sub-service, optional sub-detail,
//! optional quality tier, quantity form and result.
//!
//! Every action names the step it belongs to. An action that arrives while the
//! wizard sits on another step is rejected with [`WizardError::UnexpectedAction`]
//! and leaves the state untouched.

pub mod navigation;
pub mod state;
pub mod view;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{Catalog, FieldKind, LeafPricing, Service, SubService};
use crate::contact;
use crate::currency::MoneyFormatter;
use crate::pricing::{self, CostRange, PricingError};

pub use navigation::{
    next_step_after, previous_step, route_after_leaf, route_after_sub_service, ConfigurationGap,
    NextStep,
};
pub use state::{PreSeed, Selection, WizardStep};
pub use view::{ChoiceOption, ChoiceView, FieldView, FormView, ResultView, StepView};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("`{action}` is not available at step {step}")]
    UnexpectedAction {
        action: &'static str,
        step: WizardStep,
    },
    #[error("Unknown service `{0}`")]
    UnknownService(String),
    #[error("Unknown sub-service `{0}`")]
    UnknownSubService(String),
    #[error("Unknown sub-detail `{0}`")]
    UnknownSubDetail(String),
    #[error("Unknown material quality `{0}`")]
    UnknownQualityTier(String),
    #[error("Unknown field `{0}`")]
    UnknownField(String),
    #[error("`{value}` is not an option of field `{field_id}`")]
    InvalidOption { field_id: String, value: String },
    #[error("Already at the first step")]
    NoPreviousStep,
    #[error("Catalog configuration gap: {0}")]
    Configuration(#[from] ConfigurationGap),
}

/// What the resolver produced for the last submission.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateOutcome {
    Estimated(CostRange),
    Rejected(PricingError),
}

#[derive(Debug, Clone)]
pub struct Wizard {
    catalog: Arc<Catalog>,
    step: WizardStep,
    selection: Selection,
    outcome: Option<EstimateOutcome>,
    formatter: MoneyFormatter,
}

impl Wizard {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            step: WizardStep::CategorySelect,
            selection: Selection::default(),
            outcome: None,
            formatter: MoneyFormatter::rupiah(),
        }
    }

    /// Starts at the service step when the pre-seeded service exists.
    pub fn with_preseed(catalog: Arc<Catalog>, preseed: &PreSeed) -> Self {
        let mut wizard = Self::new(catalog);
        if let Some(id) = preseed.service_id.as_deref() {
            if wizard.catalog.service(id).is_some() {
                wizard.selection.service_id = Some(id.to_string());
                wizard.step = WizardStep::ServiceSelect;
                debug!(service = id, "wizard pre-seeded");
            } else {
                warn!(service = id, "ignoring unknown pre-seeded service");
            }
        }
        wizard
    }

    /// Rebuilds a wizard on the step the selection belongs on.
    pub fn resume(catalog: Arc<Catalog>, selection: Selection) -> Result<Self, ConfigurationGap> {
        let step = next_step_after(&catalog, &selection)?;
        Ok(Self {
            step,
            selection,
            ..Self::new(catalog)
        })
    }

    pub fn with_formatter(mut self, formatter: MoneyFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn outcome(&self) -> Option<&EstimateOutcome> {
        self.outcome.as_ref()
    }

    pub fn result(&self) -> Option<&str> {
        self.selection.result.as_deref()
    }

    pub fn formatter(&self) -> &MoneyFormatter {
        &self.formatter
    }

    pub fn whatsapp_link(&self) -> Option<String> {
        contact::whatsapp_link(self.catalog.contact_phone())
    }

    /// Step 1: picking a service clears everything chosen after it.
    pub fn select_service(&mut self, service_id: &str) -> Result<WizardStep, WizardError> {
        self.expect_step(WizardStep::CategorySelect, "select_service")?;
        if self.catalog.service(service_id).is_none() {
            return Err(WizardError::UnknownService(service_id.to_string()));
        }
        self.selection.service_id = Some(service_id.to_string());
        self.selection.clear_below_service();
        self.outcome = None;
        self.move_to(WizardStep::ServiceSelect)
    }

    pub fn select_sub_service(&mut self, sub_service_id: &str) -> Result<WizardStep, WizardError> {
        self.expect_step(WizardStep::ServiceSelect, "select_sub_service")?;
        let catalog = Arc::clone(&self.catalog);
        let sub = selected_service(&catalog, &self.selection)?
            .sub_service(sub_service_id)
            .ok_or_else(|| WizardError::UnknownSubService(sub_service_id.to_string()))?;
        let next = route_after_sub_service(sub).map_err(|gap| self.refuse(gap))?;

        self.selection.sub_service_id = Some(sub.id.clone());
        self.selection.clear_below_sub_service();
        self.outcome = None;
        self.move_to(next.into())
    }

    pub fn select_sub_detail(&mut self, sub_detail_id: &str) -> Result<WizardStep, WizardError> {
        self.expect_step(WizardStep::SubDetailSelect, "select_sub_detail")?;
        let catalog = Arc::clone(&self.catalog);
        let detail = selected_sub_service(&catalog, &self.selection)?
            .sub_detail(sub_detail_id)
            .ok_or_else(|| WizardError::UnknownSubDetail(sub_detail_id.to_string()))?;
        let next = route_after_leaf(&detail.id, &detail.pricing).map_err(|gap| self.refuse(gap))?;

        self.selection.sub_detail_id = Some(detail.id.clone());
        self.selection.clear_below_sub_detail();
        self.outcome = None;
        self.move_to(next.into())
    }

    /// Step 4: tiers come from the global quality list. Entered values survive.
    pub fn select_quality(&mut self, tier: &str) -> Result<WizardStep, WizardError> {
        self.expect_step(WizardStep::QualitySelect, "select_quality")?;
        if !self.catalog.is_known_tier(tier) {
            return Err(WizardError::UnknownQualityTier(tier.to_string()));
        }
        self.selection.quality_tier = Some(tier.to_string());
        self.selection.result = None;
        self.outcome = None;
        self.move_to(WizardStep::QuantityForm)
    }

    /// Applies a choice to whichever selection step is current.
    pub fn choose(&mut self, id: &str) -> Result<WizardStep, WizardError> {
        match self.step {
            WizardStep::CategorySelect => self.select_service(id),
            WizardStep::ServiceSelect => self.select_sub_service(id),
            WizardStep::SubDetailSelect => self.select_sub_detail(id),
            WizardStep::QualitySelect => self.select_quality(id),
            step => Err(WizardError::UnexpectedAction {
                action: "choose",
                step,
            }),
        }
    }

    pub fn set_field_value(
        &mut self,
        field_id: &str,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.expect_step(WizardStep::QuantityForm, "set_field_value")?;
        let catalog = Arc::clone(&self.catalog);
        let leaf = selected_leaf(&catalog, &self.selection)?;
        if leaf.field(field_id).is_none() {
            return Err(WizardError::UnknownField(field_id.to_string()));
        }
        self.selection
            .field_values
            .insert(field_id.to_string(), value.into());
        Ok(())
    }

    /// Prices the form. Resolver failures still land on the result step.
    pub fn submit(&mut self) -> Result<WizardStep, WizardError> {
        self.expect_step(WizardStep::QuantityForm, "submit")?;
        let catalog = Arc::clone(&self.catalog);
        let leaf = selected_leaf(&catalog, &self.selection)?;

        for field in &leaf.fields {
            if let FieldKind::Select { options } = &field.kind {
                let value = self
                    .selection
                    .field_values
                    .get(&field.id)
                    .cloned()
                    .unwrap_or_default();
                if !options.contains(&value) {
                    return Err(WizardError::InvalidOption {
                        field_id: field.id.clone(),
                        value,
                    });
                }
            }
        }

        let raw_quantity = leaf
            .primary_field()
            .and_then(|field| self.selection.field_values.get(&field.id))
            .map(String::as_str)
            .unwrap_or_default();
        let (text, outcome) = match pricing::resolve_input(
            leaf,
            self.selection.quality_tier.as_deref(),
            raw_quantity,
        ) {
            Ok(range) => (range.render(&self.formatter), EstimateOutcome::Estimated(range)),
            Err(err) => {
                debug!(error = %err, "estimate rejected");
                (err.to_string(), EstimateOutcome::Rejected(err))
            }
        };
        self.selection.result = Some(text);
        self.outcome = Some(outcome);
        self.move_to(WizardStep::Result)
    }

    /// Returns to the preceding step of the chain taken. Nothing is cleared.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let previous =
            previous_step(&self.catalog, &self.selection, self.step).ok_or(WizardError::NoPreviousStep)?;
        self.move_to(previous)
    }

    /// "Compute another estimate": full reset from the result step.
    pub fn restart(&mut self) -> Result<WizardStep, WizardError> {
        self.expect_step(WizardStep::Result, "restart")?;
        self.selection = Selection::default();
        self.outcome = None;
        self.move_to(WizardStep::CategorySelect)
    }

    pub fn selected_service(&self) -> Option<&Service> {
        selected_service(&self.catalog, &self.selection).ok()
    }

    pub fn selected_sub_service(&self) -> Option<&SubService> {
        selected_sub_service(&self.catalog, &self.selection).ok()
    }

    pub fn selected_leaf(&self) -> Option<&LeafPricing> {
        selected_leaf(&self.catalog, &self.selection).ok()
    }

    fn expect_step(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            debug!(action, step = ?self.step, "rejecting out-of-step action");
            Err(WizardError::UnexpectedAction {
                action,
                step: self.step,
            })
        }
    }

    fn refuse(&self, gap: ConfigurationGap) -> WizardError {
        warn!(step = ?self.step, %gap, "configuration gap, transition refused");
        WizardError::Configuration(gap)
    }

    fn move_to(&mut self, step: WizardStep) -> Result<WizardStep, WizardError> {
        debug!(from = ?self.step, to = ?step, "wizard transition");
        self.step = step;
        Ok(step)
    }
}

fn dangling(id: &str) -> WizardError {
    WizardError::Configuration(ConfigurationGap::DanglingSelection { id: id.to_string() })
}

fn selected_service<'a>(catalog: &'a Catalog, selection: &Selection) -> Result<&'a Service, WizardError> {
    let id = selection.service_id.as_deref().unwrap_or_default();
    catalog.service(id).ok_or_else(|| dangling(id))
}

fn selected_sub_service<'a>(
    catalog: &'a Catalog,
    selection: &Selection,
) -> Result<&'a SubService, WizardError> {
    let id = selection.sub_service_id.as_deref().unwrap_or_default();
    selected_service(catalog, selection)?
        .sub_service(id)
        .ok_or_else(|| dangling(id))
}

fn selected_leaf<'a>(catalog: &'a Catalog, selection: &Selection) -> Result<&'a LeafPricing, WizardError> {
    let sub = selected_sub_service(catalog, selection)?;
    match selection.sub_detail_id.as_deref() {
        Some(detail_id) => sub
            .sub_detail(detail_id)
            .map(|detail| &detail.pricing)
            .ok_or_else(|| dangling(detail_id)),
        None => sub.leaf().ok_or_else(|| dangling(&sub.id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> Wizard {
        Wizard::new(Arc::new(Catalog::builtin().unwrap()))
    }

    #[test]
    fn tiered_leaf_walks_through_quality() {
        let mut wizard = wizard();
        assert_eq!(wizard.choose("konstruksi"), Ok(WizardStep::ServiceSelect));
        assert_eq!(wizard.choose("bangun-rumah"), Ok(WizardStep::QualitySelect));
        assert_eq!(wizard.choose("Menengah"), Ok(WizardStep::QuantityForm));
        wizard.set_field_value("luas", "150").unwrap();
        assert_eq!(wizard.submit(), Ok(WizardStep::Result));
        assert_eq!(
            wizard.result(),
            Some("Rp\u{a0}750.000.000 - Rp\u{a0}937.500.000")
        );
        assert!(matches!(
            wizard.outcome(),
            Some(EstimateOutcome::Estimated(range)) if range.upper_bound == 937_500_000.0
        ));
    }

    #[test]
    fn flat_leaf_skips_quality() {
        let mut wizard = wizard();
        wizard.select_service("mep").unwrap();
        assert_eq!(
            wizard.select_sub_service("instalasi-listrik"),
            Ok(WizardStep::QuantityForm)
        );
        wizard.set_field_value("jumlah", "25").unwrap();
        wizard.submit().unwrap();
        assert_eq!(wizard.result(), Some("Rp\u{a0}11.250.000 - Rp\u{a0}14.062.500"));
        assert!(wizard.selection().quality_tier.is_none());
    }

    #[test]
    fn branch_goes_through_sub_detail() {
        let mut wizard = wizard();
        wizard.select_service("interior").unwrap();
        assert_eq!(
            wizard.select_sub_service("fit-out"),
            Ok(WizardStep::SubDetailSelect)
        );
        assert_eq!(
            wizard.select_sub_detail("lantai-vinyl"),
            Ok(WizardStep::QualitySelect)
        );
        assert_eq!(wizard.back(), Ok(WizardStep::SubDetailSelect));
    }

    #[test]
    fn invalid_quantity_still_reaches_result() {
        let mut wizard = wizard();
        wizard.select_service("mep").unwrap();
        wizard.select_sub_service("instalasi-listrik").unwrap();
        wizard.set_field_value("jumlah", "0").unwrap();
        assert_eq!(wizard.submit(), Ok(WizardStep::Result));
        assert_eq!(wizard.result(), Some("Input tidak valid."));
        assert_eq!(
            wizard.outcome(),
            Some(&EstimateOutcome::Rejected(PricingError::InvalidQuantity))
        );
    }

    #[test]
    fn out_of_step_actions_are_rejected_without_side_effects() {
        let mut wizard = wizard();
        wizard.select_service("konstruksi").unwrap();
        let before = wizard.selection().clone();
        assert_eq!(
            wizard.select_service("mep"),
            Err(WizardError::UnexpectedAction {
                action: "select_service",
                step: WizardStep::ServiceSelect
            })
        );
        assert_eq!(wizard.selection(), &before);
        assert!(wizard.submit().is_err());
        assert!(wizard.restart().is_err());
        assert_eq!(wizard.step(), WizardStep::ServiceSelect);
    }

    #[test]
    fn reselecting_after_back_clears_deeper_state() {
        let mut wizard = wizard();
        wizard.select_service("konstruksi").unwrap();
        wizard.select_sub_service("bangun-rumah").unwrap();
        wizard.select_quality("Premium").unwrap();
        wizard.set_field_value("luas", "80").unwrap();
        wizard.back().unwrap();
        wizard.back().unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.step(), WizardStep::CategorySelect);
        assert_eq!(wizard.selection().quality_tier.as_deref(), Some("Premium"));

        wizard.select_service("konstruksi").unwrap();
        let selection = wizard.selection();
        assert!(selection.sub_service_id.is_none());
        assert!(selection.quality_tier.is_none());
        assert!(selection.field_values.is_empty());
        assert_eq!(wizard.back(), Ok(WizardStep::CategorySelect));
        assert_eq!(wizard.back(), Err(WizardError::NoPreviousStep));
    }

    #[test]
    fn leaf_without_quantity_field_is_refused() {
        let mut wizard = wizard();
        wizard.select_service("konsultasi").unwrap();
        let err = wizard.select_sub_service("perizinan").unwrap_err();
        assert!(matches!(
            err,
            WizardError::Configuration(ConfigurationGap::MissingQuantityField { .. })
        ));
        assert_eq!(wizard.step(), WizardStep::ServiceSelect);
        assert!(wizard.selection().sub_service_id.is_none());
    }

    #[test]
    fn preseed_starts_on_service_step() {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let wizard = Wizard::with_preseed(Arc::clone(&catalog), &PreSeed::service("repair"));
        assert_eq!(wizard.step(), WizardStep::ServiceSelect);
        let unknown = Wizard::with_preseed(catalog, &PreSeed::service("nope"));
        assert_eq!(unknown.step(), WizardStep::CategorySelect);
        assert!(unknown.selection().is_empty());
    }

    #[test]
    fn unknown_field_and_tier_are_rejected() {
        let mut wizard = wizard();
        wizard.select_service("konstruksi").unwrap();
        wizard.select_sub_service("bangun-ruko").unwrap();
        assert_eq!(
            wizard.select_quality("Gold"),
            Err(WizardError::UnknownQualityTier("Gold".into()))
        );
        wizard.select_quality("Standar").unwrap();
        assert_eq!(
            wizard.set_field_value("tinggi", "3"),
            Err(WizardError::UnknownField("tinggi".into()))
        );
    }

    #[test]
    fn restart_resets_everything() {
        let mut wizard = wizard();
        wizard.select_service("smart").unwrap();
        wizard.select_sub_service("cctv").unwrap();
        wizard.set_field_value("jumlah", "4").unwrap();
        wizard.submit().unwrap();
        assert_eq!(wizard.restart(), Ok(WizardStep::CategorySelect));
        assert!(wizard.selection().is_empty());
        assert!(wizard.outcome().is_none());
    }

    #[test]
    fn resume_lands_on_derived_step() {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let selection = Selection {
            service_id: Some("konstruksi".into()),
            sub_service_id: Some("renovasi-sebagian".into()),
            ..Selection::default()
        };
        let wizard = Wizard::resume(catalog, selection).unwrap();
        assert_eq!(wizard.step(), WizardStep::SubDetailSelect);
    }

    #[test]
    fn whatsapp_link_uses_footer_phone() {
        assert_eq!(
            wizard().whatsapp_link().as_deref(),
            Some("https://wa.me/6282246934495")
        );
    }
}
