//! Read-only pricing catalog extracted from the site content document.

pub mod check;
pub mod model;
pub mod page;

pub use check::{CatalogIssue, IssueKind};
pub use model::{
    Displayable, Field, FieldKind, Identifiable, LeafPricing, NamedEntity, Price, QualityOption,
    Service, ServiceIcon, SubDetail, SubService, SubServiceShape,
};
pub use page::{CostSimulatorPage, FormCopy, Hero, ResultsCopy, SiteContent};

use crate::errors::Result;

/// Immutable snapshot of the calculator section of the content document.
///
/// Wizards share one catalog through an `Arc` and never write to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    page: CostSimulatorPage,
    contact_phone: String,
}

impl Catalog {
    pub fn from_content(content: &SiteContent) -> Self {
        Self {
            page: content.cost_simulator_page.clone(),
            contact_phone: content.footer.phone.clone(),
        }
    }

    /// Builds a catalog from bare services and quality options with empty copy.
    pub fn from_parts(services: Vec<Service>, quality_options: Vec<QualityOption>) -> Self {
        let page = CostSimulatorPage {
            calculator_steps: services,
            form: FormCopy {
                quality_options,
                ..FormCopy::default()
            },
            ..CostSimulatorPage::default()
        };
        Self {
            page,
            contact_phone: String::new(),
        }
    }

    pub fn builtin() -> Result<Self> {
        Ok(Self::from_content(&SiteContent::builtin()?))
    }

    /// Replaces the contact phone, e.g. with a user configuration override.
    pub fn with_contact_phone(mut self, phone: impl Into<String>) -> Self {
        self.contact_phone = phone.into();
        self
    }

    pub fn services(&self) -> &[Service] {
        &self.page.calculator_steps
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services().iter().find(|service| service.id == id)
    }

    pub fn sub_service(&self, service_id: &str, sub_service_id: &str) -> Option<&SubService> {
        self.service(service_id)?.sub_service(sub_service_id)
    }

    /// Resolves the priced leaf a selection path points at, if any.
    pub fn leaf(
        &self,
        service_id: &str,
        sub_service_id: &str,
        sub_detail_id: Option<&str>,
    ) -> Option<&LeafPricing> {
        let sub = self.sub_service(service_id, sub_service_id)?;
        match sub_detail_id {
            Some(detail_id) => Some(&sub.sub_detail(detail_id)?.pricing),
            None => sub.leaf(),
        }
    }

    pub fn quality_options(&self) -> &[QualityOption] {
        &self.page.form.quality_options
    }

    pub fn is_known_tier(&self, title: &str) -> bool {
        self.quality_options()
            .iter()
            .any(|option| option.title == title)
    }

    pub fn page(&self) -> &CostSimulatorPage {
        &self.page
    }

    pub fn contact_phone(&self) -> &str {
        &self.contact_phone
    }

    /// Lists entries that would stall or mislead the wizard.
    pub fn check(&self) -> Vec<CatalogIssue> {
        check::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_exposes_services_and_tiers() {
        let catalog = Catalog::builtin().unwrap();
        let ids: Vec<&str> = catalog.services().iter().map(|s| s.id()).collect();
        assert_eq!(
            ids,
            [
                "konsultasi",
                "konstruksi",
                "repair",
                "mep",
                "infrastruktur",
                "interior",
                "smart"
            ]
        );
        assert!(catalog.is_known_tier("Menengah"));
        assert!(!catalog.is_known_tier("menengah"));
        assert_eq!(catalog.contact_phone(), "+62 822-4693-4495");
    }

    #[test]
    fn leaf_lookup_follows_the_shape() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.leaf("konstruksi", "bangun-rumah", None).is_some());
        assert!(catalog.leaf("konstruksi", "renovasi-sebagian", None).is_none());
        let detail = catalog
            .leaf("konstruksi", "renovasi-sebagian", Some("ganti-keramik"))
            .unwrap();
        assert!(detail.is_tiered());
        assert!(catalog.leaf("konstruksi", "bangun-rumah", Some("x")).is_none());
    }

    #[test]
    fn builtin_check_reports_only_the_permit_package() {
        let catalog = Catalog::builtin().unwrap();
        let issues = catalog.check();
        assert_eq!(issues.len(), 1, "{issues:?}");
        assert_eq!(issues[0].location, "konsultasi/perizinan");
        assert_eq!(issues[0].kind, IssueKind::MissingQuantityField);
    }

    #[test]
    fn check_flags_broken_entries() {
        let json = r#"[
            {"id":"a","label":"A","subServices":[
                {"id":"empty","label":"Empty"},
                {"id":"tiers","label":"Tiers","price":{"Gold":1,"Standar":0},
                 "fields":[{"id":"q","label":"Q","type":"numeric"},
                           {"id":"s","label":"S","type":"select","options":[]}]}
            ]},
            {"id":"a","label":"Again","subServices":[]}
        ]"#;
        let services: Vec<Service> = serde_json::from_str(json).unwrap();
        let catalog = Catalog::from_parts(
            services,
            vec![QualityOption {
                title: "Standar".into(),
                description: String::new(),
            }],
        );
        let kinds: Vec<IssueKind> = catalog.check().into_iter().map(|i| i.kind).collect();
        assert!(kinds.contains(&IssueKind::EmptyBranch));
        assert!(kinds.contains(&IssueKind::DuplicateServiceId));
        assert!(kinds.contains(&IssueKind::UnknownTier {
            tier: "Gold".into()
        }));
        assert!(kinds.contains(&IssueKind::InvalidPrice { value: 0.0 }));
        assert!(kinds.contains(&IssueKind::EmptySelectOptions {
            field_id: "s".into()
        }));
    }
}
