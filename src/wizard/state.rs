//! Steps of the estimation wizard and the selection it accumulates.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    CategorySelect,
    ServiceSelect,
    SubDetailSelect,
    QualitySelect,
    QuantityForm,
    Result,
}

impl WizardStep {
    /// 1-based position in the full chain.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::CategorySelect => 1,
            WizardStep::ServiceSelect => 2,
            WizardStep::SubDetailSelect => 3,
            WizardStep::QualitySelect => 4,
            WizardStep::QuantityForm => 5,
            WizardStep::Result => 6,
        }
    }

    /// Heading shown for the step when the content document has no copy for it.
    pub fn title(self) -> &'static str {
        match self {
            WizardStep::CategorySelect => "Pilih Kategori Layanan",
            WizardStep::ServiceSelect => "Pilih Detail Layanan",
            WizardStep::SubDetailSelect => "Pilih Sub-Detail Layanan",
            WizardStep::QualitySelect => "Pilih Kualitas Material",
            WizardStep::QuantityForm => "Detail Proyek Anda",
            WizardStep::Result => "Estimasi Biaya Proyek Anda",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// Everything the user has chosen or typed so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub service_id: Option<String>,
    pub sub_service_id: Option<String>,
    pub sub_detail_id: Option<String>,
    pub quality_tier: Option<String>,
    pub field_values: BTreeMap<String, String>,
    pub result: Option<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self == &Selection::default()
    }

    /// Clears everything chosen below the service.
    pub(crate) fn clear_below_service(&mut self) {
        self.sub_service_id = None;
        self.clear_below_sub_service();
    }

    pub(crate) fn clear_below_sub_service(&mut self) {
        self.sub_detail_id = None;
        self.clear_below_sub_detail();
    }

    pub(crate) fn clear_below_sub_detail(&mut self) {
        self.quality_tier = None;
        self.field_values.clear();
        self.result = None;
    }
}

/// Entry point hint, e.g. a link from a service page straight into the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreSeed {
    pub service_id: Option<String>,
}

impl PreSeed {
    pub fn service(id: impl Into<String>) -> Self {
        Self {
            service_id: Some(id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_display_number_and_title() {
        assert_eq!(WizardStep::CategorySelect.to_string(), "1. Pilih Kategori Layanan");
        assert_eq!(WizardStep::QualitySelect.to_string(), "4. Pilih Kualitas Material");
        assert!(WizardStep::SubDetailSelect < WizardStep::Result);
    }

    #[test]
    fn clearing_below_service_keeps_service() {
        let mut selection = Selection {
            service_id: Some("mep".into()),
            sub_service_id: Some("instalasi-listrik".into()),
            quality_tier: Some("Standar".into()),
            result: Some("x".into()),
            ..Selection::default()
        };
        selection.field_values.insert("jumlah".into(), "3".into());
        selection.clear_below_service();
        assert_eq!(selection.service_id.as_deref(), Some("mep"));
        assert!(selection.sub_service_id.is_none());
        assert!(selection.field_values.is_empty());
        assert!(selection.result.is_none());
    }
}
