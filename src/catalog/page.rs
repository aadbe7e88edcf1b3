//! The site content document and the parts of it the calculator reads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::model::{QualityOption, Service};
use crate::errors::{Result, SimulatorError};

const BUILTIN_CONTENT: &str = include_str!("../../data/site_content.json");

/// The whole site document. Sections the calculator does not model are kept
/// verbatim in `other_sections`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub footer: Footer,
    pub cost_simulator_page: CostSimulatorPage,
    #[serde(flatten)]
    pub other_sections: Map<String, Value>,
}

impl SiteContent {
    /// Default document shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CONTENT)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| SimulatorError::ContentError(format!("invalid content document: {err}")))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CostSimulatorPage {
    #[serde(default)]
    pub hero: Hero,
    #[serde(default)]
    pub intro: Intro,
    #[serde(default)]
    pub form: FormCopy,
    #[serde(default)]
    pub results: ResultsCopy,
    #[serde(default)]
    pub calculator_steps: Vec<Service>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Intro {
    pub title: String,
    pub paragraph: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FormCopy {
    pub title: String,
    pub quality_label: String,
    pub quality_options: Vec<QualityOption>,
    pub button_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultsCopy {
    pub title: String,
    pub disclaimer: String,
    pub cta_button_text: String,
}
