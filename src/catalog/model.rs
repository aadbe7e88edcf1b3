//! Pricing catalog types: services, sub-services, sub-details and their pricing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies catalog entries by their stable string id.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Provides access to the human-facing label of a catalog entry.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for menus or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Top level of the catalog (a "calculator step" in the content document).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: ServiceIcon,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sub_services: Vec<SubService>,
}

impl Service {
    pub fn sub_service(&self, id: &str) -> Option<&SubService> {
        self.sub_services.iter().find(|sub| sub.id == id)
    }
}

impl Identifiable for Service {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Service {
    fn name(&self) -> &str {
        &self.label
    }
}

impl Displayable for Service {
    fn display_label(&self) -> String {
        if self.description.is_empty() {
            self.label.clone()
        } else {
            format!("{} - {}", self.label, self.description)
        }
    }
}

/// Icon names known to the site. Unknown names survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceIcon {
    PencilSquare,
    BuildingOffice,
    PaintBrush,
    #[default]
    WrenchScrewdriver,
    Mep,
    Road,
    CpuChip,
    Other(String),
}

impl From<String> for ServiceIcon {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PencilSquare" => ServiceIcon::PencilSquare,
            "BuildingOffice" => ServiceIcon::BuildingOffice,
            "PaintBrush" => ServiceIcon::PaintBrush,
            "WrenchScrewdriver" => ServiceIcon::WrenchScrewdriver,
            "MEP" => ServiceIcon::Mep,
            "Road" => ServiceIcon::Road,
            "CpuChip" => ServiceIcon::CpuChip,
            _ => ServiceIcon::Other(value),
        }
    }
}

impl From<ServiceIcon> for String {
    fn from(value: ServiceIcon) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ServiceIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceIcon::PencilSquare => "PencilSquare",
            ServiceIcon::BuildingOffice => "BuildingOffice",
            ServiceIcon::PaintBrush => "PaintBrush",
            ServiceIcon::WrenchScrewdriver => "WrenchScrewdriver",
            ServiceIcon::Mep => "MEP",
            ServiceIcon::Road => "Road",
            ServiceIcon::CpuChip => "CpuChip",
            ServiceIcon::Other(name) => name.as_str(),
        };
        f.write_str(label)
    }
}

/// Second level of the catalog. Either a branch to sub-details or a priced leaf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawSubService", into = "RawSubService")]
pub struct SubService {
    pub id: String,
    pub label: String,
    pub shape: SubServiceShape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubServiceShape {
    Branch(Vec<SubDetail>),
    Leaf(LeafPricing),
}

impl SubService {
    pub fn leaf(&self) -> Option<&LeafPricing> {
        match &self.shape {
            SubServiceShape::Leaf(pricing) => Some(pricing),
            SubServiceShape::Branch(_) => None,
        }
    }

    pub fn sub_details(&self) -> Option<&[SubDetail]> {
        match &self.shape {
            SubServiceShape::Branch(details) => Some(details),
            SubServiceShape::Leaf(_) => None,
        }
    }

    pub fn sub_detail(&self, id: &str) -> Option<&SubDetail> {
        self.sub_details()?.iter().find(|detail| detail.id == id)
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.shape, SubServiceShape::Branch(_))
    }
}

impl Identifiable for SubService {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for SubService {
    fn name(&self) -> &str {
        &self.label
    }
}

impl Displayable for SubService {
    fn display_label(&self) -> String {
        match &self.shape {
            SubServiceShape::Branch(_) => format!("{} ...", self.label),
            SubServiceShape::Leaf(pricing) if !pricing.unit.is_empty() => {
                format!("{} (per {})", self.label, pricing.unit)
            }
            SubServiceShape::Leaf(_) => self.label.clone(),
        }
    }
}

/// Loose JSON layout of a sub-service as stored in the content document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubService {
    id: String,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_details: Option<Vec<SubDetail>>,
}

impl TryFrom<RawSubService> for SubService {
    type Error = String;

    fn try_from(raw: RawSubService) -> Result<Self, Self::Error> {
        let details = raw.sub_details.unwrap_or_default();
        let shape = match (details.is_empty(), raw.price) {
            (false, Some(_)) => {
                return Err(format!(
                    "sub-service `{}` declares both subDetails and a price",
                    raw.id
                ))
            }
            (false, None) => SubServiceShape::Branch(details),
            (true, Some(price)) => SubServiceShape::Leaf(LeafPricing {
                unit: raw.unit.unwrap_or_default(),
                price,
                fields: raw.fields.unwrap_or_default(),
            }),
            (true, None) => SubServiceShape::Branch(Vec::new()),
        };
        Ok(SubService {
            id: raw.id,
            label: raw.label,
            shape,
        })
    }
}

impl From<SubService> for RawSubService {
    fn from(sub: SubService) -> Self {
        let mut raw = RawSubService {
            id: sub.id,
            label: sub.label,
            unit: None,
            price: None,
            fields: None,
            sub_details: None,
        };
        match sub.shape {
            SubServiceShape::Branch(details) => raw.sub_details = Some(details),
            SubServiceShape::Leaf(pricing) => {
                raw.unit = Some(pricing.unit);
                raw.price = Some(pricing.price);
                raw.fields = Some(pricing.fields);
            }
        }
        raw
    }
}

/// Third level of the catalog; always priced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubDetail {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub pricing: LeafPricing,
}

impl Identifiable for SubDetail {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for SubDetail {
    fn name(&self) -> &str {
        &self.label
    }
}

impl Displayable for SubDetail {
    fn display_label(&self) -> String {
        if self.pricing.unit.is_empty() {
            self.label.clone()
        } else {
            format!("{} (per {})", self.label, self.pricing.unit)
        }
    }
}

/// Unit, price and input fields of anything the resolver can price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeafPricing {
    #[serde(default)]
    pub unit: String,
    pub price: Price,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl LeafPricing {
    pub fn flat(unit: impl Into<String>, price: f64, fields: Vec<Field>) -> Self {
        Self {
            unit: unit.into(),
            price: Price::Flat(price),
            fields,
        }
    }

    pub fn tiered<I, S>(unit: impl Into<String>, tiers: I, fields: Vec<Field>) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            unit: unit.into(),
            price: Price::Tiered(tiers.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            fields,
        }
    }

    pub fn is_tiered(&self) -> bool {
        matches!(self.price, Price::Tiered(_))
    }

    /// The first numeric field; its value is the quantity.
    pub fn primary_field(&self) -> Option<&Field> {
        self.fields.iter().find(|field| field.is_numeric())
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }
}

/// A flat unit price or a unit price per quality tier title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Price {
    Flat(f64),
    Tiered(BTreeMap<String, f64>),
}

/// Input field shown on the quantity form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Numeric {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Select {
        #[serde(default)]
        options: Vec<String>,
    },
}

impl Field {
    pub fn numeric(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: FieldKind::Numeric { placeholder: None },
        }
    }

    pub fn select<I, S>(id: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            label: label.into(),
            kind: FieldKind::Select {
                options: options.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, FieldKind::Numeric { .. })
    }

    pub fn options(&self) -> &[String] {
        match &self.kind {
            FieldKind::Select { options } => options,
            FieldKind::Numeric { .. } => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Numeric { placeholder } => placeholder.as_deref(),
            FieldKind::Select { .. } => None,
        }
    }
}

/// A material quality tier shared by every tiered price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityOption {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Identifiable for QualityOption {
    fn id(&self) -> &str {
        &self.title
    }
}

impl NamedEntity for QualityOption {
    fn name(&self) -> &str {
        &self.title
    }
}

impl Displayable for QualityOption {
    fn display_label(&self) -> String {
        format!("{} - {}", self.title, self.description)
    }
}
