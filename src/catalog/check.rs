use std::collections::HashSet;
use std::fmt;

use crate::catalog::model::{FieldKind, LeafPricing, Price, SubServiceShape};
use crate::catalog::Catalog;

/// A catalog entry that cannot drive the wizard as written.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogIssue {
    /// `service/sub-service[/sub-detail]`, or just the service id.
    pub location: String,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    DuplicateServiceId,
    DuplicateSubServiceId,
    DuplicateSubDetailId,
    EmptyBranch,
    MissingQuantityField,
    EmptySelectOptions { field_id: String },
    UnknownTier { tier: String },
    MissingTier { tier: String },
    InvalidPrice { value: f64 },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::DuplicateServiceId => write!(f, "duplicate service id"),
            IssueKind::DuplicateSubServiceId => write!(f, "duplicate sub-service id"),
            IssueKind::DuplicateSubDetailId => write!(f, "duplicate sub-detail id"),
            IssueKind::EmptyBranch => write!(f, "no sub-details and no price"),
            IssueKind::MissingQuantityField => write!(f, "no numeric quantity field"),
            IssueKind::EmptySelectOptions { field_id } => {
                write!(f, "select field `{field_id}` has no options")
            }
            IssueKind::UnknownTier { tier } => {
                write!(f, "price tier `{tier}` matches no quality option")
            }
            IssueKind::MissingTier { tier } => write!(f, "no price for quality `{tier}`"),
            IssueKind::InvalidPrice { value } => write!(f, "price {value} is not positive"),
        }
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

pub(crate) fn run(catalog: &Catalog) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    let tiers: Vec<&str> = catalog
        .quality_options()
        .iter()
        .map(|option| option.title.as_str())
        .collect();

    let mut service_ids = HashSet::new();
    for service in catalog.services() {
        if !service_ids.insert(service.id.as_str()) {
            push(&mut issues, &service.id, IssueKind::DuplicateServiceId);
        }
        let mut sub_ids = HashSet::new();
        for sub in &service.sub_services {
            let location = format!("{}/{}", service.id, sub.id);
            if !sub_ids.insert(sub.id.as_str()) {
                push(&mut issues, &location, IssueKind::DuplicateSubServiceId);
            }
            match &sub.shape {
                SubServiceShape::Branch(details) if details.is_empty() => {
                    push(&mut issues, &location, IssueKind::EmptyBranch);
                }
                SubServiceShape::Branch(details) => {
                    let mut detail_ids = HashSet::new();
                    for detail in details {
                        let detail_location = format!("{}/{}", location, detail.id);
                        if !detail_ids.insert(detail.id.as_str()) {
                            push(&mut issues, &detail_location, IssueKind::DuplicateSubDetailId);
                        }
                        check_leaf(&mut issues, &detail_location, &detail.pricing, &tiers);
                    }
                }
                SubServiceShape::Leaf(pricing) => {
                    check_leaf(&mut issues, &location, pricing, &tiers);
                }
            }
        }
    }
    issues
}

fn check_leaf(issues: &mut Vec<CatalogIssue>, location: &str, leaf: &LeafPricing, tiers: &[&str]) {
    if leaf.primary_field().is_none() {
        push(issues, location, IssueKind::MissingQuantityField);
    }
    for field in &leaf.fields {
        if let FieldKind::Select { options } = &field.kind {
            if options.is_empty() {
                push(
                    issues,
                    location,
                    IssueKind::EmptySelectOptions {
                        field_id: field.id.clone(),
                    },
                );
            }
        }
    }
    match &leaf.price {
        Price::Flat(value) => check_price(issues, location, *value),
        Price::Tiered(prices) => {
            for (tier, value) in prices {
                if !tiers.contains(&tier.as_str()) {
                    push(issues, location, IssueKind::UnknownTier { tier: tier.clone() });
                }
                check_price(issues, location, *value);
            }
            for tier in tiers {
                if !prices.contains_key(*tier) {
                    push(
                        issues,
                        location,
                        IssueKind::MissingTier {
                            tier: (*tier).to_string(),
                        },
                    );
                }
            }
        }
    }
}

fn check_price(issues: &mut Vec<CatalogIssue>, location: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        push(issues, location, IssueKind::InvalidPrice { value });
    }
}

fn push(issues: &mut Vec<CatalogIssue>, location: &str, kind: IssueKind) {
    issues.push(CatalogIssue {
        location: location.to_string(),
        kind,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::{Field, QualityOption, Service, ServiceIcon, SubDetail, SubService};

    fn tiers() -> Vec<QualityOption> {
        ["Standar", "Premium"]
            .into_iter()
            .map(|title| QualityOption {
                title: title.into(),
                description: String::new(),
            })
            .collect()
    }

    #[test]
    fn duplicate_details_and_missing_tiers_are_located() {
        let partial = LeafPricing::tiered("m²", [("Standar", 10.0)], vec![Field::numeric("luas", "Luas")]);
        let detail = SubDetail {
            id: "d".into(),
            label: "D".into(),
            pricing: partial,
        };
        let service = Service {
            id: "svc".into(),
            label: "Service".into(),
            icon: ServiceIcon::Road,
            description: String::new(),
            sub_services: vec![SubService {
                id: "sub".into(),
                label: "Sub".into(),
                shape: SubServiceShape::Branch(vec![detail.clone(), detail]),
            }],
        };
        let issues = Catalog::from_parts(vec![service], tiers()).check();
        assert!(issues.contains(&CatalogIssue {
            location: "svc/sub/d".into(),
            kind: IssueKind::DuplicateSubDetailId,
        }));
        assert!(issues.contains(&CatalogIssue {
            location: "svc/sub/d".into(),
            kind: IssueKind::MissingTier {
                tier: "Premium".into()
            },
        }));
    }

    #[test]
    fn issues_render_location_first() {
        let issue = CatalogIssue {
            location: "konsultasi/perizinan".into(),
            kind: IssueKind::MissingQuantityField,
        };
        assert_eq!(
            issue.to_string(),
            "konsultasi/perizinan: no numeric quantity field"
        );
        let price = IssueKind::InvalidPrice { value: -5.0 };
        assert_eq!(price.to_string(), "price -5 is not positive");
    }
}
