//! Pure step-skip rules: which step follows or precedes a selection.

use thiserror::Error;

use crate::catalog::{Catalog, FieldKind, LeafPricing, SubService, SubServiceShape};
use crate::wizard::state::{Selection, WizardStep};

/// Step reached after choosing a sub-service or a sub-detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    SubDetailSelect,
    QualitySelect,
    QuantityForm,
}

impl From<NextStep> for WizardStep {
    fn from(next: NextStep) -> Self {
        match next {
            NextStep::SubDetailSelect => WizardStep::SubDetailSelect,
            NextStep::QualitySelect => WizardStep::QualitySelect,
            NextStep::QuantityForm => WizardStep::QuantityForm,
        }
    }
}

/// Catalog data that cannot drive a wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationGap {
    #[error("`{sub_service_id}` has neither sub-details nor a price")]
    EmptyBranch { sub_service_id: String },
    #[error("`{leaf_id}` has no numeric quantity field")]
    MissingQuantityField { leaf_id: String },
    #[error("select field `{field_id}` of `{leaf_id}` has no options")]
    EmptySelectOptions { leaf_id: String, field_id: String },
    #[error("selection refers to `{id}`, which is not in the catalog")]
    DanglingSelection { id: String },
}

pub fn route_after_sub_service(sub: &SubService) -> Result<NextStep, ConfigurationGap> {
    match &sub.shape {
        SubServiceShape::Branch(details) if details.is_empty() => {
            Err(ConfigurationGap::EmptyBranch {
                sub_service_id: sub.id.clone(),
            })
        }
        SubServiceShape::Branch(_) => Ok(NextStep::SubDetailSelect),
        SubServiceShape::Leaf(leaf) => route_after_leaf(&sub.id, leaf),
    }
}

/// Tiered leaves go through the quality step; others straight to the form.
pub fn route_after_leaf(leaf_id: &str, leaf: &LeafPricing) -> Result<NextStep, ConfigurationGap> {
    if leaf.primary_field().is_none() {
        return Err(ConfigurationGap::MissingQuantityField {
            leaf_id: leaf_id.to_string(),
        });
    }
    if let Some(field) = leaf
        .fields
        .iter()
        .find(|field| matches!(&field.kind, FieldKind::Select { options } if options.is_empty()))
    {
        return Err(ConfigurationGap::EmptySelectOptions {
            leaf_id: leaf_id.to_string(),
            field_id: field.id.clone(),
        });
    }
    if leaf.is_tiered() {
        Ok(NextStep::QualitySelect)
    } else {
        Ok(NextStep::QuantityForm)
    }
}

fn dangling(id: &str) -> ConfigurationGap {
    ConfigurationGap::DanglingSelection { id: id.to_string() }
}

/// Derives the step a selection belongs on without replaying the clicks.
pub fn next_step_after(
    catalog: &Catalog,
    selection: &Selection,
) -> Result<WizardStep, ConfigurationGap> {
    let Some(service_id) = selection.service_id.as_deref() else {
        return Ok(WizardStep::CategorySelect);
    };
    let service = catalog.service(service_id).ok_or_else(|| dangling(service_id))?;
    let Some(sub_id) = selection.sub_service_id.as_deref() else {
        return Ok(WizardStep::ServiceSelect);
    };
    let sub = service.sub_service(sub_id).ok_or_else(|| dangling(sub_id))?;

    let (leaf_id, leaf) = match route_after_sub_service(sub)? {
        NextStep::SubDetailSelect => {
            let Some(detail_id) = selection.sub_detail_id.as_deref() else {
                return Ok(WizardStep::SubDetailSelect);
            };
            let detail = sub.sub_detail(detail_id).ok_or_else(|| dangling(detail_id))?;
            (detail.id.as_str(), &detail.pricing)
        }
        _ => match sub.leaf() {
            Some(leaf) => (sub.id.as_str(), leaf),
            None => return Err(dangling(sub_id)),
        },
    };

    if route_after_leaf(leaf_id, leaf)? == NextStep::QualitySelect {
        match selection.quality_tier.as_deref() {
            None => return Ok(WizardStep::QualitySelect),
            Some(tier) if !catalog.is_known_tier(tier) => return Err(dangling(tier)),
            Some(_) => {}
        }
    }

    if selection.result.is_some() {
        Ok(WizardStep::Result)
    } else {
        Ok(WizardStep::QuantityForm)
    }
}

/// The step `back` returns to, following the chain the selection actually took.
pub fn previous_step(
    catalog: &Catalog,
    selection: &Selection,
    current: WizardStep,
) -> Option<WizardStep> {
    match current {
        WizardStep::CategorySelect => None,
        WizardStep::ServiceSelect => Some(WizardStep::CategorySelect),
        WizardStep::SubDetailSelect => Some(WizardStep::ServiceSelect),
        WizardStep::QualitySelect => Some(before_quality(selection)),
        WizardStep::QuantityForm => {
            if selected_leaf_is_tiered(catalog, selection) {
                Some(WizardStep::QualitySelect)
            } else {
                Some(before_quality(selection))
            }
        }
        WizardStep::Result => Some(WizardStep::QuantityForm),
    }
}

fn before_quality(selection: &Selection) -> WizardStep {
    if selection.sub_detail_id.is_some() {
        WizardStep::SubDetailSelect
    } else {
        WizardStep::ServiceSelect
    }
}

fn selected_leaf_is_tiered(catalog: &Catalog, selection: &Selection) -> bool {
    match (
        selection.service_id.as_deref(),
        selection.sub_service_id.as_deref(),
    ) {
        (Some(service_id), Some(sub_id)) => catalog
            .leaf(service_id, sub_id, selection.sub_detail_id.as_deref())
            .is_some_and(LeafPricing::is_tiered),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Field, QualityOption, Service, ServiceIcon, SubDetail};

    fn sub(id: &str, shape: SubServiceShape) -> SubService {
        SubService {
            id: id.into(),
            label: id.into(),
            shape,
        }
    }

    fn catalog() -> Catalog {
        let tiered = LeafPricing::tiered(
            "m²",
            [("Standar", 10.0), ("Premium", 20.0)],
            vec![Field::numeric("luas", "Luas")],
        );
        let flat = LeafPricing::flat("titik", 5.0, vec![Field::numeric("jumlah", "Jumlah")]);
        let services = vec![Service {
            id: "svc".into(),
            label: "Service".into(),
            icon: ServiceIcon::Road,
            description: String::new(),
            sub_services: vec![
                sub("tiered", SubServiceShape::Leaf(tiered.clone())),
                sub("flat", SubServiceShape::Leaf(flat.clone())),
                sub(
                    "branch",
                    SubServiceShape::Branch(vec![
                        SubDetail {
                            id: "d-tiered".into(),
                            label: "D tiered".into(),
                            pricing: tiered,
                        },
                        SubDetail {
                            id: "d-flat".into(),
                            label: "D flat".into(),
                            pricing: flat,
                        },
                    ]),
                ),
                sub("empty", SubServiceShape::Branch(Vec::new())),
                sub(
                    "no-qty",
                    SubServiceShape::Leaf(LeafPricing::flat(
                        "paket",
                        1.0,
                        vec![Field::select("jenis", "Jenis", ["A", "B"])],
                    )),
                ),
            ],
        }];
        let tiers = ["Standar", "Premium"]
            .into_iter()
            .map(|title| QualityOption {
                title: title.into(),
                description: String::new(),
            })
            .collect();
        Catalog::from_parts(services, tiers)
    }

    fn selection(sub: &str, detail: Option<&str>) -> Selection {
        Selection {
            service_id: Some("svc".into()),
            sub_service_id: Some(sub.into()),
            sub_detail_id: detail.map(Into::into),
            ..Selection::default()
        }
    }

    #[test]
    fn step_skip_table() {
        let catalog = catalog();
        let service = catalog.service("svc").unwrap();
        let route = |id: &str| route_after_sub_service(service.sub_service(id).unwrap());
        assert_eq!(route("branch"), Ok(NextStep::SubDetailSelect));
        assert_eq!(route("tiered"), Ok(NextStep::QualitySelect));
        assert_eq!(route("flat"), Ok(NextStep::QuantityForm));
    }

    #[test]
    fn gaps_are_reported_not_routed() {
        let catalog = catalog();
        let service = catalog.service("svc").unwrap();
        assert!(matches!(
            route_after_sub_service(service.sub_service("empty").unwrap()),
            Err(ConfigurationGap::EmptyBranch { .. })
        ));
        assert!(matches!(
            route_after_sub_service(service.sub_service("no-qty").unwrap()),
            Err(ConfigurationGap::MissingQuantityField { .. })
        ));
        let broken = LeafPricing::flat(
            "x",
            1.0,
            vec![
                Field::numeric("q", "Q"),
                Field::select("s", "S", Vec::<String>::new()),
            ],
        );
        assert_eq!(
            route_after_leaf("broken", &broken),
            Err(ConfigurationGap::EmptySelectOptions {
                leaf_id: "broken".into(),
                field_id: "s".into()
            })
        );
    }

    #[test]
    fn step_is_derived_from_selection() {
        let catalog = catalog();
        assert_eq!(
            next_step_after(&catalog, &Selection::default()),
            Ok(WizardStep::CategorySelect)
        );
        let mut only_service = Selection::default();
        only_service.service_id = Some("svc".into());
        assert_eq!(
            next_step_after(&catalog, &only_service),
            Ok(WizardStep::ServiceSelect)
        );
        assert_eq!(
            next_step_after(&catalog, &selection("branch", None)),
            Ok(WizardStep::SubDetailSelect)
        );
        assert_eq!(
            next_step_after(&catalog, &selection("branch", Some("d-tiered"))),
            Ok(WizardStep::QualitySelect)
        );
        assert_eq!(
            next_step_after(&catalog, &selection("flat", None)),
            Ok(WizardStep::QuantityForm)
        );

        let mut done = selection("tiered", None);
        done.quality_tier = Some("Premium".into());
        assert_eq!(next_step_after(&catalog, &done), Ok(WizardStep::QuantityForm));
        done.result = Some("Rp 1".into());
        assert_eq!(next_step_after(&catalog, &done), Ok(WizardStep::Result));
    }

    #[test]
    fn unknown_ids_are_dangling() {
        let catalog = catalog();
        assert_eq!(
            next_step_after(&catalog, &selection("missing", None)),
            Err(ConfigurationGap::DanglingSelection {
                id: "missing".into()
            })
        );
        let mut bad_tier = selection("tiered", None);
        bad_tier.quality_tier = Some("Gold".into());
        assert!(next_step_after(&catalog, &bad_tier).is_err());
    }

    #[test]
    fn back_follows_the_chain_taken() {
        let catalog = catalog();
        let flat = selection("flat", None);
        let tiered = selection("tiered", None);
        let detail_flat = selection("branch", Some("d-flat"));
        let detail_tiered = selection("branch", Some("d-tiered"));

        assert_eq!(previous_step(&catalog, &flat, WizardStep::CategorySelect), None);
        assert_eq!(
            previous_step(&catalog, &flat, WizardStep::QuantityForm),
            Some(WizardStep::ServiceSelect)
        );
        assert_eq!(
            previous_step(&catalog, &tiered, WizardStep::QuantityForm),
            Some(WizardStep::QualitySelect)
        );
        assert_eq!(
            previous_step(&catalog, &detail_flat, WizardStep::QuantityForm),
            Some(WizardStep::SubDetailSelect)
        );
        assert_eq!(
            previous_step(&catalog, &detail_tiered, WizardStep::QualitySelect),
            Some(WizardStep::SubDetailSelect)
        );
        assert_eq!(
            previous_step(&catalog, &tiered, WizardStep::QualitySelect),
            Some(WizardStep::ServiceSelect)
        );
        assert_eq!(
            previous_step(&catalog, &tiered, WizardStep::Result),
            Some(WizardStep::QuantityForm)
        );
    }
}
