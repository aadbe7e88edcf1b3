mod common;

use cost_simulator::init;
use cost_simulator::wizard::{StepView, WizardStep};

#[test]
fn wizard_smoke() {
    init();

    let mut wizard = common::wizard();
    let StepView::Choice(first) = wizard.view().unwrap() else {
        panic!("first step should offer choices");
    };
    assert_eq!(first.options.len(), common::CATALOG.services().len());

    wizard.select_service("interior").unwrap();
    wizard.select_sub_service("kitchen-set").unwrap();
    wizard.select_quality("Standar").unwrap();
    wizard.set_field_value("panjang", "3").unwrap();
    assert_eq!(wizard.submit().unwrap(), WizardStep::Result);
    assert_eq!(
        wizard.result(),
        Some("Rp\u{a0}6.000.000 - Rp\u{a0}7.500.000")
    );
    assert!(common::CATALOG.check().len() <= 1);
}
