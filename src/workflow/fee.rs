use crate::config::WorkflowConfig;
use crate::models::{InspectionFeeQuote, PropertySelection};

/// Inspection fee for the current selection.
///
/// Only the first two properties are looked at: a second property in a
/// different local government area raises the fee, anything after that is
/// free. `None` means there is nothing to inspect.
pub fn fee_of(selection: &[PropertySelection], config: &WorkflowConfig) -> Option<InspectionFeeQuote> {
    let amount = match selection {
        [] => return None,
        [_] => config.base_fee,
        [first, second, ..] => {
            if first.location.local_government_area == second.location.local_government_area {
                config.base_fee
            } else {
                config.elevated_fee
            }
        }
    };
    Some(InspectionFeeQuote { amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    fn in_lga(id: &str, lga: &str) -> PropertySelection {
        PropertySelection {
            id: id.to_string(),
            price: 5_000_000,
            property_type: "Bungalow".to_string(),
            location: Location {
                state: "Lagos".to_string(),
                local_government_area: lga.to_string(),
                area: String::new(),
            },
            documents: vec![],
        }
    }

    #[test]
    fn test_fee_by_selection_shape() {
        let config = WorkflowConfig::default();
        let amount = |s: &[PropertySelection]| fee_of(s, &config).map(|q| q.amount);

        assert_eq!(amount(&[]), None);
        assert_eq!(amount(&[in_lga("a", "Ikeja")]), Some(10_000));
        assert_eq!(amount(&[in_lga("a", "Ikeja"), in_lga("b", "Ikeja")]), Some(10_000));
        assert_eq!(amount(&[in_lga("a", "Ikeja"), in_lga("b", "Eti-Osa")]), Some(15_000));
    }

    #[test]
    fn test_third_property_does_not_change_fee() {
        let config = WorkflowConfig::default();
        let selection = [in_lga("a", "Ikeja"), in_lga("b", "Ikeja"), in_lga("c", "Epe")];
        assert_eq!(fee_of(&selection, &config).unwrap().amount, 10_000);
    }

    #[test]
    fn test_fee_uses_configured_amounts() {
        let config = WorkflowConfig {
            base_fee: 7_500,
            elevated_fee: 12_500,
            ..WorkflowConfig::default()
        };
        let selection = [in_lga("a", "Ikeja"), in_lga("b", "Surulere")];
        assert_eq!(fee_of(&selection, &config).unwrap().amount, 12_500);
    }
}
