//! Display catalog of fee models

use serde::Serialize;

use crate::types::FeeModel;

/// Display data for one fee model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeModelInfo {
    pub model: FeeModel,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

static CATALOG: [FeeModelInfo; 4] = [
    FeeModelInfo {
        model: FeeModel::VatOnTop,
        name: "VAT on Top",
        description: "1% service fee with VAT added on top",
        icon: "💶",
    },
    FeeModelInfo {
        model: FeeModel::HigherVatIncluded,
        name: "Higher VAT Included",
        description: "1.25% up to 25% VAT, 1.5% above",
        icon: "🧾",
    },
    FeeModelInfo {
        model: FeeModel::FlatMinimum,
        name: "Flat Minimum",
        description: "1% service fee with a 30,000 minimum",
        icon: "🛡️",
    },
    FeeModelInfo {
        model: FeeModel::Tiered,
        name: "Tiered",
        description: "1.5% / 1.25% / 1.0% by price bracket",
        icon: "📊",
    },
];

/// All fee models with their display data, in `FeeModel::ALL` order
pub fn fee_model_catalog() -> &'static [FeeModelInfo] {
    &CATALOG
}

impl FeeModel {
    pub fn info(&self) -> &'static FeeModelInfo {
        match self {
            FeeModel::VatOnTop => &CATALOG[0],
            FeeModel::HigherVatIncluded => &CATALOG[1],
            FeeModel::FlatMinimum => &CATALOG[2],
            FeeModel::Tiered => &CATALOG[3],
        }
    }

    /// Human-readable name (e.g., "Flat Minimum")
    pub fn display_name(&self) -> &'static str {
        self.info().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_keyed_by_model() {
        let catalog = fee_model_catalog();
        assert_eq!(catalog.len(), FeeModel::ALL.len());
        for (entry, model) in catalog.iter().zip(FeeModel::ALL) {
            assert_eq!(entry.model, model);
            assert_eq!(model.info(), entry);
            assert!(!entry.name.is_empty());
            assert!(!entry.icon.is_empty());
        }
    }
}
