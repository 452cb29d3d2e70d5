use serde::{Deserialize, Serialize};

use crate::composition::LabelNutrients;
use crate::meals::repo::ResolvedFood;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbohydrates_g: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VitaminTotals {
    pub calcium_mg: f64,
    pub iron_mg: f64,
    pub potassium_mg: f64,
}

/// Macro and micronutrient totals for one confirmed food list. Derived, not
/// an entity of its own; recomputing from the same inputs gives the same
/// summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub macros: MacroTotals,
    pub vitamins: VitaminTotals,
}

/// A confirmed food joined with its per-unit label nutrients, as returned
/// to the caller of the nutrition endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FoodDetail {
    #[serde(flatten)]
    pub food: ResolvedFood,
    #[serde(rename = "labelNutrients")]
    pub label_nutrients: LabelNutrients,
}

/// Scale each food's label nutrients by its stated quantity and sum.
/// The stated unit is not reconciled against the label's reference unit;
/// scaling is a flat multiply.
pub fn summarize(details: &[FoodDetail]) -> NutritionSummary {
    let mut summary = NutritionSummary::default();
    for detail in details {
        let q = detail.food.quantity;
        let n = &detail.label_nutrients;
        summary.macros.calories += n.calories * q;
        summary.macros.protein_g += n.protein * q;
        summary.macros.fat_g += n.fat * q;
        summary.macros.carbohydrates_g += n.carbohydrates * q;
        summary.vitamins.calcium_mg += n.calcium * q;
        summary.vitamins.iron_mg += n.iron * q;
        summary.vitamins.potassium_mg += n.potassium * q;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(quantity: f64, nutrients: LabelNutrients) -> FoodDetail {
        FoodDetail {
            food: ResolvedFood {
                food: "test food".into(),
                fdc_id: 1,
                quantity,
                unit: None,
            },
            label_nutrients: nutrients,
        }
    }

    #[test]
    fn scales_by_quantity_and_sums_across_foods() {
        let details = vec![
            detail(
                2.0,
                LabelNutrients {
                    calories: 100.0,
                    fat: 1.0,
                    carbohydrates: 20.0,
                    protein: 3.0,
                    calcium: 30.0,
                    iron: 0.5,
                    potassium: 200.0,
                },
            ),
            detail(
                1.0,
                LabelNutrients {
                    calories: 50.0,
                    fat: 2.0,
                    carbohydrates: 5.0,
                    protein: 4.0,
                    calcium: 10.0,
                    iron: 1.0,
                    potassium: 100.0,
                },
            ),
        ];

        let summary = summarize(&details);
        assert_eq!(summary.macros.calories, 250.0);
        assert_eq!(summary.macros.fat_g, 4.0);
        assert_eq!(summary.macros.carbohydrates_g, 45.0);
        assert_eq!(summary.macros.protein_g, 10.0);
        assert_eq!(summary.vitamins.calcium_mg, 70.0);
        assert_eq!(summary.vitamins.iron_mg, 2.0);
        assert_eq!(summary.vitamins.potassium_mg, 500.0);
    }

    #[test]
    fn empty_input_gives_a_zero_summary() {
        assert_eq!(summarize(&[]), NutritionSummary::default());
    }

    #[test]
    fn summarizing_twice_is_byte_identical() {
        let details = vec![detail(
            3.0,
            LabelNutrients {
                calories: 111.0,
                fat: 0.3,
                carbohydrates: 28.0,
                protein: 1.3,
                calcium: 6.0,
                iron: 0.3,
                potassium: 422.0,
            },
        )];

        let a = serde_json::to_vec(&summarize(&details)).unwrap();
        let b = serde_json::to_vec(&summarize(&details)).unwrap();
        assert_eq!(a, b);
    }
}
