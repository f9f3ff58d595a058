use crate::equipment::{CatalogError, DynamicPricing, Equipment, EquipmentCategory};

fn unit(
    id: &str,
    name: &str,
    category: EquipmentCategory,
    per_day: f64,
    per_week: Option<f64>,
    per_month: Option<f64>,
    dynamic: Option<(f64, f64, f64)>,
) -> Equipment {
    Equipment {
        id: id.to_string(),
        name: name.to_string(),
        category,
        price_per_day: per_day,
        price_per_week: per_week,
        price_per_month: per_month,
        dynamic_pricing: dynamic.map(|(peak, off_peak, weekend)| DynamicPricing { peak, off_peak, weekend }),
    }
}

/// Fixed demo fleet, one unit per rate profile
pub fn demo_fleet() -> Vec<Equipment> {
    vec![
        unit("tractor-jd-6120m", "Tracteur John Deere 6120M", EquipmentCategory::Tracteur, 450.0, None, None, Some((562.5, 450.0, 500.0))),
        unit("harvester-nh-cr880", "Moissonneuse-batteuse New Holland CR8.80", EquipmentCategory::Moissonneuse, 850.0, Some(5000.0), None, Some((1062.5, 850.0, 900.0))),
        unit("spreader-kuhn-axis", "Épandeur Kuhn Axis 40.2", EquipmentCategory::Remorque, 180.0, Some(1000.0), Some(3600.0), None),
        unit("sprayer-amazone-ux", "Pulvérisateur Amazone UX 5201", EquipmentCategory::Pulverisateur, 280.0, None, Some(5500.0), Some((350.0, 280.0, 300.0))),
        unit("seeder-lemken-solitair", "Semoir Lemken Solitair 9", EquipmentCategory::Semoir, 320.0, None, None, None),
        unit("tool-stihl-ms500i", "Tronçonneuse Stihl MS 500i", EquipmentCategory::Outil, 150.0, Some(750.0), None, None),
    ]
}

pub fn find_equipment<'a>(fleet: &'a [Equipment], id: &str) -> Result<&'a Equipment, CatalogError> {
    fleet
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))
}
