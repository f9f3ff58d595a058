use serde::{Deserialize, Serialize};

use crate::equipment::CatalogError;

/// Add-on service kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExtraType {
    Insurance,
    Delivery,
    Operator,
    Installation,
    Maintenance,
    Training,
}

/// An optional add-on service, priced per rental day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationExtra {
    pub id: String,
    #[serde(rename = "type")]
    pub extra_type: ExtraType,
    pub name: String,
    pub price: f64,
    pub selected: bool,
}

impl ReservationExtra {
    fn offer(id: &str, extra_type: ExtraType, name: &str, price: f64) -> Self {
        Self {
            id: id.to_string(),
            extra_type,
            name: name.to_string(),
            price,
            selected: false,
        }
    }
}

/// Static list of extras offered with every rental
#[derive(Debug, Clone)]
pub struct ExtrasCatalog {
    extras: Vec<ReservationExtra>,
}

impl Default for ExtrasCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ExtrasCatalog {
    pub fn new(extras: Vec<ReservationExtra>) -> Self {
        Self { extras }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            ReservationExtra::offer("insurance_premium", ExtraType::Insurance, "Assurance Premium Tous Risques", 45.0),
            ReservationExtra::offer("insurance_basic", ExtraType::Insurance, "Assurance Basique", 25.0),
            ReservationExtra::offer("delivery_express", ExtraType::Delivery, "Livraison Express (< 24h)", 120.0),
            ReservationExtra::offer("delivery_standard", ExtraType::Delivery, "Livraison Standard", 60.0),
            ReservationExtra::offer("operator", ExtraType::Operator, "Chauffeur / Opérateur Professionnel", 200.0),
            ReservationExtra::offer("installation", ExtraType::Installation, "Installation et Formation sur Site", 80.0),
            ReservationExtra::offer("training", ExtraType::Training, "Formation à la Conduite", 80.0),
            ReservationExtra::offer("maintenance", ExtraType::Maintenance, "Maintenance Préventive Incluse", 35.0),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&ReservationExtra> {
        self.extras.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReservationExtra> {
        self.extras.iter()
    }

    /// Extras whose id is in `ids`, in catalog order, flagged as selected
    pub fn selected<S: AsRef<str>>(&self, ids: &[S]) -> Vec<ReservationExtra> {
        self.extras
            .iter()
            .filter(|e| ids.iter().any(|id| id.as_ref() == e.id))
            .map(|e| ReservationExtra { selected: true, ..e.clone() })
            .collect()
    }

    /// Like [`selected`](Self::selected), but fails on the first unknown id
    pub fn resolve<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<ReservationExtra>, CatalogError> {
        if let Some(unknown) = ids.iter().find(|id| !self.contains(id.as_ref())) {
            return Err(CatalogError::UnknownExtra(unknown.as_ref().to_string()));
        }
        Ok(self.selected(ids))
    }
}
