// src/models/unit.rs

//! Inventory unit records as returned by the inventory API.
//!
//! Everything except `id` is optional. `None` always means "the API did not
//! say": prices render as "Call for Price", measurements as "N/A", and
//! images fall back to a placeholder (see [`crate::format`]).

use serde::{Deserialize, Serialize};

use super::de;

/// A reference to a named entity (make, model, trim, vehicle type).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Vehicle classification, e.g. "Travel Trailer" or "Fifth Wheel".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<NamedRef>,
    #[serde(default)]
    pub vehicle_category: Option<NamedRef>,
}

/// Unit condition. Older API versions send a bare string, newer ones an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Text(String),
    Named {
        #[serde(default)]
        name: Option<String>,
    },
}

impl Condition {
    pub fn name(&self) -> Option<&str> {
        match self {
            Condition::Text(s) => Some(s.as_str()),
            Condition::Named { name } => name.as_deref(),
        }
        .filter(|s| !s.trim().is_empty())
    }
}

/// One image or video attached to a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Display position; items without one sort last.
    #[serde(default)]
    pub order: Option<i64>,
}

/// Free-text description block. A missing heading means "untitled".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitDescription {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitAttribute {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitOption {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Dealership lot holding the unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyLocation {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebSettings {
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub featured: bool,
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub special: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tagline {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitUrls {
    #[serde(default)]
    pub detail: Option<String>,
}

/// A single vehicle listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryUnit {
    /// Stable key used by favorites, compare and detail lookups.
    pub id: u64,
    #[serde(default)]
    pub stock_number: Option<String>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub year: Option<u32>,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub lot_status: Option<String>,

    // Pricing: `None` means "Call for Price"
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub price_msrp: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub price_current: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub price_monthly: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub price_biweekly: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub price_lowest: Option<f64>,

    // Make / model
    #[serde(default)]
    pub unit_make: Option<NamedRef>,
    #[serde(default)]
    pub unit_model: Option<NamedRef>,
    #[serde(default)]
    pub unit_trim: Option<NamedRef>,
    #[serde(default)]
    pub unit_classification: Option<Classification>,

    // Dimensions and weights: `None` renders as "N/A"
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub vehicle_body_length: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub vehicle_body_height: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub vehicle_body_width: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub dry_weight: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub gvwr: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub hitch_weight: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub number_of_slideouts: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub max_sleeping_count: Option<u32>,

    // Capacities (gallons)
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub total_fresh_water_tank_capacity: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub total_gray_water_tank_capacity: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub total_black_water_tank_capacity: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub fuel_tank_capacity: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub water_heater_tank_capacity: Option<f64>,

    // Climate
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub air_conditioning_btu: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub heater_btu: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub awning_length: Option<f64>,

    // Drivetrain, only populated for motorized units
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub horsepower: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub torque: Option<f64>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub chassis_brand: Option<String>,
    #[serde(default)]
    pub driveline_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub towing_capacity: Option<f64>,

    // Media
    #[serde(default)]
    pub display_image: Option<String>,
    #[serde(default, deserialize_with = "de::vec_or_empty")]
    pub media: Vec<MediaItem>,

    // Descriptions
    #[serde(default, deserialize_with = "de::vec_or_empty")]
    pub inventory_unit_descriptions: Vec<UnitDescription>,
    #[serde(default, deserialize_with = "de::vec_or_empty")]
    pub inventory_unit_attributes: Vec<UnitAttribute>,
    #[serde(default, deserialize_with = "de::vec_or_empty")]
    pub inventory_unit_options: Vec<UnitOption>,

    #[serde(default)]
    pub company_location: Option<CompanyLocation>,

    #[serde(default)]
    pub web_settings: Option<WebSettings>,
    #[serde(default, deserialize_with = "de::vec_or_empty")]
    pub inventory_website_taglines: Vec<Tagline>,

    #[serde(default)]
    pub urls: Option<UnitUrls>,
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

impl InventoryUnit {
    pub fn make_name(&self) -> Option<&str> {
        non_blank(self.unit_make.as_ref().and_then(|m| m.name.as_deref()))
    }

    pub fn model_name(&self) -> Option<&str> {
        non_blank(self.unit_model.as_ref().and_then(|m| m.name.as_deref()))
    }

    pub fn trim_name(&self) -> Option<&str> {
        non_blank(self.unit_trim.as_ref().and_then(|t| t.name.as_deref()))
    }

    pub fn classification_name(&self) -> Option<&str> {
        non_blank(
            self.unit_classification
                .as_ref()
                .and_then(|c| c.name.as_deref()),
        )
    }

    pub fn condition_name(&self) -> Option<&str> {
        self.condition.as_ref().and_then(Condition::name)
    }

    /// Image URLs in display order.
    pub fn image_urls(&self) -> Vec<&str> {
        let mut items: Vec<&MediaItem> = self
            .media
            .iter()
            .filter(|m| non_blank(m.url.as_deref()).is_some())
            .filter(|m| {
                m.kind
                    .as_deref()
                    .is_none_or(|k| k.eq_ignore_ascii_case("image"))
            })
            .collect();
        items.sort_by_key(|m| m.order.unwrap_or(i64::MAX));
        items.into_iter().filter_map(|m| m.url.as_deref()).collect()
    }

    /// The designated display image, else the first ordered image.
    pub fn primary_image(&self) -> Option<&str> {
        non_blank(self.display_image.as_deref()).or_else(|| self.image_urls().into_iter().next())
    }

    pub fn is_featured(&self) -> bool {
        self.web_settings.as_ref().is_some_and(|w| w.featured)
    }
}
