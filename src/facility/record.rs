use serde::{Deserialize, Deserializer};

use super::division::Division;

/// One physical site from the facility roster.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Facility {
    #[serde(default, rename = "facility_name", alias = "name")]
    pub name: String,
    #[serde(default, rename = "facility_address1", alias = "address1")]
    pub address1: String,
    #[serde(default, rename = "facility_city", alias = "city")]
    pub city: String,
    #[serde(default, rename = "facility_state", alias = "state")]
    pub state: String,
    #[serde(default, rename = "facility_zipcode", alias = "zipcode")]
    pub zipcode: String,
    #[serde(default)]
    pub division_name: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub emr_name: String,
    #[serde(default, rename = "facility_coid", alias = "coid")]
    pub coid: String,
    #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
    pub longitude: f64,
    #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
    pub latitude: f64,
}

fn missing_coordinate() -> f64 {
    f64::NAN
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| value.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN))
}

impl Facility {
    pub fn division(&self) -> Division {
        Division::classify(&self.name, &self.division_name)
    }

    pub fn full_address(&self) -> String {
        format!("{}, {}, {}", self.address1, self.city, self.state)
    }

    pub fn has_coordinates(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}
