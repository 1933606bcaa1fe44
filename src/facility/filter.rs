use crate::util::{contains_ignore_case, eq_ignore_case};

use super::division::Division;
use super::record::Facility;

/// A change to exactly one filter field. Empty text means "no constraint".
#[derive(Clone, Debug, PartialEq)]
pub enum FilterUpdate {
    Address(String),
    State(Option<String>),
    ZipCode(String),
    Division(Option<Division>),
    TimeZone(Option<String>),
    Emr(Option<String>),
}

/// Currently active constraints. `None` leaves a field unconstrained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterState {
    pub address: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub division: Option<Division>,
    pub time_zone: Option<String>,
    pub emr: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

impl FilterState {
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Address(value) => self.address = non_empty(Some(value)),
            FilterUpdate::State(value) => self.state = non_empty(value),
            FilterUpdate::ZipCode(value) => self.zip_code = non_empty(Some(value)),
            FilterUpdate::Division(value) => self.division = value,
            FilterUpdate::TimeZone(value) => self.time_zone = non_empty(value),
            FilterUpdate::Emr(value) => self.emr = non_empty(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when every set field matches the record.
    pub fn matches(&self, facility: &Facility) -> bool {
        let address_match = self
            .address
            .as_deref()
            .is_none_or(|address| contains_ignore_case(&facility.address1, address));
        let state_match = self
            .state
            .as_deref()
            .is_none_or(|state| eq_ignore_case(&facility.state, state));
        let zip_match = self
            .zip_code
            .as_deref()
            .is_none_or(|zip| facility.zipcode == zip);
        let division_match = self
            .division
            .is_none_or(|division| facility.division() == division);
        let time_zone_match = self
            .time_zone
            .as_deref()
            .is_none_or(|time_zone| eq_ignore_case(&facility.timezone, time_zone));
        let emr_match = self
            .emr
            .as_deref()
            .is_none_or(|emr| eq_ignore_case(&facility.emr_name, emr));

        address_match && state_match && zip_match && division_match && time_zone_match && emr_match
    }
}

/// Full visibility recompute, one flag per facility.
pub fn visibility_mask(facilities: &[Facility], filter: &FilterState) -> Vec<bool> {
    facilities
        .iter()
        .map(|facility| filter.matches(facility))
        .collect()
}
