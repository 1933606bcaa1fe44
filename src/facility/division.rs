const HUB_SITES_MARKER: &str = "Hub Sites";
const SUPPLY_CHAIN: &str = "Supply Chain";
const SHARED_SERVICE: &str = "HSC";

/// Display category derived from a facility's name and division.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Division {
    DivisionOffice,
    SupplyChainCenter,
    SharedServiceCenter,
    Hospital,
}

impl Division {
    pub const ALL: [Self; 4] = [
        Self::DivisionOffice,
        Self::SupplyChainCenter,
        Self::SharedServiceCenter,
        Self::Hospital,
    ];

    /// The only classification rule; marker colour and the division filter
    /// both go through here.
    pub fn classify(name: &str, division_name: &str) -> Self {
        if name.contains(HUB_SITES_MARKER) {
            Self::DivisionOffice
        } else if division_name == SUPPLY_CHAIN {
            Self::SupplyChainCenter
        } else if division_name == SHARED_SERVICE {
            Self::SharedServiceCenter
        } else {
            Self::Hospital
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DivisionOffice => "Division Office",
            Self::SupplyChainCenter => "Supply Chain Center",
            Self::SharedServiceCenter => "Shared Service Center",
            Self::Hospital => "Hospital",
        }
    }
}
