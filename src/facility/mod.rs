mod division;
mod filter;
mod record;
mod roster;

pub use division::Division;
pub use filter::{FilterState, FilterUpdate, visibility_mask};
pub use record::Facility;
pub use roster::load_facilities;
