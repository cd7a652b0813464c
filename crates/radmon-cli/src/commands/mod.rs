//! Command implementations for the radmon CLI
//!
//! Each command lives in its own submodule.

mod mean;
mod nearest;
mod readings;
mod region;
mod regions;
mod station;
mod status;

pub use mean::execute as show_mean;
pub use nearest::execute as find_nearest;
pub use readings::execute as show_readings;
pub use region::execute as show_region;
pub use regions::execute as list_regions;
pub use station::execute as show_station;
pub use status::execute as show_status;
