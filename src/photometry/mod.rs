pub mod calc;
pub mod models;

pub use calc::{
    annual_power_consumption, calculate_photometry, energy_cost, illuminance, integrate_flux,
    required_number_of_luminaires, FluxIntegral,
};
pub use models::*;
