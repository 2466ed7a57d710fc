pub mod animal_mapper;
pub mod dashboard_mapper;
pub mod forecast_mapper;
pub mod stall_mapper;

pub use animal_mapper::AnimalMapper;
pub use dashboard_mapper::DashboardMapper;
pub use forecast_mapper::ForecastMapper;
pub use stall_mapper::StallMapper;
