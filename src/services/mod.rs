pub mod forecasting;
pub mod products;
