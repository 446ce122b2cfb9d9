pub mod models;
pub mod params;
pub mod sensitivity;
