#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;
