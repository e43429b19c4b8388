//! Database models

pub mod catalog;
pub mod event;
pub mod registration;

pub use catalog::{
    DiscountMethod, EventCatalog, HealthEntity, LodgingSource, PricingConfig, PricingMode, Region,
    RoleProfile,
};
pub use event::Event;
pub use registration::{NewRegistration, Registration, RegistrationStatus};
