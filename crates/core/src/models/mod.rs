//! Data models for MedBook

mod appointment;
mod category;
mod doctor;
mod fee;
mod hospital;
mod ids;
mod user;

pub use appointment::*;
pub use category::*;
pub use doctor::*;
pub use fee::*;
pub use hospital::*;
pub use ids::*;
pub use user::*;
