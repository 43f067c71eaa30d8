#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod catalog;
mod error;
mod exercise;
mod muscle_group;
mod one_rep_max;
mod overall;
mod personal_record;
mod service;
mod settings;
mod strength;
mod summary;
mod training;
mod training_session;
mod user;

pub use catalog::*;
pub use error::*;
pub use exercise::*;
pub use muscle_group::*;
pub use one_rep_max::*;
pub use overall::*;
pub use personal_record::*;
pub use service::*;
pub use settings::*;
pub use strength::*;
pub use summary::*;
pub use training::*;
pub use training_session::*;
pub use user::*;
