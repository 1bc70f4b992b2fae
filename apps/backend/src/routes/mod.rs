pub mod auth;
pub mod mastery;
pub mod practice;
pub mod questions;
pub mod settings;
