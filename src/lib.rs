//! Onboarding wizard: multi-step sign-up form with an admin-configurable
//! field layout and a table of submitted users.

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod identity;
pub mod notification;
pub mod onboarding;
pub mod table;
pub mod web;
