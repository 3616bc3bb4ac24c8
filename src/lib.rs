//! Car Audio Events - event management for car audio competitions.
//!
//! Organizers publish SPL, SQ and show events; competitors register and pay
//! entry fees; judges score against weighted rubrics; businesses list
//! themselves in the community directory.
//!
//! The crate follows a ports and adapters layout: `domain` holds the rules,
//! `ports` the seams to the outside world, `application` the use cases and
//! `adapters` the PostgreSQL, Stripe, email, geocoding and HTTP
//! implementations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
