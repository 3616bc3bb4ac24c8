//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, money, errors, state machine)
//! - `event` - Competition events and their approval workflow
//! - `registration` - Competitor registrations and check-ins
//! - `scoring` - Judging rubrics, judge sheets and result ranking
//! - `payment` - Entry-fee payments and refunds
//! - `account` - Profiles, business approval and sign-in rules
//! - `email` - Outbound email queue and notification templates
//! - `organization`, `directory`, `support` - Community features
//! - `analytics`, `audit` - Reporting and the admin trail
//! - `geocoding` - Address resolution value types

pub mod account;
pub mod analytics;
pub mod audit;
pub mod directory;
pub mod email;
pub mod event;
pub mod foundation;
pub mod geocoding;
pub mod organization;
pub mod payment;
pub mod registration;
pub mod scoring;
pub mod support;
