//! # What is Dolarasia?
//!
//! Dolarasia is the core of a demo money-changer: it serves a mock exchange
//! rate board, authenticates users against a process-local key-value store,
//! records simulated buy/sell transactions, and exposes aggregate views to an
//! administrator role. There is no real market data and no real money
//! movement. Rates are randomly fluctuated constants and every record lives
//! in a local key-value store, so the whole system is a stand-in for the kind
//! of consumer front end that would normally sit on a browser.
//!
//! # Implementation
//!
//! The system is composed of:
//! - A storage adapter, [Store](crate::store::Store), which maps structured
//!   values to and from serialized text over a [StorageBackend](crate::store::StorageBackend).
//!   Backends are in-memory or a directory of JSON files.
//! - An identity store, [IdentityStore](crate::identity::IdentityStore), an
//!   email-keyed collection of user records with a seeded administrator.
//! - A session holder, [Session](crate::session::Session), holding at most
//!   one authenticated user with the credential field stripped, mirrored into
//!   the store so it survives restarts.
//! - A rate board, [RateBoard](crate::rates::RateBoard), producing the fixed
//!   currency catalog with a small random perturbation on every read.
//! - A conversion calculator, [convert](crate::convert::convert), a pure
//!   function over amount, rate and direction.
//! - A transaction ledger, [Ledger](crate::ledger::Ledger), an append-only
//!   collection of exchange records with per-user and admin views.
//!
//! [Desk](crate::desk::Desk) binds all of the above into the interface that
//! front ends talk to. The JSON server over a Desk lives in the
//! dolarasia-http crate and a reqwest client for it in dolarasia-client.
pub mod convert;
pub mod desk;
mod id;
pub mod identity;
pub mod ledger;
pub mod rates;
pub mod session;
pub mod store;
