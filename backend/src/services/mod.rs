//! Business logic services
//!
//! Services encapsulate the registration and login flows and coordinate
//! between the credential store, password hashing and token signing.

pub mod account;

pub use account::AccountService;
