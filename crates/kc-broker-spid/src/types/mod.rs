//! SPID metadata types.
//!
//! This module contains the value objects mapped from provider
//! configuration and the owned SAML metadata model the customizers fill.

mod constants;
mod contact;
mod descriptor;
mod localized;

pub use constants::*;
pub use contact::*;
pub use descriptor::*;
pub use localized::*;
