// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity provider for the Cuca booking server.
//!
//! The provider owns user accounts: it creates them, checks passwords, and
//! issues and verifies its own "custom tokens". Those tokens carry only a
//! `uid`; whoever verifies one must look the user up again, so the returned
//! [`UserRecord`] is always the provider's current view of the account.
//!
//! [`IdentityProvider`] is the seam the server depends on.
//! [`SqliteIdentityProvider`] is the implementation that ships with it.

mod argon2_config;
pub mod custom_token;
pub mod error;
pub mod provider;
pub mod sqlite;
pub mod types;
pub mod verifier;

pub use custom_token::{CustomTokenClaims, CUSTOM_TOKEN_ISSUER};
pub use error::IdentityError;
pub use provider::IdentityProvider;
pub use sqlite::{run_migrations, SqliteIdentityProvider, MIN_PASSWORD_LEN};
pub use types::{UserRecord, UserUpdate};
pub use verifier::{identity_to_auth_error, principal_from_record, ProviderVerifier};
