//! Identity signature command.
//!
//! Prints the `x-shopdesk-signature` value the identity provider would send
//! for a user, for calling the API by hand:
//!
//! ```bash
//! curl -H "x-shopdesk-user: user_2abc" \
//!      -H "x-shopdesk-signature: $(shopdesk identity sign --user user_2abc)" \
//!      http://127.0.0.1:3001/api/stores
//! ```

use shopdesk_admin::middleware::IdentityVerifier;
use shopdesk_core::UserId;

use super::{CliError, secret_env};

/// Print the signature for `user` keyed with `SHOPDESK_IDENTITY_SECRET`.
///
/// # Errors
///
/// Returns an error if the user id is blank or the secret is not set.
pub fn sign(user: &str) -> Result<(), CliError> {
    let user = UserId::parse(user).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let verifier = IdentityVerifier::new(secret_env("SHOPDESK_IDENTITY_SECRET")?);

    #[allow(clippy::print_stdout)]
    {
        println!("{}", verifier.sign(&user));
    }
    Ok(())
}
