//! Verified session context carried through a request

use crate::error::AuthError;
use crate::jwt::Claims;

/// Identity proven by a valid session token
///
/// Built once per request by the gate and handed explicitly to every
/// service call that needs to know who is acting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: i32,
    pub email: String,
}

impl TryFrom<Claims> for SessionContext {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(Self {
            user_id,
            email: claims.email,
        })
    }
}
