use api_types::auth::Profile;

use crate::client::{Client, ClientError};

/// Which screen the signed-in state allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    VerifyEmail,
    Shipments,
}

/// The current user, if any. Shipments are only reachable with a verified
/// account.
#[derive(Debug, Default)]
pub struct Session {
    profile: Option<Profile>,
}

impl Session {
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn sign_in(&mut self, profile: Profile) {
        tracing::info!(
            email = %profile.email,
            verified = profile.is_account_verified,
            "signed in"
        );
        self.profile = Some(profile);
    }

    pub fn sign_out(&mut self) {
        self.profile = None;
    }

    pub fn route(&self) -> Route {
        match &self.profile {
            None => Route::Login,
            Some(profile) if !profile.is_account_verified => Route::VerifyEmail,
            Some(_) => Route::Shipments,
        }
    }
}

/// Picks up a session cookie left by a previous login, if the server still
/// accepts it.
pub async fn restore(client: &Client) -> Result<Option<Profile>, ClientError> {
    if !client.is_authenticated().await? {
        return Ok(None);
    }
    client.profile().await.map(Some)
}

pub async fn login(client: &Client, email: &str, password: &str) -> Result<Profile, ClientError> {
    client.login(email, password).await?;
    client.profile().await
}

/// Confirms the code and returns the refreshed (now verified) profile.
pub async fn verify(client: &Client, otp: &str) -> Result<Profile, ClientError> {
    client.verify_otp(otp).await?;
    client.profile().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, PASSWORD, VALID_OTP};

    fn profile(verified: bool) -> Profile {
        Profile {
            user_id: "u-1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            is_account_verified: verified,
        }
    }

    #[test]
    fn routing_follows_verification() {
        let mut session = Session::default();
        assert_eq!(session.route(), Route::Login);

        session.sign_in(profile(false));
        assert_eq!(session.route(), Route::VerifyEmail);

        session.sign_in(profile(true));
        assert_eq!(session.route(), Route::Shipments);

        session.sign_out();
        assert_eq!(session.route(), Route::Login);
    }

    #[tokio::test]
    async fn restore_without_cookie_is_anonymous() {
        let backend = FakeBackend::default();
        let client = Client::new(&backend.spawn().await).unwrap();
        assert_eq!(restore(&client).await.unwrap(), None);
    }

    #[tokio::test]
    async fn login_then_verify() {
        let backend = FakeBackend::default();
        let client = Client::new(&backend.spawn().await).unwrap();

        let profile = login(&client, "ada@example.com", PASSWORD).await.unwrap();
        assert!(!profile.is_account_verified);
        assert_eq!(restore(&client).await.unwrap(), Some(profile));

        assert!(matches!(
            verify(&client, "000000").await,
            Err(ClientError::Validation(_))
        ));
        let verified = verify(&client, VALID_OTP).await.unwrap();
        assert!(verified.is_account_verified);
    }
}
