use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            access_ttl: Duration::from_secs(30),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60), // 7 days
        }
    }
}

pub struct RealSessionService {
    signer: Arc<dyn TokenSigner>,
    store: Arc<dyn RefreshTokenStore>,
    keys: TokenKeys,
    config: SessionConfig,
}

impl RealSessionService {
    pub fn new(
        signer: Arc<dyn TokenSigner>,
        store: Arc<dyn RefreshTokenStore>,
        keys: TokenKeys,
        config: SessionConfig,
    ) -> Self {
        Self {
            signer,
            store,
            keys,
            config,
        }
    }

    fn mint_access(&self, subject: &Username) -> Result<AccessToken, SessionError> {
        let signed = self
            .signer
            .sign(subject, &self.keys.access, self.config.access_ttl)?;
        Ok(AccessToken(signed.token))
    }
}

#[async_trait::async_trait]
impl SessionService for RealSessionService {
    async fn login(&self, username: Username) -> Result<LoginResult, SessionError> {
        let access_token = self.mint_access(&username)?;
        let refresh = self
            .signer
            .sign(&username, &self.keys.refresh, self.config.refresh_ttl)?;
        let refresh_token = RefreshToken(refresh.token);

        // Persisted before the caller ever sees the token.
        let record = self
            .store
            .issue(&refresh_token, &username, self.config.refresh_ttl)
            .await?;

        info!(username = %username, expires_at = %record.expires_at, "session opened");
        Ok(LoginResult {
            access_token,
            refresh_token,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, SessionError> {
        let refresh_token = refresh_token.trim();
        if refresh_token.is_empty() {
            return Err(SessionError::RefreshTokenRequired);
        }

        // Issued tokens are compact JWTs; anything else cannot be on record.
        if !refresh_token.is_ascii() {
            return Err(SessionError::InvalidRefreshToken);
        }

        let owner = match self.store.validate(refresh_token).await? {
            Some(owner) => owner,
            None => {
                debug!("refresh with unknown, revoked or expired token");
                return Err(SessionError::InvalidRefreshToken);
            }
        };

        let access_token = self.mint_access(&owner)?;
        debug!(username = %owner, "access token refreshed");
        Ok(access_token)
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), SessionError> {
        let refresh_token = refresh_token.trim();
        if !refresh_token.is_ascii() {
            return Err(SessionError::TokenNotFound);
        }

        if self.store.revoke(refresh_token).await? {
            info!("session closed");
            Ok(())
        } else {
            Err(SessionError::TokenNotFound)
        }
    }

    async fn tokens_of(&self, owner: &Username) -> Result<Vec<RefreshToken>, SessionError> {
        Ok(self.store.tokens_of(owner).await?)
    }

    async fn sweep(&self) -> Result<u64, SessionError> {
        Ok(self.store.sweep().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::JwtHs256Signer;
    use crate::infra_memory::MemoryRefreshTokenStore;

    struct Fixture {
        service: RealSessionService,
        signer: Arc<dyn TokenSigner>,
        keys: TokenKeys,
        store: Arc<MemoryRefreshTokenStore>,
    }

    fn fixture() -> Fixture {
        let signer: Arc<dyn TokenSigner> = Arc::new(JwtHs256Signer::new("tokenkeep.test"));
        let store = Arc::new(MemoryRefreshTokenStore::new());
        let keys = TokenKeys {
            access: SigningKey::new("access-secret"),
            refresh: SigningKey::new("refresh-secret"),
        };
        let service = RealSessionService::new(
            signer.clone(),
            store.clone(),
            keys.clone(),
            SessionConfig::default(),
        );
        Fixture {
            service,
            signer,
            keys,
            store,
        }
    }

    fn tamara() -> Username {
        Username::parse("Tamara").unwrap()
    }

    #[tokio::test]
    async fn login_then_refresh_yields_token_for_same_subject() {
        let f = fixture();
        let login = f.service.login(tamara()).await.unwrap();

        let claims = f
            .signer
            .verify(login.access_token.as_str(), &f.keys.access)
            .unwrap();
        assert_eq!(claims.subject, tamara());

        let refreshed = f
            .service
            .refresh(login.refresh_token.as_str())
            .await
            .unwrap();
        let claims = f
            .signer
            .verify(refreshed.as_str(), &f.keys.access)
            .unwrap();
        assert_eq!(claims.subject, tamara());
    }

    #[tokio::test]
    async fn tokens_are_signed_with_distinct_keys() {
        let f = fixture();
        let login = f.service.login(tamara()).await.unwrap();
        assert_eq!(
            f.signer
                .verify(login.refresh_token.as_str(), &f.keys.access)
                .unwrap_err(),
            TokenError::Invalid
        );
        assert!(
            f.signer
                .verify(login.refresh_token.as_str(), &f.keys.refresh)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn refresh_token_survives_repeated_refreshes() {
        let f = fixture();
        let login = f.service.login(tamara()).await.unwrap();
        for _ in 0..3 {
            f.service
                .refresh(login.refresh_token.as_str())
                .await
                .unwrap();
        }
        assert_eq!(
            f.store.tokens_of(&tamara()).await.unwrap(),
            vec![login.refresh_token]
        );
    }

    #[tokio::test]
    async fn empty_refresh_token_is_required_error() {
        let f = fixture();
        assert!(matches!(
            f.service.refresh("").await,
            Err(SessionError::RefreshTokenRequired)
        ));
        assert!(matches!(
            f.service.refresh("   ").await,
            Err(SessionError::RefreshTokenRequired)
        ));
    }

    #[tokio::test]
    async fn unknown_refresh_token_is_invalid() {
        let f = fixture();
        assert!(matches!(
            f.service.refresh("never-issued").await,
            Err(SessionError::InvalidRefreshToken)
        ));
    }

    /// Fails every call the way a backend rejecting the input would.
    struct BrokenStore;

    #[async_trait::async_trait]
    impl RefreshTokenStore for BrokenStore {
        async fn issue(
            &self,
            _: &RefreshToken,
            _: &Username,
            _: Duration,
        ) -> Result<RefreshTokenRecord, StoreError> {
            Err(StoreError::Backend("unreachable".into()))
        }
        async fn validate(&self, _: &str) -> Result<Option<Username>, StoreError> {
            Err(StoreError::Backend("unreachable".into()))
        }
        async fn revoke(&self, _: &str) -> Result<bool, StoreError> {
            Err(StoreError::Backend("unreachable".into()))
        }
        async fn sweep(&self) -> Result<u64, StoreError> {
            Err(StoreError::Backend("unreachable".into()))
        }
        async fn tokens_of(&self, _: &Username) -> Result<Vec<RefreshToken>, StoreError> {
            Err(StoreError::Backend("unreachable".into()))
        }
    }

    #[tokio::test]
    async fn non_ascii_tokens_are_unknown_without_asking_the_store() {
        let f = fixture();
        let service = RealSessionService::new(
            f.signer,
            Arc::new(BrokenStore),
            f.keys,
            SessionConfig::default(),
        );
        assert!(matches!(
            service.refresh("t\u{e9}l\u{e9}phone").await,
            Err(SessionError::InvalidRefreshToken)
        ));
        assert!(matches!(
            service.logout("t\u{e9}l\u{e9}phone").await,
            Err(SessionError::TokenNotFound)
        ));
        assert!(matches!(
            service.refresh("ascii-token").await,
            Err(SessionError::Store(_))
        ));
    }

    #[tokio::test]
    async fn access_token_cannot_be_used_to_refresh() {
        let f = fixture();
        let login = f.service.login(tamara()).await.unwrap();
        assert!(matches!(
            f.service.refresh(login.access_token.as_str()).await,
            Err(SessionError::InvalidRefreshToken)
        ));
    }

    #[tokio::test]
    async fn logout_revokes_and_is_not_repeatable() {
        let f = fixture();
        let login = f.service.login(tamara()).await.unwrap();
        let token = login.refresh_token.as_str();

        f.service.logout(token).await.unwrap();
        assert!(matches!(
            f.service.refresh(token).await,
            Err(SessionError::InvalidRefreshToken)
        ));
        assert!(matches!(
            f.service.logout(token).await,
            Err(SessionError::TokenNotFound)
        ));
    }

    #[tokio::test]
    async fn logins_for_one_user_are_independent() {
        let f = fixture();
        let phone = f.service.login(tamara()).await.unwrap();
        let laptop = f.service.login(tamara()).await.unwrap();
        assert_ne!(phone.refresh_token, laptop.refresh_token);

        f.service
            .logout(phone.refresh_token.as_str())
            .await
            .unwrap();
        assert!(
            f.service
                .refresh(laptop.refresh_token.as_str())
                .await
                .is_ok()
        );
        assert_eq!(
            f.service.tokens_of(&tamara()).await.unwrap().len(),
            2,
            "revoked record stays until swept"
        );
        assert_eq!(f.service.sweep().await.unwrap(), 1);
        assert_eq!(
            f.service.tokens_of(&tamara()).await.unwrap(),
            vec![laptop.refresh_token]
        );
    }
}
