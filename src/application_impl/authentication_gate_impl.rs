use crate::application_port::*;
use crate::domain_model::*;
use std::sync::Arc;
use tracing::debug;

pub struct BearerAuthenticationGate {
    signer: Arc<dyn TokenSigner>,
    access_key: SigningKey,
}

impl BearerAuthenticationGate {
    pub fn new(signer: Arc<dyn TokenSigner>, access_key: SigningKey) -> Self {
        BearerAuthenticationGate { signer, access_key }
    }
}

/// `Bearer <token>` with a case-insensitive scheme. Anything else reads as
/// no token at all.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}

impl AuthenticationGate for BearerAuthenticationGate {
    fn authenticate(&self, authorization: Option<&str>) -> Result<Username, GateError> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(GateError::MissingToken)?;

        match self.signer.verify(token, &self.access_key) {
            Ok(claims) => Ok(claims.subject),
            Err(TokenError::Expired) => {
                debug!("rejected expired access token");
                Err(GateError::Expired)
            }
            Err(e) => {
                debug!(error = %e, "rejected access token");
                Err(GateError::Invalid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::JwtHs256Signer;
    use std::time::Duration;

    fn gate() -> (BearerAuthenticationGate, Arc<dyn TokenSigner>) {
        let signer: Arc<dyn TokenSigner> = Arc::new(JwtHs256Signer::new("tokenkeep.test"));
        (
            BearerAuthenticationGate::new(signer.clone(), SigningKey::new("access")),
            signer,
        )
    }

    fn jim() -> Username {
        Username::parse("Jim").unwrap()
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer   abc "), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn valid_token_yields_principal() {
        let (gate, signer) = gate();
        let signed = signer
            .sign(&jim(), &SigningKey::new("access"), Duration::from_secs(30))
            .unwrap();
        let header = format!("Bearer {}", signed.token);
        assert_eq!(gate.authenticate(Some(&header)), Ok(jim()));
    }

    #[test]
    fn missing_or_malformed_header_is_missing_token() {
        let (gate, _) = gate();
        assert_eq!(gate.authenticate(None), Err(GateError::MissingToken));
        assert_eq!(gate.authenticate(Some("")), Err(GateError::MissingToken));
        assert_eq!(
            gate.authenticate(Some("Token abc")),
            Err(GateError::MissingToken)
        );
    }

    #[test]
    fn refresh_key_token_is_rejected() {
        let (gate, signer) = gate();
        let signed = signer
            .sign(&jim(), &SigningKey::new("refresh"), Duration::from_secs(30))
            .unwrap();
        let header = format!("Bearer {}", signed.token);
        assert_eq!(gate.authenticate(Some(&header)), Err(GateError::Invalid));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let (gate, _) = gate();
        assert_eq!(
            gate.authenticate(Some("Bearer not.a.token")),
            Err(GateError::Invalid)
        );
    }
}
