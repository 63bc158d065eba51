/*---------- Imports ----------*/
use crate::backend::BackendError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};

const JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/*---------- Structs ----------*/
#[derive(Deserialize, Debug)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Deserialize, Debug)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

/// Verifier for ID tokens issued to one project. Fetches the current signing
/// keys, picks the one named by the token header and checks signature, issuer
/// and audience before handing the claims back.
pub struct KeySet {
    issuer: String,
    audience: String,
    http: reqwest::Client,
}

impl KeySet {
    pub fn new(project_id: &str, http: reqwest::Client) -> Self {
        Self {
            issuer: format!("https://securetoken.google.com/{}", project_id),
            audience: project_id.to_owned(),
            http,
        }
    }

    pub async fn verify(&self, token: &str) -> Result<Map<String, Value>, BackendError> {
        let header = decode_header(token)
            .map_err(|err| BackendError::TokenVerification(err.to_string()))?;

        let kid = match header.kid {
            Some(kid) => kid,
            None => {
                return Err(BackendError::TokenVerification(
                    "token header carries no key id".to_owned(),
                ))
            }
        };

        let jwks: JwkSet = self.http.get(JWKS_URL).send().await?.json().await?;

        let jwk = match jwks.keys.iter().find(|key| key.kid == kid) {
            Some(jwk) => jwk,
            None => {
                return Err(BackendError::TokenVerification(format!(
                    "no signing key matches kid {}",
                    kid
                )))
            }
        };

        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|err| BackendError::TokenVerification(err.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let decoded = decode::<Map<String, Value>>(token, &decoding_key, &validation)
            .map_err(|err| BackendError::TokenVerification(err.to_string()))?;

        Ok(decoded.claims)
    }
}
