//! Hosted user-pool implementation of [`IdentityProvider`].
//!
//! Only the public client operations are used (password auth, sign-up,
//! confirmation, `GetUser`, `GlobalSignOut`), so no IAM credentials are
//! needed. The access token obtained at sign-in is kept in memory for the
//! lifetime of the client.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cognitoidentityprovider::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType};
use aws_sdk_cognitoidentityprovider::Client;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::errors::AuthError;
use crate::identity::{IdentityProvider, SignUpOutcome, SignUpStep};
use crate::models::identity::Identity;

pub struct HostedIdentityClient {
    client: Client,
    client_id: String,
    access_token: Mutex<Option<String>>,
}

impl HostedIdentityClient {
    /// Builds the SDK client for `region`. `endpoint` overrides the regional
    /// endpoint (local emulators, tests).
    pub async fn connect(
        region: &str,
        endpoint: Option<&str>,
        client_id: String,
        timeout: Duration,
    ) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .timeout_config(TimeoutConfig::builder().operation_timeout(timeout).build());
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Self::new(Client::new(&sdk_config), client_id)
    }

    pub fn new(client: Client, client_id: String) -> Self {
        Self {
            client,
            client_id,
            access_token: Mutex::new(None),
        }
    }

    fn token(&self) -> Option<String> {
        self.access_token.lock().clone()
    }
}

fn provider_error(code: String, message: String) -> AuthError {
    match code.as_str() {
        "NotAuthorizedException" | "UserNotFoundException" => AuthError::InvalidCredentials(message),
        "UserNotConfirmedException" => AuthError::NotConfirmed(message),
        _ => AuthError::Provider { code, message },
    }
}

/// Service errors keep their code; everything else (dispatch, timeout,
/// unparseable response) is a network failure.
fn auth_error<E, R>(operation: &str, err: SdkError<E, R>) -> AuthError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.as_service_error() {
        Some(service) => {
            let code = service.code().unwrap_or("Unknown").to_string();
            let message = service.message().unwrap_or_default().to_string();
            debug!("{operation} rejected with {code}: {message}");
            provider_error(code, message)
        }
        None => {
            let detail = DisplayErrorContext(&err).to_string();
            debug!("{operation} failed: {detail}");
            AuthError::Network(detail)
        }
    }
}

fn attribute(name: &str, value: &str) -> Result<AttributeType, AuthError> {
    AttributeType::builder()
        .name(name)
        .value(value)
        .build()
        .map_err(|e| AuthError::Provider {
            code: "InvalidParameterException".to_string(),
            message: e.to_string(),
        })
}

#[async_trait]
impl IdentityProvider for HostedIdentityClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let output = self
            .client
            .sign_up()
            .client_id(&self.client_id)
            .username(email)
            .password(password)
            .user_attributes(attribute("email", email)?)
            .user_attributes(attribute("preferred_username", display_name)?)
            .send()
            .await
            .map_err(|e| auth_error("SignUp", e))?;
        info!("Registered account for {email}");

        let next_step = if output.user_confirmed() {
            SignUpStep::Done
        } else {
            SignUpStep::ConfirmWithCode {
                destination: output
                    .code_delivery_details()
                    .and_then(|d| d.destination())
                    .map(str::to_string),
            }
        };

        Ok(SignUpOutcome {
            user_sub: Some(output.user_sub().to_string()),
            next_step,
        })
    }

    async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), AuthError> {
        self.client
            .confirm_sign_up()
            .client_id(&self.client_id)
            .username(email)
            .confirmation_code(code)
            .send()
            .await
            .map_err(|e| auth_error("ConfirmSignUp", e))?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if self.access_token.lock().is_some() {
            return Err(AuthError::SessionExists);
        }

        let output = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .client_id(&self.client_id)
            .auth_parameters("USERNAME", email)
            .auth_parameters("PASSWORD", password)
            .send()
            .await
            .map_err(|e| auth_error("InitiateAuth", e))?;

        let token = output
            .authentication_result()
            .and_then(|r| r.access_token())
            .map(str::to_string);

        match (token, output.challenge_name()) {
            (Some(token), _) => {
                *self.access_token.lock() = Some(token);
                Ok(())
            }
            (None, Some(challenge)) => Err(AuthError::Provider {
                code: "ChallengeRequired".to_string(),
                message: format!("Sign-in requires the {} challenge", challenge.as_str()),
            }),
            (None, None) => Err(AuthError::Provider {
                code: "InvalidResponse".to_string(),
                message: "Sign-in response carried no tokens".to_string(),
            }),
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        // Local tokens go first so a failed remote call cannot leave us signed in.
        let token = self.access_token.lock().take();
        let Some(token) = token else {
            return Ok(());
        };

        let result = self
            .client
            .global_sign_out()
            .access_token(token)
            .send()
            .await
            .map_err(|e| auth_error("GlobalSignOut", e));
        if let Err(e) = &result {
            warn!("Remote sign-out failed after local tokens were dropped: {e}");
        }
        result.map(|_| ())
    }

    async fn current_identity(&self) -> Result<Identity, AuthError> {
        let token = self.token().ok_or(AuthError::NoSession)?;

        let output = match self.client.get_user().access_token(token).send().await {
            Ok(output) => output,
            Err(e) => match auth_error("GetUser", e) {
                AuthError::InvalidCredentials(_) => {
                    // Expired or revoked token: the session is gone.
                    self.access_token.lock().take();
                    return Err(AuthError::NoSession);
                }
                other => return Err(other),
            },
        };

        let attribute = |name: &str| {
            output
                .user_attributes()
                .iter()
                .find(|a| a.name() == name)
                .and_then(|a| a.value())
                .map(str::to_string)
        };

        Ok(Identity {
            stable_id: attribute("sub").unwrap_or_else(|| output.username().to_string()),
            email: attribute("email"),
            handle: output.username().to_string(),
        })
    }
}
