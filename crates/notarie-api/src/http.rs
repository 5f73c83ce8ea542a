//! HTTP implementation of the Backend trait over reqwest.

use async_trait::async_trait;
use reqwest::{header, multipart, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use notarie_core::{
    mime_type, Address, ContentDigest, DocumentId, DocumentStatus, InviteToken,
    SigningProjection, WalletSignature,
};

use crate::error::{ApiError, Result};
use crate::traits::Backend;
use crate::types::{
    ChallengeRequest, ChallengeResponse, CreateDocumentForm, CreateDocumentResponse,
    DocumentRecord, ErrorBody, SignRequest, StatusResponse, VerifyDocumentRequest, VerifyRequest,
    VerifyResponse,
};

/// Configuration for the HTTP backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Request timeout in seconds. This is the transport timeout; the
    /// client imposes no other.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".into(),
            timeout_secs: 30,
        }
    }
}

/// HTTP backend for the notarization service.
pub struct HttpBackend {
    config: ApiConfig,
    client: Client,
}

impl HttpBackend {
    /// Create a new HTTP backend.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Map a response to a typed value or a typed error.
    ///
    /// Status mapping: 401/403 -> Unauthorized, 404 -> NotFound,
    /// 410 -> Expired, 409 -> AlreadySigned or InvalidState depending on
    /// the error body, anything else non-success -> Status.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        tracing::warn!(status = status.as_u16(), "backend rejected request: {}", message);

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::GONE => ApiError::Expired(message),
            StatusCode::CONFLICT => {
                if message.to_ascii_lowercase().contains("signed") {
                    ApiError::AlreadySigned
                } else {
                    ApiError::InvalidState(message)
                }
            }
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn auth_challenge(&self, address: &Address) -> Result<String> {
        let response = self
            .client
            .post(self.url("/auth/challenge"))
            .json(&ChallengeRequest { address: *address })
            .send()
            .await?;

        let body: ChallengeResponse = self.handle_response(response).await?;
        Ok(body.message)
    }

    async fn auth_verify(
        &self,
        address: &Address,
        message: &str,
        signature: &WalletSignature,
    ) -> Result<String> {
        let response = self
            .client
            .post(self.url("/auth/verify"))
            .json(&VerifyRequest {
                address: *address,
                message: message.to_string(),
                signature: *signature,
            })
            .send()
            .await?;

        let body: VerifyResponse = self.handle_response(response).await?;
        Ok(body.token)
    }

    async fn create_document(
        &self,
        bearer: &str,
        form: CreateDocumentForm,
    ) -> Result<DocumentId> {
        let extension = notarie_core::extension_of(&form.file_name).unwrap_or_default();
        let file_part = multipart::Part::bytes(form.content.to_vec())
            .file_name(form.file_name.clone())
            .mime_str(mime_type(&extension))?;

        let mut multipart = multipart::Form::new()
            .part("file", file_part)
            .text("fileHash", form.file_hash.to_prefixed_hex())
            .text("ownerAddress", form.owner.to_hex())
            .text("ownerFirstName", form.owner_contact.first_name.clone())
            .text("ownerLastName", form.owner_contact.last_name.clone())
            .text("ownerEmail", form.owner_contact.email.clone())
            .text("signerFirstName", form.signer_contact.first_name.clone())
            .text("signerLastName", form.signer_contact.last_name.clone())
            .text("signerEmail", form.signer_contact.email.clone());

        if let Some(signer) = form.signer {
            multipart = multipart.text("signerAddress", signer.to_hex());
        }

        let response = self
            .client
            .post(self.url("/documents"))
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
            .multipart(multipart)
            .send()
            .await?;

        let body: CreateDocumentResponse = self.handle_response(response).await?;
        Ok(body.id)
    }

    async fn list_documents(&self, bearer: &str) -> Result<Vec<DocumentRecord>> {
        let response = self
            .client
            .get(self.url("/documents"))
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn get_document(&self, bearer: &str, id: &DocumentId) -> Result<DocumentRecord> {
        let response = self
            .client
            .get(self.url(&format!("/documents/{}", id)))
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn get_invitation(&self, token: &InviteToken) -> Result<SigningProjection> {
        let response = self
            .client
            .get(self.url(&format!("/document/{}", token)))
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn submit_signature(
        &self,
        token: &InviteToken,
        request: SignRequest,
    ) -> Result<DocumentStatus> {
        let response = self
            .client
            .post(self.url(&format!("/sign/{}", token)))
            .json(&request)
            .send()
            .await?;

        let body: StatusResponse = self.handle_response(response).await?;
        Ok(body.status)
    }

    async fn cancel_document(&self, bearer: &str, id: &DocumentId) -> Result<DocumentStatus> {
        let response = self
            .client
            .post(self.url(&format!("/documents/{}/cancel", id)))
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
            .send()
            .await?;

        let body: StatusResponse = self.handle_response(response).await?;
        Ok(body.status)
    }

    async fn find_by_digest(&self, digest: &ContentDigest) -> Result<Vec<DocumentRecord>> {
        let response = self
            .client
            .post(self.url("/verify-document"))
            .json(&VerifyDocumentRequest {
                document_hash: *digest,
            })
            .send()
            .await?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let backend = HttpBackend::new(ApiConfig {
            base_url: "https://api.example.com".into(),
            timeout_secs: 5,
        })
        .unwrap();

        assert_eq!(backend.url("/documents"), "https://api.example.com/documents");
        assert_eq!(
            backend.url(&format!("/sign/{}", InviteToken::new("tok"))),
            "https://api.example.com/sign/tok"
        );
    }
}
