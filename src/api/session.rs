//! Session Verification

use reqwest::Method;

use order_core::ApiError;

use super::ApiClient;

impl ApiClient {
    /// Check the stored token before any page renders
    pub async fn verify_session(&self) -> Result<(), ApiError> {
        if self.token.is_none() {
            return Err(ApiError::Unauthorized);
        }
        self.send(self.request(Method::GET, "auth/verify")).await.map(|_| ())
    }
}
