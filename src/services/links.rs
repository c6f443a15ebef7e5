use url::Url;

/// Frontend pages the provider sends users back to.
#[derive(Debug, Clone)]
pub struct Links {
    base: String,
}

impl Links {
    pub fn new(frontend_url: &Url) -> Self {
        Self {
            base: frontend_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn verify_email(&self) -> String {
        format!("{}/auth/verify-email", self.base)
    }

    pub fn dashboard(&self) -> String {
        format!("{}/dashboard", self.base)
    }

    pub fn reset_password(&self) -> String {
        format!("{}/auth/reset-password", self.base)
    }
}
