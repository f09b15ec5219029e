//! Branding shown by clients

use serde::{Deserialize, Serialize};

/// Application and developer branding
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrandingConfig {
    pub app_name: String,
    pub app_description: String,
    pub developer_name: String,
    pub company_name: String,
    pub company_url: String,
    pub company_logo: String,
    pub github_username: String,
    pub github_repo: String,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            app_name: "MoA Chatbot".to_string(),
            app_description: "Mixture of Agents".to_string(),
            developer_name: "Tarek Tarabichi".to_string(),
            company_name: "2TInteractive".to_string(),
            company_url: "https://2tinteractive.com".to_string(),
            company_logo: "2tinteractive-logo.png.webp".to_string(),
            github_username: "LebToki".to_string(),
            github_repo: "MoA".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branding_defaults() {
        let branding = BrandingConfig::default();
        assert_eq!(branding.app_name, "MoA Chatbot");
        assert_eq!(branding.app_description, "Mixture of Agents");
        assert_eq!(branding.github_repo, "MoA");
    }
}
