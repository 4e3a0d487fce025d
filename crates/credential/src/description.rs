//! Static description of the `ryeApi` credential type for host UIs

use serde::Serialize;

use crate::credential::DEFAULT_API_URL;

/// Credential type key referenced by nodes.
pub const CREDENTIAL_KEY: &str = "ryeApi";

/// One field of a credential form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProperty {
    /// Field key.
    pub name: &'static str,
    /// Label shown to users.
    pub display_name: &'static str,
    /// Pre-filled value.
    pub default: &'static str,
    /// Whether the form rejects an empty value.
    pub required: bool,
    /// Whether the value is masked in the UI.
    pub password: bool,
}

/// Describes a credential type: key, labels and form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescription {
    /// Credential type key.
    pub name: &'static str,
    /// Label shown to users.
    pub display_name: &'static str,
    /// Where to read about obtaining a token.
    pub documentation_url: &'static str,
    /// Form fields.
    pub properties: Vec<CredentialProperty>,
    /// Path of the request used to test the credential.
    pub test_path: &'static str,
}

impl CredentialDescription {
    /// Description of the `ryeApi` credential.
    pub fn rye_api() -> Self {
        Self {
            name: CREDENTIAL_KEY,
            display_name: "Rye API",
            documentation_url: "https://docs.rye.com/api-v2/introduction",
            properties: vec![
                CredentialProperty {
                    name: "apiUrl",
                    display_name: "Api URL",
                    default: DEFAULT_API_URL,
                    required: true,
                    password: false,
                },
                CredentialProperty {
                    name: "accessToken",
                    display_name: "Access Token",
                    default: "",
                    required: true,
                    password: true,
                },
            ],
            test_path: crate::ApiCredential::test_request().path,
        }
    }

    /// Look up a form field by key.
    pub fn property(&self, name: &str) -> Option<&CredentialProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}
