use serde_json::{Map, Value};

use crate::{
    error::ProviderError,
    schema::{Attribute, Schema, Validator},
    state::ResourceData,
};

use super::{Hooks, RestResource};

/// Terraform attribute name and FusionAuth path of every theme template.
pub const TEMPLATES: &[(&str, &str)] = &[
    ("account_edit", "templates.accountEdit"),
    ("account_index", "templates.accountIndex"),
    ("account_two_factor_disable", "templates.accountTwoFactorDisable"),
    ("account_two_factor_enable", "templates.accountTwoFactorEnable"),
    ("account_two_factor_index", "templates.accountTwoFactorIndex"),
    ("account_webauthn_add", "templates.accountWebAuthnAdd"),
    ("account_webauthn_delete", "templates.accountWebAuthnDelete"),
    ("account_webauthn_index", "templates.accountWebAuthnIndex"),
    ("email_complete", "templates.emailComplete"),
    ("email_sent", "templates.emailSent"),
    ("email_verification_required", "templates.emailVerificationRequired"),
    ("email_verify", "templates.emailVerify"),
    ("helpers", "templates.helpers"),
    ("index", "templates.index"),
    ("oauth2_authorize", "templates.oauth2Authorize"),
    ("oauth2_authorized_not_registered", "templates.oauth2AuthorizedNotRegistered"),
    ("oauth2_child_registration_not_allowed", "templates.oauth2ChildRegistrationNotAllowed"),
    (
        "oauth2_child_registration_not_allowed_complete",
        "templates.oauth2ChildRegistrationNotAllowedComplete",
    ),
    ("oauth2_complete_registration", "templates.oauth2CompleteRegistration"),
    ("oauth2_consent", "templates.oauth2Consent"),
    ("oauth2_device", "templates.oauth2Device"),
    ("oauth2_device_complete", "templates.oauth2DeviceComplete"),
    ("oauth2_error", "templates.oauth2Error"),
    ("oauth2_logout", "templates.oauth2Logout"),
    ("oauth2_passwordless", "templates.oauth2Passwordless"),
    ("oauth2_register", "templates.oauth2Register"),
    ("oauth2_start_idp_link", "templates.oauth2StartIdPLink"),
    ("oauth2_two_factor", "templates.oauth2TwoFactor"),
    ("oauth2_two_factor_enable", "templates.oauth2TwoFactorEnable"),
    ("oauth2_two_factor_enable_complete", "templates.oauth2TwoFactorEnableComplete"),
    ("oauth2_two_factor_methods", "templates.oauth2TwoFactorMethods"),
    ("oauth2_wait", "templates.oauth2Wait"),
    ("oauth2_webauthn", "templates.oauth2WebAuthn"),
    ("oauth2_webauthn_reauth", "templates.oauth2WebAuthnReauth"),
    ("oauth2_webauthn_reauth_enable", "templates.oauth2WebAuthnReauthEnable"),
    ("password_change", "templates.passwordChange"),
    ("password_complete", "templates.passwordComplete"),
    ("password_forgot", "templates.passwordForgot"),
    ("password_sent", "templates.passwordSent"),
    ("registration_complete", "templates.registrationComplete"),
    ("registration_sent", "templates.registrationSent"),
    ("registration_verification_required", "templates.registrationVerificationRequired"),
    ("registration_verify", "templates.registrationVerify"),
    ("samlv2_logout", "templates.samlv2Logout"),
    ("unauthorized", "templates.unauthorized"),
];

pub fn schema() -> Schema {
    let mut attributes = vec![
        Attribute::string("theme_id")
            .api("id")
            .computed()
            .force_new()
            .validate(Validator::Uuid),
        Attribute::string("name").api("name").required(),
        Attribute::string("source_theme_id")
            .force_new()
            .validate(Validator::Uuid)
            .describe("The theme to copy templates and messages from when creating this theme."),
        Attribute::string("default_messages")
            .api("defaultMessages")
            .computed()
            .describe("Message bundle for the default locale, in Java properties format."),
        Attribute::string_map("localized_messages").api("localizedMessages"),
        Attribute::string("stylesheet").api("stylesheet").computed(),
        Attribute::string("email_send")
            .deprecated("Use email_sent instead")
            .describe("Legacy name of the email_sent template."),
    ];
    attributes.extend(
        TEMPLATES
            .iter()
            .map(|&(name, path)| Attribute::string(name).api(path).computed()),
    );
    Schema::new("A FusionAuth theme: hosted login page templates, messages and stylesheet.", attributes)
        .version(1)
}

pub struct ThemeHooks;

impl Hooks for ThemeHooks {
    fn before_send(
        &self,
        data: &ResourceData,
        object: &mut Map<String, Value>,
        body: &mut Map<String, Value>,
    ) -> Result<(), ProviderError> {
        if let Some(source) = data.get_str("source_theme_id") {
            body.insert("sourceThemeId".to_string(), Value::String(source.to_string()));
        }
        if data.get_str("email_sent").is_none() {
            if let Some(legacy) = data.get_str("email_send") {
                let templates = object
                    .entry("templates")
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(templates) = templates {
                    templates.insert("emailSent".to_string(), Value::String(legacy.to_string()));
                }
            }
        }
        Ok(())
    }

    fn upgrade_state(
        &self,
        version: i64,
        mut state: Map<String, Value>,
    ) -> Option<Map<String, Value>> {
        if version != 0 {
            return None;
        }
        let sent_missing = state
            .get("email_sent")
            .map_or(true, |v| v.is_null() || v.as_str() == Some(""));
        if sent_missing {
            if let Some(legacy) = state.get("email_send").cloned() {
                state.insert("email_sent".to_string(), legacy);
            }
        }
        Some(state)
    }
}

pub fn resource() -> RestResource<ThemeHooks> {
    RestResource::new("fusionauth_theme", "/api/theme", "theme", schema)
        .id_attribute("theme_id")
        .hooks(ThemeHooks)
}
