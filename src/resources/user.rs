use serde_json::{Map, Value};

use crate::{
    error::ProviderError,
    schema::{Attribute, Schema, Validator},
    state::ResourceData,
};

use super::{Hooks, RestResource};

pub fn schema() -> Schema {
    Schema::new(
        "A FusionAuth user.",
        vec![
            Attribute::string("user_id")
                .api("id")
                .computed()
                .force_new()
                .validate(Validator::Uuid),
            Attribute::string("tenant_id")
                .api("tenantId")
                .computed()
                .force_new()
                .validate(Validator::Uuid)
                .describe("Required when more than one tenant exists."),
            Attribute::string("application_id")
                .validate(Validator::Uuid)
                .describe("Application whose email templates are used for the set password email."),
            Attribute::string("birth_date")
                .api("birthDate")
                .describe("YYYY-MM-DD"),
            Attribute::json("data").api("data"),
            Attribute::string("email").api("email"),
            Attribute::string("encryption_scheme")
                .api("encryptionScheme")
                .computed(),
            Attribute::int("expiry").api("expiry"),
            Attribute::string("first_name").api("firstName"),
            Attribute::string("full_name").api("fullName"),
            Attribute::string("image_url").api("imageUrl").validate(Validator::Url),
            Attribute::string("last_name").api("lastName"),
            Attribute::string("middle_name").api("middleName"),
            Attribute::string("mobile_phone").api("mobilePhone"),
            Attribute::string("parent_email").api("parentEmail"),
            Attribute::string("password")
                .api("password")
                .sensitive()
                .write_only()
                .describe("Only sent to FusionAuth, never read back."),
            Attribute::bool("password_change_required")
                .api("passwordChangeRequired")
                .default(false),
            Attribute::string_list("preferred_languages").api("preferredLanguages"),
            Attribute::bool("send_set_password_email")
                .default(false)
                .describe("Email the user a link to set their password on create."),
            Attribute::bool("skip_verification")
                .default(false)
                .describe("Mark the email address verified without sending a verification email."),
            Attribute::string("timezone").api("timezone"),
            Attribute::string("username").api("username"),
            Attribute::string("username_status")
                .api("usernameStatus")
                .computed()
                .one_of(&["ACTIVE", "PENDING", "REJECTED"]),
            Attribute::bool("verified").api("verified").computed_only(),
            Attribute::bool("active").api("active").computed_only(),
        ],
    )
}

pub struct UserHooks;

impl Hooks for UserHooks {
    fn before_send(
        &self,
        data: &ResourceData,
        _object: &mut Map<String, Value>,
        body: &mut Map<String, Value>,
    ) -> Result<(), ProviderError> {
        if data.get_str("email").is_none() && data.get_str("username").is_none() {
            return Err(ProviderError::invalid(
                "email",
                "either email or username must be set",
            ));
        }
        if let Some(application) = data.get_str("application_id") {
            body.insert(
                "applicationId".to_string(),
                Value::String(application.to_string()),
            );
        }
        for (attribute, key) in [
            ("send_set_password_email", "sendSetPasswordEmail"),
            ("skip_verification", "skipVerification"),
        ] {
            body.insert(
                key.to_string(),
                Value::Bool(data.get_bool(attribute).unwrap_or(false)),
            );
        }
        Ok(())
    }
}

pub fn resource() -> RestResource<UserHooks> {
    RestResource::new("fusionauth_user", "/api/user", "user", schema)
        .id_attribute("user_id")
        .tenant_attribute("tenant_id")
        .delete_query(&[("hardDelete", "true")])
        .hooks(UserHooks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::flatten;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_request_flags_are_top_level() {
        let data = ResourceData::new(map(json!({
            "email": "richard@piedpiper.com",
            "send_set_password_email": true
        })));
        let mut object = Map::new();
        let mut body = Map::new();
        UserHooks.before_send(&data, &mut object, &mut body).unwrap();
        assert_eq!(body["sendSetPasswordEmail"], json!(true));
        assert_eq!(body["skipVerification"], json!(false));
        assert!(object.is_empty());
    }

    #[test]
    fn test_login_id_is_required() {
        let data = ResourceData::new(map(json!({ "first_name": "Richard" })));
        let error = UserHooks
            .before_send(&data, &mut Map::new(), &mut Map::new())
            .unwrap_err();
        assert!(matches!(error, ProviderError::InvalidAttribute { .. }));
    }

    #[test]
    fn test_password_is_kept_from_prior_state() {
        let prior = map(json!({ "email": "richard@piedpiper.com", "password": "hunter22" }));
        let object = json!({ "id": "u", "email": "richard@piedpiper.com", "verified": true });
        let state = flatten(&schema().block, &object, &prior);
        assert_eq!(state["password"], json!("hunter22"));
        assert_eq!(state["verified"], json!(true));
    }
}
