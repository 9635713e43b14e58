//! Social login providers with a fixed FusionAuth name.

use crate::schema::{Attribute, Schema, Validator};

use super::attributes;

const LOGIN_METHODS: &[&str] = &["UsePopup", "UseRedirect"];

fn button_text() -> Attribute {
    Attribute::string("button_text").api("buttonText").required()
}

fn client_secret() -> Attribute {
    Attribute::string("client_secret")
        .api("client_secret")
        .sensitive()
}

/// Per application overrides of the top level client settings.
fn client_overrides() -> Vec<Attribute> {
    vec![
        Attribute::string("button_text").api("buttonText"),
        Attribute::string("client_id").api("client_id"),
        client_secret(),
        Attribute::string("scope").api("scope"),
    ]
}

/// `button_text`, `client_id`, `client_secret` and `scope`, the shape most
/// OAuth2 based providers share.
fn oauth(description: &'static str) -> Schema {
    Schema::new(
        description,
        attributes(
            client_overrides(),
            vec![
                button_text(),
                Attribute::string("client_id").api("client_id").required(),
                client_secret().required(),
                Attribute::string("scope").api("scope"),
            ],
        ),
    )
}

pub fn apple() -> Schema {
    Schema::new(
        "Sign in with Apple.",
        attributes(
            vec![
                Attribute::string("bundle_id").api("bundleId"),
                Attribute::string("button_text").api("buttonText"),
                Attribute::string("key_id").api("keyId").validate(Validator::Uuid),
                Attribute::string("scope").api("scope"),
                Attribute::string("services_id").api("servicesId"),
                Attribute::string("team_id").api("teamId"),
            ],
            vec![
                Attribute::string("bundle_id").api("bundleId"),
                button_text(),
                Attribute::string("key_id")
                    .api("keyId")
                    .required()
                    .validate(Validator::Uuid)
                    .describe("Key in Key Master holding the Apple private key."),
                Attribute::string("scope").api("scope"),
                Attribute::string("services_id").api("servicesId").required(),
                Attribute::string("team_id").api("teamId").required(),
            ],
        ),
    )
}

pub fn epic_games() -> Schema {
    oauth("Login with Epic Games.")
}

pub fn facebook() -> Schema {
    Schema::new(
        "Login with Facebook.",
        attributes(
            vec![
                Attribute::string("app_id").api("appId"),
                Attribute::string("button_text").api("buttonText"),
                client_secret(),
                Attribute::string("fields").api("fields"),
                Attribute::string("login_method")
                    .api("loginMethod")
                    .one_of(LOGIN_METHODS),
                Attribute::string("permissions").api("permissions"),
            ],
            vec![
                Attribute::string("app_id").api("appId").required(),
                button_text(),
                client_secret().required(),
                Attribute::string("fields").api("fields"),
                Attribute::string("login_method")
                    .api("loginMethod")
                    .default("UseRedirect")
                    .one_of(LOGIN_METHODS),
                Attribute::string("permissions").api("permissions"),
            ],
        ),
    )
}

pub fn google() -> Schema {
    let mut overrides = client_overrides();
    overrides.extend([
        Attribute::string("login_method")
            .api("loginMethod")
            .one_of(LOGIN_METHODS),
        Attribute::string("properties_api").api("properties.api"),
        Attribute::string("properties_button").api("properties.button"),
    ]);
    Schema::new(
        "Login with Google.",
        attributes(
            overrides,
            vec![
                button_text(),
                Attribute::string("client_id").api("client_id").required(),
                client_secret().required(),
                Attribute::string("login_method")
                    .api("loginMethod")
                    .default("UseRedirect")
                    .one_of(LOGIN_METHODS),
                Attribute::string("properties_api")
                    .api("properties.api")
                    .describe("Google Identity Services API parameters, only used with the UsePopup login method."),
                Attribute::string("properties_button")
                    .api("properties.button")
                    .describe("Google Identity Services button parameters, only used with the UsePopup login method."),
                Attribute::string("scope").api("scope"),
            ],
        ),
    )
}

pub fn linkedin() -> Schema {
    oauth("Login with LinkedIn.")
}

pub fn sony_psn() -> Schema {
    oauth("Login with Sony PlayStation Network.")
}

pub fn steam() -> Schema {
    let api_modes: &'static [&'static str] = &["Public", "Partner"];
    Schema::new(
        "Login with Steam.",
        attributes(
            vec![
                Attribute::string("api_mode").api("apiMode").one_of(api_modes),
                Attribute::string("button_text").api("buttonText"),
                Attribute::string("client_id").api("client_id"),
                Attribute::string("scope").api("scope"),
                Attribute::string("web_api_key")
                    .api("webAPIKey")
                    .sensitive(),
            ],
            vec![
                Attribute::string("api_mode")
                    .api("apiMode")
                    .default("Public")
                    .one_of(api_modes),
                button_text(),
                Attribute::string("client_id").api("client_id").required(),
                Attribute::string("scope").api("scope"),
                Attribute::string("web_api_key")
                    .api("webAPIKey")
                    .required()
                    .sensitive(),
            ],
        ),
    )
}

pub fn twitch() -> Schema {
    oauth("Login with Twitch.")
}

pub fn twitter() -> Schema {
    Schema::new(
        "Login with Twitter.",
        attributes(
            vec![
                Attribute::string("button_text").api("buttonText"),
                Attribute::string("consumer_key").api("consumerKey"),
                Attribute::string("consumer_secret")
                    .api("consumerSecret")
                    .sensitive(),
            ],
            vec![
                button_text(),
                Attribute::string("consumer_key").api("consumerKey").required(),
                Attribute::string("consumer_secret")
                    .api("consumerSecret")
                    .required()
                    .sensitive(),
            ],
        ),
    )
}

pub fn xbox() -> Schema {
    oauth("Login with Xbox.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::expand;
    use serde_json::{json, Map, Value};

    #[test]
    fn test_google_popup_properties() {
        let state = match json!({
            "button_text": "Login with Google",
            "client_id": "254311943570-8e2i2hds0qf4q7l7m6s0hs1hm7h5f8ke.apps.googleusercontent.com",
            "client_secret": "secret",
            "login_method": "UsePopup",
            "properties_api": "data-auto_select=false"
        }) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let object = expand(&google().block, &state).unwrap();
        assert_eq!(object["properties"], json!({ "api": "data-auto_select=false" }));
        assert_eq!(object["loginMethod"], json!("UsePopup"));
    }

    #[test]
    fn test_login_method_is_validated() {
        let config = match json!({
            "app_id": "1",
            "button_text": "Facebook",
            "client_secret": "s",
            "login_method": "UseMagic"
        }) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        assert!(facebook().validate(&config).has_errors());
    }
}
