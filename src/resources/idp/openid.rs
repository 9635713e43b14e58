use crate::schema::{Attribute, Schema, Validator};

use super::attributes;

const CLIENT_AUTHENTICATION_METHODS: &[&str] =
    &["none", "client_secret_basic", "client_secret_post"];

pub fn schema() -> Schema {
    Schema::new(
        "A generic OpenID Connect identity provider.",
        attributes(
            vec![
                Attribute::string("button_image_url")
                    .api("buttonImageURL")
                    .validate(Validator::Url),
                Attribute::string("button_text").api("buttonText"),
                Attribute::string("oauth2_client_id").api("oauth2.client_id"),
                Attribute::string("oauth2_client_secret")
                    .api("oauth2.client_secret")
                    .sensitive(),
                Attribute::string("oauth2_scope").api("oauth2.scope"),
            ],
            vec![
                Attribute::string("name").api("name").required(),
                Attribute::string("button_image_url")
                    .api("buttonImageURL")
                    .validate(Validator::Url),
                Attribute::string("button_text").api("buttonText").required(),
                Attribute::string_set("domains")
                    .api("domains")
                    .describe("Email domains routed to this provider by managed domain login."),
                Attribute::string("oauth2_authorization_endpoint")
                    .api("oauth2.authorization_endpoint")
                    .validate(Validator::Url),
                Attribute::string("oauth2_client_authentication_method")
                    .api("oauth2.clientAuthenticationMethod")
                    .computed()
                    .one_of(CLIENT_AUTHENTICATION_METHODS),
                Attribute::string("oauth2_client_id")
                    .api("oauth2.client_id")
                    .required(),
                Attribute::string("oauth2_client_secret")
                    .api("oauth2.client_secret")
                    .sensitive(),
                Attribute::string("oauth2_email_claim")
                    .api("oauth2.emailClaim")
                    .default("email"),
                Attribute::string("oauth2_issuer")
                    .api("oauth2.issuer")
                    .describe("When set, endpoints are discovered from the issuer's well-known configuration."),
                Attribute::string("oauth2_scope").api("oauth2.scope"),
                Attribute::string("oauth2_token_endpoint")
                    .api("oauth2.token_endpoint")
                    .validate(Validator::Url),
                Attribute::string("oauth2_unique_id_claim")
                    .api("oauth2.uniqueIdClaim")
                    .default("sub"),
                Attribute::string("oauth2_user_info_endpoint")
                    .api("oauth2.userinfo_endpoint")
                    .validate(Validator::Url),
                Attribute::string("oauth2_username_claim")
                    .api("oauth2.usernameClaim")
                    .default("preferred_username"),
                Attribute::bool("post_request")
                    .api("postRequest")
                    .default(false),
            ],
        ),
    )
}
