use crate::schema::{Attribute, Schema, Validator};

use super::attributes;

pub fn schema() -> Schema {
    Schema::new(
        "Trusts JWTs issued by a third party, reconciling them into FusionAuth users.",
        attributes(
            Vec::new(),
            vec![
                Attribute::string("name").api("name").required(),
                Attribute::string_map("claim_map")
                    .api("claimMap")
                    .describe("Maps claims of the incoming JWT to FusionAuth user attributes."),
                Attribute::string("default_key_id")
                    .api("defaultKeyId")
                    .validate(Validator::Uuid),
                Attribute::string_set("domains").api("domains"),
                Attribute::string("header_key_parameter")
                    .api("headerKeyParameter")
                    .required()
                    .describe("Name of the JWT header that identifies the signing key, usually kid."),
                Attribute::string("oauth2_authorization_endpoint")
                    .api("oauth2.authorization_endpoint")
                    .validate(Validator::Url),
                Attribute::string("oauth2_token_endpoint")
                    .api("oauth2.token_endpoint")
                    .validate(Validator::Url),
                Attribute::string("unique_identity_claim")
                    .api("uniqueIdentityClaim")
                    .computed(),
            ],
        ),
    )
}
