use crate::schema::{Attribute, Schema, Validator};

use super::attributes;

const CANONICALIZATION_METHODS: &[&str] = &[
    "exclusive",
    "exclusive_with_comments",
    "inclusive",
    "inclusive_with_comments",
];

/// Claims shared by SP and IdP initiated SAML providers.
fn assertion_attributes() -> Vec<Attribute> {
    vec![
        Attribute::string("name").api("name").required(),
        Attribute::string("email_claim").api("emailClaim"),
        Attribute::string("key_id")
            .api("keyId")
            .required()
            .validate(Validator::Uuid)
            .describe("Key in Key Master used to verify the IdP's signatures."),
        Attribute::string("unique_id_claim").api("uniqueIdClaim"),
        Attribute::bool("use_name_for_email")
            .api("useNameIdForEmail")
            .default(false),
        Attribute::string("username_claim").api("usernameClaim"),
    ]
}

pub fn saml_v2() -> Schema {
    let mut own = assertion_attributes();
    own.extend([
        Attribute::string("button_image_url")
            .api("buttonImageURL")
            .validate(Validator::Url),
        Attribute::string("button_text").api("buttonText").required(),
        Attribute::string_set("domains").api("domains"),
        Attribute::string("idp_endpoint")
            .api("idpEndpoint")
            .validate(Validator::Url),
        Attribute::string("name_id_format")
            .api("nameIdFormat")
            .default("urn:oasis:names:tc:SAML:2.0:nameid-format:persistent"),
        Attribute::bool("post_request").api("postRequest").default(false),
        Attribute::string("request_signing_key")
            .api("requestSigningKeyId")
            .validate(Validator::Uuid),
        Attribute::bool("sign_request").api("signRequest").default(false),
        Attribute::string("xml_signature_canonicalization_method")
            .api("xmlSignatureC14nMethod")
            .computed()
            .one_of(CANONICALIZATION_METHODS),
    ]);
    Schema::new(
        "A SAML v2 identity provider.",
        attributes(
            vec![
                Attribute::string("button_image_url")
                    .api("buttonImageURL")
                    .validate(Validator::Url),
                Attribute::string("button_text").api("buttonText"),
            ],
            own,
        ),
    )
}

pub fn idp_initiated() -> Schema {
    let mut own = assertion_attributes();
    own.push(
        Attribute::string("issuer")
            .api("issuer")
            .required()
            .describe("EntityId of the IdP, matched against the Issuer of incoming responses."),
    );
    Schema::new(
        "A SAML v2 identity provider that starts logins itself.",
        attributes(Vec::new(), own),
    )
}
