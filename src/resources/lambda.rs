use crate::schema::{Attribute, Schema, Validator};

use super::RestResource;

pub const LAMBDA_TYPES: &[&str] = &[
    "AppleReconcile",
    "ClientCredentialsJWTPopulate",
    "EpicGamesReconcile",
    "ExternalJWTReconcile",
    "FacebookReconcile",
    "GoogleReconcile",
    "HYPRReconcile",
    "JWTPopulate",
    "LDAPConnectorReconcile",
    "LinkedInReconcile",
    "LoginValidation",
    "NintendoReconcile",
    "OpenIDReconcile",
    "SAMLv2Populate",
    "SAMLv2Reconcile",
    "SCIMServerGroupRequestConverter",
    "SCIMServerGroupResponseConverter",
    "SCIMServerUserRequestConverter",
    "SCIMServerUserResponseConverter",
    "SelfServiceRegistrationValidation",
    "SonyPSNReconcile",
    "SteamReconcile",
    "TwitchReconcile",
    "TwitterReconcile",
    "UserInfoPopulate",
    "XboxReconcile",
];

pub fn schema() -> Schema {
    Schema::new(
        "Lambdas are user defined JavaScript functions executed at runtime to customise FusionAuth behaviour.",
        vec![
            Attribute::string("lambda_id")
                .api("id")
                .computed()
                .force_new()
                .validate(Validator::Uuid)
                .describe("The Id to use for the new lambda. If not specified a secure random UUID is generated."),
            Attribute::string("name").api("name").required(),
            Attribute::string("body")
                .api("body")
                .required()
                .describe("The lambda function body, a JavaScript function."),
            Attribute::bool("debug").api("debug").default(false),
            Attribute::bool("enabled")
                .api("enabled")
                .default(true)
                .deprecated("Lambdas are always enabled in current FusionAuth versions"),
            Attribute::string("engine_type")
                .api("engineType")
                .computed()
                .one_of(&["GraalJS", "Nashorn"]),
            Attribute::string("type")
                .api("type")
                .required()
                .force_new()
                .one_of(LAMBDA_TYPES),
        ],
    )
}

pub fn resource() -> RestResource {
    RestResource::new("fusionauth_lambda", "/api/lambda", "lambda", schema).id_attribute("lambda_id")
}
