use crate::schema::{Attribute, Schema, Validator};

use super::RestResource;

pub const GRANTS: &[&str] = &[
    "authorization_code",
    "device_code",
    "implicit",
    "password",
    "refresh_token",
    "urn:ietf:params:oauth:grant-type:jwt-bearer",
];

fn uuid(name: &'static str, api: &'static str) -> Attribute {
    Attribute::string(name).api(api).validate(Validator::Uuid)
}

fn oauth_configuration() -> Attribute {
    Attribute::single(
        "oauth_configuration",
        vec![
            Attribute::string_set("authorized_origin_urls").api("authorizedOriginURLs"),
            Attribute::string_set("authorized_redirect_urls").api("authorizedRedirectURLs"),
            Attribute::string("authorized_url_validation_policy")
                .api("authorizedURLValidationPolicy")
                .default("ExactMatch")
                .one_of(&["AllowWildcards", "ExactMatch"]),
            Attribute::string("client_authentication_policy")
                .api("clientAuthenticationPolicy")
                .computed()
                .one_of(&["Required", "NotRequired", "NotRequiredWhenUsingPKCE"]),
            Attribute::string("client_id").api("clientId").computed_only(),
            Attribute::string("client_secret")
                .api("clientSecret")
                .computed()
                .sensitive(),
            Attribute::bool("debug").api("debug").default(false),
            Attribute::string("device_verification_url")
                .api("deviceVerificationURL")
                .validate(Validator::Url),
            Attribute::string_set("enabled_grants")
                .api("enabledGrants")
                .one_of(GRANTS),
            Attribute::bool("generate_refresh_tokens")
                .api("generateRefreshTokens")
                .default(false),
            Attribute::string("logout_behavior")
                .api("logoutBehavior")
                .default("AllApplications")
                .one_of(&["RedirectOnly", "AllApplications"]),
            Attribute::string("logout_url").api("logoutURL"),
            Attribute::string("proof_key_for_code_exchange_policy")
                .api("proofKeyForCodeExchangePolicy")
                .computed()
                .one_of(&[
                    "Required",
                    "NotRequired",
                    "NotRequiredWhenUsingClientAuthentication",
                ]),
            Attribute::bool("require_client_authentication")
                .api("requireClientAuthentication")
                .computed()
                .deprecated("Use client_authentication_policy instead"),
            Attribute::bool("require_registration")
                .api("requireRegistration")
                .default(false),
        ],
    )
    .api("oauthConfiguration")
    .computed()
}

fn registration_configuration() -> Attribute {
    let requirable = |name: &'static str, api: &'static str| {
        Attribute::single(
            name,
            vec![
                Attribute::bool("enabled").api("enabled").default(false),
                Attribute::bool("required").api("required").default(false),
            ],
        )
        .api(api)
        .computed()
    };
    Attribute::single(
        "registration_configuration",
        vec![
            requirable("birth_date", "birthDate"),
            Attribute::bool("confirm_password")
                .api("confirmPassword")
                .default(false),
            Attribute::bool("enabled").api("enabled").default(false),
            requirable("first_name", "firstName"),
            uuid("form_id", "formId"),
            requirable("full_name", "fullName"),
            requirable("last_name", "lastName"),
            Attribute::string("login_id_type")
                .api("loginIdType")
                .default("email")
                .one_of(&["email", "username"]),
            requirable("middle_name", "middleName"),
            requirable("mobile_phone", "mobilePhone"),
            requirable("preferred_languages", "preferredLanguages"),
            Attribute::string("type")
                .api("type")
                .default("basic")
                .one_of(&["basic", "advanced"]),
        ],
    )
    .api("registrationConfiguration")
    .computed()
}

fn samlv2_configuration() -> Attribute {
    Attribute::single(
        "samlv2_configuration",
        vec![
            Attribute::string("audience").api("audience"),
            Attribute::string_list("authorized_redirect_urls").api("authorizedRedirectURLs"),
            Attribute::string("callback_url")
                .api("callbackURL")
                .deprecated("Use authorized_redirect_urls instead"),
            Attribute::bool("debug").api("debug").default(false),
            uuid("default_verification_key_id", "defaultVerificationKeyId"),
            Attribute::bool("enabled").api("enabled").default(false),
            Attribute::string("issuer").api("issuer"),
            uuid("key_id", "keyId"),
            Attribute::string("logout_url").api("logoutURL"),
            Attribute::bool("required_signed_requests")
                .api("requireSignedRequests")
                .default(false),
            Attribute::string("xml_signature_canonicalization_method")
                .api("xmlSignatureC14nMethod")
                .computed()
                .one_of(&[
                    "exclusive",
                    "exclusive_with_comments",
                    "inclusive",
                    "inclusive_with_comments",
                ]),
            Attribute::string("xml_signature_location")
                .api("xmlSignatureLocation")
                .computed()
                .one_of(&["Assertion", "Response"]),
        ],
    )
    .api("samlv2Configuration")
    .computed()
}

pub fn schema() -> Schema {
    Schema::new(
        "A FusionAuth application: the unit users register with and authenticate against.",
        vec![
            Attribute::string("application_id")
                .api("id")
                .computed()
                .force_new()
                .validate(Validator::Uuid),
            Attribute::string("tenant_id")
                .api("tenantId")
                .required()
                .force_new()
                .validate(Validator::Uuid),
            Attribute::string("name").api("name").required(),
            Attribute::bool("authentication_token_configuration_enabled")
                .api("authenticationTokenConfiguration.enabled")
                .default(false),
            Attribute::json("data").api("data"),
            Attribute::single(
                "form_configuration",
                vec![
                    uuid("admin_registration_form_id", "adminRegistrationFormId").computed(),
                    uuid("self_service_form_id", "selfServiceFormId"),
                ],
            )
            .api("formConfiguration")
            .computed(),
            Attribute::single(
                "jwt_configuration",
                vec![
                    uuid("access_token_id", "accessTokenKeyId"),
                    Attribute::bool("enabled").api("enabled").default(false),
                    uuid("id_token_key_id", "idTokenKeyId"),
                    Attribute::int("refresh_token_ttl_minutes")
                        .api("refreshTokenTimeToLiveInMinutes")
                        .default(43200),
                    Attribute::int("ttl_seconds")
                        .api("timeToLiveInSeconds")
                        .default(3600)
                        .validate(Validator::IntBetween(1, i64::from(i32::MAX))),
                    Attribute::string("refresh_token_expiration_policy")
                        .api("refreshTokenExpirationPolicy")
                        .computed()
                        .one_of(&["Fixed", "SlidingWindow"]),
                    Attribute::string("refresh_token_usage_policy")
                        .api("refreshTokenUsagePolicy")
                        .computed()
                        .one_of(&["Reusable", "OneTimeUse"]),
                ],
            )
            .api("jwtConfiguration")
            .computed(),
            Attribute::single(
                "lambda_configuration",
                vec![
                    uuid("access_token_populate_id", "accessTokenPopulateId"),
                    uuid("id_token_populate_id", "idTokenPopulateId"),
                    uuid("samlv2_populate_id", "samlv2PopulateId"),
                    uuid("userinfo_populate_id", "userinfoPopulateId"),
                ],
            )
            .api("lambdaConfiguration")
            .computed(),
            Attribute::single(
                "login_configuration",
                vec![
                    Attribute::bool("allow_token_refresh")
                        .api("allowTokenRefresh")
                        .default(false),
                    Attribute::bool("generate_refresh_tokens")
                        .api("generateRefreshTokens")
                        .default(false),
                    Attribute::bool("require_authentication")
                        .api("requireAuthentication")
                        .default(true),
                ],
            )
            .api("loginConfiguration")
            .computed(),
            Attribute::single(
                "multi_factor_configuration",
                vec![
                    uuid("email_template_id", "email.templateId"),
                    uuid("sms_template_id", "sms.templateId"),
                    Attribute::string("login_policy")
                        .api("loginPolicy")
                        .computed()
                        .one_of(&["Enabled", "Disabled", "Required"]),
                    Attribute::string("trust_policy")
                        .api("trustPolicy")
                        .computed()
                        .one_of(&["Any", "This", "None"]),
                ],
            )
            .api("multiFactorConfiguration")
            .computed(),
            oauth_configuration(),
            registration_configuration(),
            Attribute::single(
                "registration_delete_policy",
                vec![
                    Attribute::bool("unverified_enabled")
                        .api("unverified.enabled")
                        .default(false),
                    Attribute::int("unverified_number_of_days_to_retain")
                        .api("unverified.numberOfDaysToRetain")
                        .default(0),
                ],
            )
            .api("registrationDeletePolicy")
            .computed(),
            samlv2_configuration(),
            uuid("verification_email_template_id", "verificationEmailTemplateId"),
            Attribute::string("verification_strategy")
                .api("verificationStrategy")
                .computed()
                .one_of(&["ClickableLink", "FormField"]),
            Attribute::bool("verify_registration")
                .api("verifyRegistration")
                .default(false),
        ],
    )
}

pub fn resource() -> RestResource {
    RestResource::new("fusionauth_application", "/api/application", "application", schema)
        .id_attribute("application_id")
        .tenant_attribute("tenant_id")
        .delete_query(&[("hardDelete", "true")])
}
