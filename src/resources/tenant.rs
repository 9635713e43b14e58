use serde_json::{Map, Value};

use crate::{
    error::ProviderError,
    schema::{Attribute, Schema, Validator},
    state::ResourceData,
};

use super::{Hooks, RestResource};

pub const EVENTS: &[&str] = &[
    "jwt.public-key.update",
    "jwt.refresh",
    "jwt.refresh-token.revoke",
    "user.action",
    "user.bulk.create",
    "user.create",
    "user.create.complete",
    "user.deactivate",
    "user.delete",
    "user.delete.complete",
    "user.email.update",
    "user.email.verified",
    "user.identity-provider.link",
    "user.identity-provider.unlink",
    "user.login.failed",
    "user.login.id-duplicate-on-create",
    "user.login.id-duplicate-on-update",
    "user.login.new-device",
    "user.login.success",
    "user.login.suspicious",
    "user.loginId.duplicate.create",
    "user.loginId.duplicate.update",
    "user.password.breach",
    "user.password.reset.send",
    "user.password.reset.start",
    "user.password.reset.success",
    "user.password.update",
    "user.reactivate",
    "user.registration.create",
    "user.registration.create.complete",
    "user.registration.delete",
    "user.registration.delete.complete",
    "user.registration.update",
    "user.registration.update.complete",
    "user.registration.verified",
    "user.two-factor.method.add",
    "user.two-factor.method.remove",
    "user.update",
    "user.update.complete",
];

const TIME_UNITS: &[&str] = &["MINUTES", "HOURS", "DAYS", "WEEKS", "MONTHS", "YEARS"];

fn uuid(name: &'static str, api: &'static str) -> Attribute {
    Attribute::string(name).api(api).validate(Validator::Uuid)
}

fn ttl(name: &'static str, api: &'static str) -> Attribute {
    Attribute::int(name)
        .api(api)
        .computed()
        .validate(Validator::IntBetween(1, i64::from(i32::MAX)))
}

fn generator(name: &'static str, api: &'static str) -> Attribute {
    Attribute::single(
        name,
        vec![
            Attribute::int("length").api("length").computed(),
            Attribute::string("type")
                .api("type")
                .computed()
                .one_of(&["randomAlpha", "randomAlphaNumeric", "randomBytes", "randomDigits"]),
        ],
    )
    .api(api)
    .computed()
}

fn email_configuration() -> Attribute {
    Attribute::single(
        "email_configuration",
        vec![
            Attribute::string("default_from_email")
                .api("defaultFromEmail")
                .default("change-me@example.com"),
            Attribute::string("default_from_name").api("defaultFromName"),
            uuid("email_update_email_template_id", "emailUpdateEmailTemplateId"),
            uuid("email_verified_email_template_id", "emailVerifiedEmailTemplateId"),
            uuid("forgot_password_email_template_id", "forgotPasswordEmailTemplateId"),
            Attribute::string("host").api("host").default("localhost"),
            Attribute::bool("implicit_email_verification_allowed")
                .api("implicitEmailVerificationAllowed")
                .default(true),
            uuid("login_id_in_use_on_create_email_template_id", "loginIdInUseOnCreateEmailTemplateId"),
            uuid("login_id_in_use_on_update_email_template_id", "loginIdInUseOnUpdateEmailTemplateId"),
            uuid("login_new_device_email_template_id", "loginNewDeviceEmailTemplateId"),
            uuid("login_suspicious_email_template_id", "loginSuspiciousEmailTemplateId"),
            Attribute::string("password")
                .api("password")
                .sensitive()
                .write_only(),
            uuid("passwordless_email_template_id", "passwordlessEmailTemplateId"),
            uuid("password_reset_success_email_template_id", "passwordResetSuccessEmailTemplateId"),
            uuid("password_update_email_template_id", "passwordUpdateEmailTemplateId"),
            Attribute::int("port")
                .api("port")
                .default(25)
                .validate(Validator::IntBetween(1, 65535)),
            Attribute::string("properties").api("properties"),
            Attribute::string("security")
                .api("security")
                .default("NONE")
                .one_of(&["NONE", "SSL", "TLS"]),
            uuid("set_password_email_template_id", "setPasswordEmailTemplateId"),
            uuid("two_factor_method_add_email_template_id", "twoFactorMethodAddEmailTemplateId"),
            uuid("two_factor_method_remove_email_template_id", "twoFactorMethodRemoveEmailTemplateId"),
            Attribute::string("username").api("username"),
            uuid("verification_email_template_id", "verificationEmailTemplateId"),
            Attribute::string("verification_strategy")
                .api("verificationStrategy")
                .computed()
                .one_of(&["ClickableLink", "FormField"]),
            Attribute::bool("verify_email").api("verifyEmail").default(false),
            Attribute::bool("verify_email_when_changed")
                .api("verifyEmailWhenChanged")
                .default(false),
        ],
    )
    .api("emailConfiguration")
    .required()
}

fn external_identifier_configuration() -> Attribute {
    Attribute::single(
        "external_identifier_configuration",
        vec![
            ttl("authorization_grant_id_time_to_live_in_seconds", "authorizationGrantIdTimeToLiveInSeconds"),
            generator("change_password_id_generator", "changePasswordIdGenerator"),
            ttl("change_password_id_time_to_live_in_seconds", "changePasswordIdTimeToLiveInSeconds"),
            ttl("device_code_time_to_live_in_seconds", "deviceCodeTimeToLiveInSeconds"),
            generator("device_user_code_id_generator", "deviceUserCodeIdGenerator"),
            generator("email_verification_id_generator", "emailVerificationIdGenerator"),
            ttl("email_verification_id_time_to_live_in_seconds", "emailVerificationIdTimeToLiveInSeconds"),
            generator("email_verification_one_time_code_generator", "emailVerificationOneTimeCodeGenerator"),
            ttl("external_authentication_id_time_to_live_in_seconds", "externalAuthenticationIdTimeToLiveInSeconds"),
            ttl("one_time_password_time_to_live_in_seconds", "oneTimePasswordTimeToLiveInSeconds"),
            generator("passwordless_login_generator", "passwordlessLoginGenerator"),
            ttl("passwordless_login_time_to_live_in_seconds", "passwordlessLoginTimeToLiveInSeconds"),
            generator("registration_verification_id_generator", "registrationVerificationIdGenerator"),
            ttl("registration_verification_id_time_to_live_in_seconds", "registrationVerificationIdTimeToLiveInSeconds"),
            generator("registration_verification_one_time_code_generator", "registrationVerificationOneTimeCodeGenerator"),
            ttl("saml_v2_authn_request_id_ttl_seconds", "samlv2AuthNRequestIdTimeToLiveInSeconds"),
            generator("setup_password_id_generator", "setupPasswordIdGenerator"),
            ttl("setup_password_id_time_to_live_in_seconds", "setupPasswordIdTimeToLiveInSeconds"),
            ttl("trust_token_time_to_live_in_seconds", "trustTokenTimeToLiveInSeconds"),
            ttl("two_factor_id_time_to_live_in_seconds", "twoFactorIdTimeToLiveInSeconds"),
            generator("two_factor_one_time_code_id_generator", "twoFactorOneTimeCodeIdGenerator"),
            ttl("two_factor_trust_id_time_to_live_in_seconds", "twoFactorTrustIdTimeToLiveInSeconds"),
        ],
    )
    .api("externalIdentifierConfiguration")
    .computed()
}

fn jwt_configuration() -> Attribute {
    Attribute::single(
        "jwt_configuration",
        vec![
            uuid("access_token_key_id", "accessTokenKeyId").computed(),
            uuid("id_token_key_id", "idTokenKeyId").computed(),
            Attribute::string("refresh_token_expiration_policy")
                .api("refreshTokenExpirationPolicy")
                .default("Fixed")
                .one_of(&["Fixed", "SlidingWindow"]),
            Attribute::bool("refresh_token_revocation_policy_on_login_prevented")
                .api("refreshTokenRevocationPolicy.onLoginPrevented")
                .default(true),
            Attribute::bool("refresh_token_revocation_policy_on_password_change")
                .api("refreshTokenRevocationPolicy.onPasswordChanged")
                .default(true),
            Attribute::int("refresh_token_time_to_live_in_minutes")
                .api("refreshTokenTimeToLiveInMinutes")
                .default(43200),
            Attribute::string("refresh_token_usage_policy")
                .api("refreshTokenUsagePolicy")
                .default("Reusable")
                .one_of(&["Reusable", "OneTimeUse"]),
            Attribute::int("time_to_live_in_seconds")
                .api("timeToLiveInSeconds")
                .default(3600),
        ],
    )
    .api("jwtConfiguration")
    .computed()
}

fn multi_factor_configuration() -> Attribute {
    Attribute::single(
        "multi_factor_configuration",
        vec![
            Attribute::bool("authenticator_enabled")
                .api("authenticator.enabled")
                .default(true),
            Attribute::string("authenticator_algorithm")
                .api("authenticator.algorithm")
                .computed()
                .one_of(&["HmacSHA1", "HmacSHA256", "HmacSHA512"]),
            Attribute::int("authenticator_code_length")
                .api("authenticator.codeLength")
                .computed(),
            Attribute::int("authenticator_time_step")
                .api("authenticator.timeStep")
                .computed(),
            Attribute::bool("email_enabled").api("email.enabled").default(false),
            uuid("email_template_id", "email.templateId"),
            Attribute::string("login_policy")
                .api("loginPolicy")
                .default("Enabled")
                .one_of(&["Enabled", "Disabled", "Required"]),
            Attribute::bool("sms_enabled").api("sms.enabled").default(false),
            uuid("sms_messenger_id", "sms.messengerId"),
            uuid("sms_template_id", "sms.templateId"),
        ],
    )
    .api("multiFactorConfiguration")
    .computed()
}

fn password_validation_rules() -> Attribute {
    Attribute::single(
        "password_validation_rules",
        vec![
            Attribute::single(
                "breach_detection",
                vec![
                    Attribute::bool("enabled").api("enabled").default(false),
                    Attribute::string("match_mode")
                        .api("matchMode")
                        .computed()
                        .one_of(&["Low", "Medium", "High"]),
                    uuid("notify_user_email_template_id", "notifyUserEmailTemplateId"),
                    Attribute::string("on_login")
                        .api("onLogin")
                        .computed()
                        .one_of(&[
                            "Off",
                            "RecordOnly",
                            "NotifyUser",
                            "RequireChange",
                        ]),
                ],
            )
            .api("breachDetection")
            .computed(),
            Attribute::int("max_length")
                .api("maxLength")
                .default(256)
                .validate(Validator::IntBetween(1, 256)),
            Attribute::int("min_length")
                .api("minLength")
                .default(8)
                .validate(Validator::IntBetween(1, 256)),
            Attribute::single(
                "remember_previous_passwords",
                vec![
                    Attribute::int("count").api("count").default(1),
                    Attribute::bool("enabled").api("enabled").default(false),
                ],
            )
            .api("rememberPreviousPasswords")
            .computed(),
            Attribute::bool("required_mixed_case")
                .api("requireMixedCase")
                .default(false),
            Attribute::bool("require_non_alpha")
                .api("requireNonAlpha")
                .default(false),
            Attribute::bool("require_number").api("requireNumber").default(false),
            Attribute::bool("validate_on_login")
                .api("validateOnLogin")
                .default(false),
        ],
    )
    .api("passwordValidationRules")
    .computed()
}

pub fn schema() -> Schema {
    Schema::new(
        "A FusionAuth tenant, the isolation boundary for users, applications and most configuration.",
        vec![
            Attribute::string("tenant_id")
                .api("id")
                .computed()
                .force_new()
                .validate(Validator::Uuid),
            Attribute::string("name").api("name").required(),
            Attribute::string("source_tenant_id")
                .force_new()
                .validate(Validator::Uuid)
                .describe("The tenant to copy configuration from when creating this tenant."),
            Attribute::json("data").api("data"),
            email_configuration(),
            Attribute::keyed(
                "event_configuration",
                "event",
                vec![
                    Attribute::string("event").required().one_of(EVENTS),
                    Attribute::bool("enabled").api("enabled").default(false),
                    Attribute::string("transaction_type")
                        .api("transactionType")
                        .default("None")
                        .one_of(&[
                            "None",
                            "Any",
                            "SimpleMajority",
                            "SuperMajority",
                            "AbsoluteMajority",
                        ]),
                ],
            )
            .api("eventConfiguration.events")
            .computed(),
            external_identifier_configuration(),
            Attribute::single(
                "failed_authentication_configuration",
                vec![
                    Attribute::int("action_duration").api("actionDuration").default(3),
                    Attribute::string("action_duration_unit")
                        .api("actionDurationUnit")
                        .default("MINUTES")
                        .one_of(TIME_UNITS),
                    Attribute::int("reset_count_in_seconds")
                        .api("resetCountInSeconds")
                        .default(60),
                    Attribute::int("too_many_attempts")
                        .api("tooManyAttempts")
                        .default(5),
                    uuid("user_action_id", "userActionId"),
                ],
            )
            .api("failedAuthenticationConfiguration")
            .computed(),
            Attribute::single(
                "family_configuration",
                vec![
                    Attribute::bool("allow_child_registrations")
                        .api("allowChildRegistrations")
                        .default(true),
                    uuid("confirm_child_email_template_id", "confirmChildEmailTemplateId"),
                    Attribute::bool("delete_orphaned_accounts")
                        .api("deleteOrphanedAccounts")
                        .default(false),
                    Attribute::int("delete_orphaned_accounts_days")
                        .api("deleteOrphanedAccountsDays")
                        .default(30),
                    Attribute::bool("enabled").api("enabled").default(false),
                    uuid("family_request_email_template_id", "familyRequestEmailTemplateId"),
                    Attribute::int("maximum_child_age")
                        .api("maximumChildAge")
                        .default(12),
                    Attribute::int("minimum_owner_age")
                        .api("minimumOwnerAge")
                        .default(21),
                    Attribute::bool("parent_email_required")
                        .api("parentEmailRequired")
                        .default(false),
                    uuid("parent_registration_email_template_id", "parentRegistrationEmailTemplateId"),
                ],
            )
            .api("familyConfiguration")
            .computed(),
            Attribute::single(
                "form_configuration",
                vec![uuid("admin_user_form_id", "adminUserFormId").computed()],
            )
            .api("formConfiguration")
            .computed(),
            Attribute::int("http_session_max_inactive_interval")
                .api("httpSessionMaxInactiveInterval")
                .default(3600),
            Attribute::string("issuer")
                .api("issuer")
                .default("acme.com"),
            jwt_configuration(),
            Attribute::single(
                "login_configuration",
                vec![Attribute::bool("require_authentication")
                    .api("requireAuthentication")
                    .default(true)],
            )
            .api("loginConfiguration")
            .computed(),
            Attribute::string("logout_url").api("logoutURL"),
            Attribute::single(
                "maximum_password_age",
                vec![
                    Attribute::int("days").api("days").default(180),
                    Attribute::bool("enabled").api("enabled").default(false),
                ],
            )
            .api("maximumPasswordAge")
            .computed(),
            Attribute::single(
                "minimum_password_age",
                vec![
                    Attribute::bool("enabled").api("enabled").default(false),
                    Attribute::int("seconds").api("seconds").default(30),
                ],
            )
            .api("minimumPasswordAge")
            .computed(),
            multi_factor_configuration(),
            Attribute::single(
                "password_encryption_configuration",
                vec![
                    Attribute::string("encryption_scheme")
                        .api("encryptionScheme")
                        .default("salted-pbkdf2-hmac-sha256"),
                    Attribute::int("encryption_scheme_factor")
                        .api("encryptionSchemeFactor")
                        .default(24000),
                    Attribute::bool("modify_encryption_scheme_on_login")
                        .api("modifyEncryptionSchemeOnLogin")
                        .default(false),
                ],
            )
            .api("passwordEncryptionConfiguration")
            .computed(),
            password_validation_rules(),
            Attribute::single(
                "registration_configuration",
                vec![Attribute::string_set("blocked_domains").api("blockedDomains")],
            )
            .api("registrationConfiguration")
            .computed(),
            uuid("theme_id", "themeId").computed(),
            Attribute::single(
                "user_delete_policy",
                vec![
                    Attribute::bool("unverified_enabled")
                        .api("unverified.enabled")
                        .default(false),
                    Attribute::int("unverified_number_of_days_to_retain")
                        .api("unverified.numberOfDaysToRetain")
                        .default(120),
                ],
            )
            .api("userDeletePolicy")
            .computed(),
            Attribute::single(
                "username_configuration",
                vec![
                    Attribute::bool("unique_enabled")
                        .api("unique.enabled")
                        .default(false),
                    Attribute::int("unique_number_of_digits")
                        .api("unique.numberOfDigits")
                        .default(5),
                    Attribute::string("unique_separator")
                        .api("unique.separator")
                        .default("#"),
                    Attribute::string("unique_strategy")
                        .api("unique.strategy")
                        .default("OnCollision")
                        .one_of(&["Always", "OnCollision"]),
                ],
            )
            .api("usernameConfiguration")
            .computed(),
            Attribute::string_set("webhook_ids")
                .describe("Webhooks to enable for this tenant, sent next to the tenant object."),
        ],
    )
}

pub struct TenantHooks;

impl Hooks for TenantHooks {
    fn before_send(
        &self,
        data: &ResourceData,
        _object: &mut Map<String, Value>,
        body: &mut Map<String, Value>,
    ) -> Result<(), ProviderError> {
        if let Some(source) = data.get_str("source_tenant_id") {
            body.insert("sourceTenantId".to_string(), Value::String(source.to_string()));
        }
        if let Some(webhooks) = data.get("webhook_ids") {
            body.insert("webhookIds".to_string(), webhooks.clone());
        }
        Ok(())
    }
}

pub fn resource() -> RestResource<TenantHooks> {
    RestResource::new("fusionauth_tenant", "/api/tenant", "tenant", schema)
        .id_attribute("tenant_id")
        .hooks(TenantHooks)
}
