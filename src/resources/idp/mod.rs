//! Identity provider resources.
//!
//! Every variant is stored by FusionAuth under `/api/identity-provider` and told
//! apart only by its `type` field, which is checked on every response.

mod external_jwt;
mod openid;
mod saml;
mod social;

use serde_json::{Map, Value};

use super::{Hooks, Resource, RestResource};
use crate::{
    error::ProviderError,
    schema::{Attribute, Schema, Validator},
    state::ResourceData,
};

pub const PATH: &str = "/api/identity-provider";
pub const ENVELOPE: &str = "identityProvider";

pub const LINKING_STRATEGIES: &[&str] = &[
    "CreatePendingLink",
    "Disabled",
    "LinkAnonymously",
    "LinkByEmail",
    "LinkByEmailForExistingUser",
    "LinkByUsername",
    "LinkByUsernameForExistingUser",
    "Unsupported",
];

/// One `fusionauth_idp_*` resource type and the FusionAuth `type` it manages.
pub struct Variant {
    pub type_name: &'static str,
    pub idp_type: &'static str,
    pub schema: fn() -> Schema,
}

pub const VARIANTS: &[Variant] = &[
    Variant {
        type_name: "fusionauth_idp_apple",
        idp_type: "Apple",
        schema: social::apple,
    },
    Variant {
        type_name: "fusionauth_idp_epic_games",
        idp_type: "EpicGames",
        schema: social::epic_games,
    },
    Variant {
        type_name: "fusionauth_idp_external_jwt",
        idp_type: "ExternalJWT",
        schema: external_jwt::schema,
    },
    Variant {
        type_name: "fusionauth_idp_facebook",
        idp_type: "Facebook",
        schema: social::facebook,
    },
    Variant {
        type_name: "fusionauth_idp_google",
        idp_type: "Google",
        schema: social::google,
    },
    Variant {
        type_name: "fusionauth_idp_linkedin",
        idp_type: "LinkedIn",
        schema: social::linkedin,
    },
    Variant {
        type_name: "fusionauth_idp_open_id_connect",
        idp_type: "OpenIDConnect",
        schema: openid::schema,
    },
    Variant {
        type_name: "fusionauth_idp_saml_v2",
        idp_type: "SAMLv2",
        schema: saml::saml_v2,
    },
    Variant {
        type_name: "fusionauth_idp_saml_v2_idp_initiated",
        idp_type: "SAMLv2IdPInitiated",
        schema: saml::idp_initiated,
    },
    Variant {
        type_name: "fusionauth_idp_sony_psn",
        idp_type: "SonyPSN",
        schema: social::sony_psn,
    },
    Variant {
        type_name: "fusionauth_idp_steam",
        idp_type: "Steam",
        schema: social::steam,
    },
    Variant {
        type_name: "fusionauth_idp_twitch",
        idp_type: "Twitch",
        schema: social::twitch,
    },
    Variant {
        type_name: "fusionauth_idp_twitter",
        idp_type: "Twitter",
        schema: social::twitter,
    },
    Variant {
        type_name: "fusionauth_idp_xbox",
        idp_type: "Xbox",
        schema: social::xbox,
    },
];

/// Every FusionAuth identity provider type managed by this provider.
pub const IDP_TYPES: &[&str] = &[
    "Apple",
    "EpicGames",
    "ExternalJWT",
    "Facebook",
    "Google",
    "LinkedIn",
    "OpenIDConnect",
    "SAMLv2",
    "SAMLv2IdPInitiated",
    "SonyPSN",
    "Steam",
    "Twitch",
    "Twitter",
    "Xbox",
];

/// Attributes shared by every identity provider, followed by the variant's own.
///
/// `overrides` are the per application settings the variant allows, added to
/// each `application_configuration` entry next to `create_registration` and
/// `enabled`.
pub(crate) fn attributes(overrides: Vec<Attribute>, own: Vec<Attribute>) -> Vec<Attribute> {
    let mut application = vec![
        Attribute::string("application_id")
            .required()
            .validate(Validator::Uuid),
        Attribute::bool("create_registration")
            .api("createRegistration")
            .default(true),
        Attribute::bool("enabled").api("enabled").default(false),
    ];
    application.extend(overrides);

    let mut attributes = vec![
        Attribute::string("idp_id")
            .api("id")
            .computed()
            .force_new()
            .validate(Validator::Uuid)
            .describe("The Id to use for the new identity provider. If not specified a secure random UUID is generated."),
        Attribute::keyed("application_configuration", "application_id", application)
            .api("applicationConfiguration")
            .describe("Per application configuration, keyed by application id."),
        Attribute::bool("debug").api("debug").default(false),
        Attribute::bool("enabled").api("enabled").default(true),
        Attribute::string("lambda_reconcile_id")
            .api("lambdaConfiguration.reconcileId")
            .validate(Validator::Uuid),
        Attribute::string("linking_strategy")
            .api("linkingStrategy")
            .computed()
            .one_of(LINKING_STRATEGIES),
        Attribute::keyed(
            "tenant_configuration",
            "tenant_id",
            vec![
                Attribute::string("tenant_id")
                    .required()
                    .validate(Validator::Uuid),
                Attribute::bool("limit_user_link_count_enabled")
                    .api("limitUserLinkCount.enabled")
                    .default(false),
                Attribute::int("limit_user_link_count_maximum_links")
                    .api("limitUserLinkCount.maximumLinks")
                    .default(42),
            ],
        )
        .api("tenantConfiguration")
        .describe("Per tenant link limits, keyed by tenant id."),
    ];
    attributes.extend(own);
    attributes
}

/// Stamps requests with the variant's `type` and refuses objects of any other type.
pub struct IdpHooks {
    idp_type: &'static str,
}

impl Hooks for IdpHooks {
    fn before_send(
        &self,
        _data: &ResourceData,
        object: &mut Map<String, Value>,
        _body: &mut Map<String, Value>,
    ) -> Result<(), ProviderError> {
        object.insert("type".to_string(), Value::String(self.idp_type.to_string()));
        Ok(())
    }

    fn after_receive(&self, object: &Value, data: &ResourceData) -> Result<(), ProviderError> {
        let actual = object.get("type").and_then(Value::as_str).unwrap_or_default();
        if actual == self.idp_type {
            return Ok(());
        }
        let id = object
            .get("id")
            .and_then(Value::as_str)
            .or(data.id())
            .unwrap_or_default();
        Err(ProviderError::IdentityProviderType {
            id: id.to_string(),
            expected: self.idp_type,
            actual: actual.to_string(),
        })
    }
}

pub fn resource(variant: &Variant) -> RestResource<IdpHooks> {
    RestResource::new(variant.type_name, PATH, ENVELOPE, variant.schema)
        .id_attribute("idp_id")
        .hooks(IdpHooks {
            idp_type: variant.idp_type,
        })
}

pub fn all() -> Vec<Box<dyn Resource>> {
    VARIANTS
        .iter()
        .map(|variant| Box::new(resource(variant)) as Box<dyn Resource>)
        .collect()
}
