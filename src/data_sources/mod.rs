//! Read only lookups of existing FusionAuth objects.

pub mod application_role;
mod lookup;
pub mod user;

use async_trait::async_trait;

use crate::{
    client::FusionAuthClient,
    error::ProviderError,
    resources::{application, form_field, idp, lambda, tenant, theme},
    schema::{Attribute, Schema, Validator},
    state::ResourceData,
};

pub use lookup::Lookup;

#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Finds the object described by `data` and fills in the remaining attributes.
    /// Finding nothing, or more than one object, is an error.
    async fn read(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError>;
}

fn application_schema() -> Schema {
    application::schema().computed_view("Looks up an application by name.", &["name"])
}

fn tenant_schema() -> Schema {
    tenant::schema().computed_view("Looks up a tenant by name.", &["name"])
}

fn theme_schema() -> Schema {
    theme::schema().computed_view("Looks up a theme by id or name.", &["theme_id", "name"])
}

fn form_field_schema() -> Schema {
    form_field::schema().computed_view(
        "Looks up a form field by id or name.",
        &["form_field_id", "name"],
    )
}

fn lambda_schema() -> Schema {
    let mut schema = lambda::schema().computed_view(
        "Looks up a lambda by id, or by name and type.",
        &["name", "type"],
    );
    schema.block.attributes.push(
        Attribute::string("id")
            .api("id")
            .computed()
            .validate(Validator::Uuid),
    );
    schema
}

fn idp_schema() -> Schema {
    Schema::new(
        "Looks up an identity provider of any type by name and type.",
        vec![
            Attribute::string("idp_id").api("id").computed_only(),
            Attribute::string("name").api("name").required(),
            Attribute::string("type")
                .api("type")
                .required()
                .one_of(idp::IDP_TYPES),
            Attribute::bool("debug").api("debug").computed_only(),
            Attribute::bool("enabled").api("enabled").computed_only(),
            Attribute::string("linking_strategy")
                .api("linkingStrategy")
                .computed_only(),
        ],
    )
}

pub fn all() -> Vec<Box<dyn DataSource>> {
    vec![
        Box::new(
            Lookup::new(
                "fusionauth_application",
                "/api/application",
                "application",
                "applications",
                application_schema,
            )
            .matching(&[("name", "name")]),
        ),
        Box::new(application_role::ApplicationRole),
        Box::new(
            Lookup::new(
                "fusionauth_form_field",
                "/api/form/field",
                "field",
                "fields",
                form_field_schema,
            )
            .by_id("form_field_id")
            .matching(&[("name", "name")]),
        ),
        Box::new(
            Lookup::new(
                "fusionauth_idp",
                idp::PATH,
                idp::ENVELOPE,
                "identityProviders",
                idp_schema,
            )
            .matching(&[("name", "name"), ("type", "type")]),
        ),
        Box::new(
            Lookup::new(
                "fusionauth_lambda",
                "/api/lambda",
                "lambda",
                "lambdas",
                lambda_schema,
            )
            .by_id("id")
            .matching(&[("name", "name"), ("type", "type")]),
        ),
        Box::new(
            Lookup::new(
                "fusionauth_tenant",
                "/api/tenant",
                "tenant",
                "tenants",
                tenant_schema,
            )
            .matching(&[("name", "name")]),
        ),
        Box::new(
            Lookup::new(
                "fusionauth_theme",
                "/api/theme",
                "theme",
                "themes",
                theme_schema,
            )
            .by_id("theme_id")
            .matching(&[("name", "name")]),
        ),
        Box::new(user::User),
    ]
}
