use crate::schema::{Attribute, Schema, Validator};

use super::RestResource;

pub const FIELD_TYPES: &[&str] = &["bool", "consent", "date", "email", "number", "string"];
pub const FIELD_CONTROLS: &[&str] = &[
    "checkbox", "number", "password", "radio", "select", "textarea", "text",
];

pub fn schema() -> Schema {
    Schema::new(
        "A custom form field used by registration and admin forms.",
        vec![
            Attribute::string("form_field_id")
                .api("id")
                .computed()
                .force_new()
                .validate(Validator::Uuid),
            Attribute::string("name").api("name").required(),
            Attribute::string("key")
                .api("key")
                .required()
                .force_new()
                .validate(Validator::Key)
                .describe("The user or registration property this field stores, e.g. user.data.favoriteColor."),
            Attribute::string("type")
                .api("type")
                .default("string")
                .force_new()
                .one_of(FIELD_TYPES),
            Attribute::string("control")
                .api("control")
                .computed()
                .one_of(FIELD_CONTROLS),
            Attribute::bool("confirm").api("confirm").default(false),
            Attribute::string("consent_id").api("consentId").validate(Validator::Uuid),
            Attribute::json("data").api("data"),
            Attribute::string("description").api("description"),
            Attribute::string_list("options").api("options"),
            Attribute::bool("required").api("required").default(false),
            Attribute::single(
                "validator",
                vec![
                    Attribute::bool("enabled").api("enabled").default(false),
                    Attribute::string("expression")
                        .api("expression")
                        .validate(Validator::Regex),
                ],
            )
            .api("validator")
            .computed(),
        ],
    )
}

pub fn resource() -> RestResource {
    RestResource::new("fusionauth_form_field", "/api/form/field", "field", schema)
        .id_attribute("form_field_id")
}
