use async_trait::async_trait;

use super::{lookup::apply_object, DataSource};
use crate::{
    client::{unwrap_envelope, ApiPath, FusionAuthClient},
    error::ProviderError,
    resources::application_role::{self, find_role},
    schema::Schema,
    state::ResourceData,
};

fn schema() -> Schema {
    application_role::schema().computed_view(
        "Looks up a role of an application by name.",
        &["application_id", "name"],
    )
}

/// `fusionauth_application_role` data source.
pub struct ApplicationRole;

#[async_trait]
impl DataSource for ApplicationRole {
    fn type_name(&self) -> &'static str {
        "fusionauth_application_role"
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let application_id = data.require_str("application_id")?.to_string();
        let name = data.require_str("name")?.to_string();
        let lookup = format!("name {name:?} in application {application_id}");
        let application = match client
            .get(
                ApiPath::new("/api/application").segment(application_id.as_str()),
                None,
            )
            .await
        {
            Ok(response) => unwrap_envelope(response, "application")?,
            Err(e) if e.is_not_found() => {
                return Err(ProviderError::NotFound {
                    kind: "application",
                    lookup: format!("id {application_id}"),
                })
            }
            Err(e) => return Err(e),
        };
        let role = find_role(&application, "name", &name)
            .ok_or(ProviderError::NotFound { kind: "role", lookup })?;
        apply_object(&schema(), data, role);
        Ok(())
    }
}
