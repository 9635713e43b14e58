use async_trait::async_trait;

use super::{lookup::apply_object, DataSource};
use crate::{
    client::{unwrap_envelope, ApiPath, FusionAuthClient},
    error::ProviderError,
    resources::user,
    schema::Schema,
    state::ResourceData,
};

/// Resource attributes that only steer requests and have no meaning on lookup.
const REQUEST_ONLY: &[&str] = &[
    "application_id",
    "password",
    "send_set_password_email",
    "skip_verification",
];

fn schema() -> Schema {
    let mut schema = user::schema().computed_view(
        "Looks up a user by id, username or email.",
        &["user_id", "username", "email", "tenant_id"],
    );
    schema
        .block
        .attributes
        .retain(|attribute| !REQUEST_ONLY.contains(&attribute.name));
    schema
}

/// `fusionauth_user` data source.
pub struct User;

#[async_trait]
impl DataSource for User {
    fn type_name(&self) -> &'static str {
        "fusionauth_user"
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let tenant = data.get_str("tenant_id").map(str::to_string);
        let (lookup, result) = if let Some(id) = data.get_str("user_id") {
            (
                format!("id {id}"),
                client
                    .get(ApiPath::new("/api/user").segment(id), tenant.as_deref())
                    .await,
            )
        } else if let Some(username) = data.get_str("username") {
            (
                format!("username {username:?}"),
                client
                    .search("/api/user", &[("username", username)], tenant.as_deref())
                    .await,
            )
        } else if let Some(email) = data.get_str("email") {
            (
                format!("email {email:?}"),
                client
                    .search("/api/user", &[("email", email)], tenant.as_deref())
                    .await,
            )
        } else {
            return Err(ProviderError::invalid(
                "user_id",
                "one of user_id, username or email must be set",
            ));
        };
        let object = match result {
            Ok(response) => unwrap_envelope(response, "user")?,
            Err(e) if e.is_not_found() => {
                return Err(ProviderError::NotFound {
                    kind: "user",
                    lookup,
                })
            }
            Err(e) => return Err(e),
        };
        apply_object(&schema(), data, &object);
        Ok(())
    }
}
