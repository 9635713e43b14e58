use async_trait::async_trait;
use serde_json::Value;

use super::DataSource;
use crate::{
    client::{unwrap_envelope, unwrap_list, ApiPath, FusionAuthClient},
    error::ProviderError,
    mapping::flatten,
    schema::Schema,
    state::ResourceData,
};

/// Picks the single object out of a list of matches.
pub(crate) fn exactly_one(
    kind: &'static str,
    lookup: String,
    mut matches: Vec<Value>,
) -> Result<Value, ProviderError> {
    match matches.len() {
        0 => Err(ProviderError::NotFound { kind, lookup }),
        1 => Ok(matches.remove(0)),
        count => Err(ProviderError::Ambiguous {
            kind,
            lookup,
            count,
        }),
    }
}

/// Fills data source state from a found object and takes over its id.
pub(crate) fn apply_object(schema: &Schema, data: &mut ResourceData, object: &Value) {
    data.attributes = flatten(&schema.block, object, &data.attributes);
    let id = object.get("id").and_then(Value::as_str).map(str::to_string);
    data.set_id(id);
}

/// A data source that finds one object of a FusionAuth collection, either by id or
/// by comparing attributes against every object the collection lists.
pub struct Lookup {
    type_name: &'static str,
    path: &'static str,
    envelope: &'static str,
    list_key: &'static str,
    schema: fn() -> Schema,
    by_id: Option<&'static str>,
    fields: &'static [(&'static str, &'static str)],
}

impl Lookup {
    pub fn new(
        type_name: &'static str,
        path: &'static str,
        envelope: &'static str,
        list_key: &'static str,
        schema: fn() -> Schema,
    ) -> Self {
        Lookup {
            type_name,
            path,
            envelope,
            list_key,
            schema,
            by_id: None,
            fields: &[],
        }
    }

    /// Attribute holding an object id, fetched directly when set.
    pub fn by_id(mut self, attribute: &'static str) -> Self {
        self.by_id = Some(attribute);
        self
    }

    /// Attribute and FusionAuth field pairs that must all match when set.
    pub fn matching(mut self, fields: &'static [(&'static str, &'static str)]) -> Self {
        self.fields = fields;
        self
    }

    async fn fetch(
        &self,
        client: &FusionAuthClient,
        attribute: &str,
        id: &str,
    ) -> Result<Value, ProviderError> {
        match client
            .get(ApiPath::new(self.path).segment(id), None)
            .await
        {
            Ok(response) => unwrap_envelope(response, self.envelope),
            Err(e) if e.is_not_found() => Err(ProviderError::NotFound {
                kind: self.envelope,
                lookup: format!("{attribute} {id}"),
            }),
            Err(e) => Err(e),
        }
    }

    async fn search(
        &self,
        client: &FusionAuthClient,
        data: &ResourceData,
    ) -> Result<Value, ProviderError> {
        let criteria: Vec<(&str, &str)> = self
            .fields
            .iter()
            .filter_map(|&(attribute, field)| data.get_str(attribute).map(|value| (field, value)))
            .collect();
        if criteria.is_empty() {
            let names: Vec<&str> = self
                .by_id
                .into_iter()
                .chain(self.fields.iter().map(|&(attribute, _)| attribute))
                .collect();
            return Err(ProviderError::invalid(
                names.first().copied().unwrap_or("id"),
                format!("one of {} must be set", names.join(", ")),
            ));
        }
        let lookup = criteria
            .iter()
            .map(|(field, value)| format!("{field} {value:?}"))
            .collect::<Vec<_>>()
            .join(" and ");

        let response = client.get(self.path, None).await?;
        let matches = unwrap_list(response, self.list_key)
            .into_iter()
            .filter(|object| {
                criteria
                    .iter()
                    .all(|(field, value)| object.get(*field).and_then(Value::as_str) == Some(*value))
            })
            .collect();
        exactly_one(self.envelope, lookup, matches)
    }
}

#[async_trait]
impl DataSource for Lookup {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn schema(&self) -> Schema {
        (self.schema)()
    }

    async fn read(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let object = match self.by_id.and_then(|attribute| Some((attribute, data.get_str(attribute)?))) {
            Some((attribute, id)) => self.fetch(client, attribute, id).await?,
            None => self.search(client, data).await?,
        };
        apply_object(&self.schema(), data, &object);
        tracing::debug!(data_source = self.type_name, id = ?data.id(), "Found");
        Ok(())
    }
}
