//! Bulk detail enrichment: one aliased GraphQL call per page of results.

use std::collections::{BTreeSet, HashMap};

use serde_json::{json, Map, Value};

use crate::client::RealtorClient;
use crate::error::RealtorError;
use crate::retry::retry_decode_failures;
use crate::templates::{BULK_ALIAS_PREFIX, HOME_FRAGMENT};

impl RealtorClient {
    /// Fetches extra detail for each property id in a single request.
    ///
    /// Returns a map keyed by property id. Ids the provider has no home for
    /// are simply absent. An empty id list returns an empty map without a
    /// network call. Ids that are not plain `[A-Za-z0-9_]` tokens are skipped.
    ///
    /// Malformed response bodies are retried per the configured
    /// [`crate::RetryPolicy`].
    ///
    /// # Errors
    ///
    /// - [`RealtorError::Http`] on network failure.
    /// - [`RealtorError::UnexpectedStatus`] on a non-2xx response.
    /// - [`RealtorError::Deserialize`] if every attempt returned a
    ///   non-JSON body.
    pub async fn fetch_extra_details(
        &self,
        property_ids: &[String],
    ) -> Result<HashMap<String, Value>, RealtorError> {
        let Some(payload) = build_bulk_query(property_ids) else {
            return Ok(HashMap::new());
        };

        let body = retry_decode_failures(self.config().detail_retry, || {
            self.post_graphql(&payload, "bulk property details")
        })
        .await?;

        let details = unflatten(body);
        tracing::debug!(
            requested = property_ids.len(),
            returned = details.len(),
            "fetched bulk property details"
        );
        Ok(details)
    }

    /// Merges bulk details into each record that has a matching id.
    pub(crate) async fn enrich_records(&self, records: &mut [Value]) -> Result<(), RealtorError> {
        let ids: Vec<String> = records.iter().filter_map(property_id).collect();
        let details = self.fetch_extra_details(&ids).await?;
        if details.is_empty() {
            return Ok(());
        }
        for record in records.iter_mut() {
            let Some(id) = property_id(record) else {
                continue;
            };
            if let Some(extra) = details.get(&id) {
                merge_extra_detail(record, extra.clone());
            }
        }
        Ok(())
    }
}

/// Merges one extra-detail fragment into a base record.
///
/// `location` is unioned key by key (extra wins on shared keys) instead of
/// replaced; every other top-level key in `extra` overwrites or adds.
pub fn merge_extra_detail(base: &mut Value, extra: Value) {
    let (Some(base), Value::Object(mut extra)) = (base.as_object_mut(), extra) else {
        return;
    };

    if let Some(extra_location) = extra.remove("location") {
        let base_location = base.entry("location").or_insert(Value::Null);
        match (base_location, extra_location) {
            (Value::Object(base_location), Value::Object(extra_location)) => {
                base_location.extend(extra_location);
            }
            (slot, extra_location) if slot.is_null() => *slot = extra_location,
            _ => {}
        }
    }

    base.extend(extra);
}

/// Builds the bulk-detail payload, or `None` when no usable id remains.
///
/// Each id becomes an alias `home_<id>` bound to a `$p<n>` variable, so ids
/// only reach the document text as alias names.
pub(crate) fn build_bulk_query(property_ids: &[String]) -> Option<Value> {
    let ids: BTreeSet<&str> = property_ids
        .iter()
        .map(String::as_str)
        .filter(|id| {
            let ok = is_alias_safe(id);
            if !ok {
                tracing::warn!(property_id = %id, "skipping property id unusable as alias");
            }
            ok
        })
        .collect();
    if ids.is_empty() {
        return None;
    }

    let mut params = Vec::with_capacity(ids.len());
    let mut selections = Vec::with_capacity(ids.len());
    let mut variables = Map::new();
    for (n, id) in ids.iter().enumerate() {
        params.push(format!("$p{n}: ID!"));
        selections.push(format!(
            "{BULK_ALIAS_PREFIX}{id}: home(property_id: $p{n}) {{ ...HomeData }}"
        ));
        variables.insert(format!("p{n}"), json!(id));
    }

    let query = format!(
        "{HOME_FRAGMENT}\n\nquery GetHomes({}) {{\n    {}\n}}",
        params.join(", "),
        selections.join("\n    ")
    );
    Some(json!({ "query": query, "variables": variables }))
}

fn is_alias_safe(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// `{"data": {"home_1": {...}, "home_2": null}}` -> `{"1": {...}}`.
fn unflatten(body: Value) -> HashMap<String, Value> {
    let Some(Value::Object(data)) = body.get("data").cloned() else {
        return HashMap::new();
    };
    data.into_iter()
        .filter(|(_, detail)| !detail.is_null())
        .filter_map(|(alias, detail)| {
            alias
                .strip_prefix(BULK_ALIAS_PREFIX)
                .map(|id| (id.to_owned(), detail))
        })
        .collect()
}

fn property_id(record: &Value) -> Option<String> {
    match record.get("property_id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
