use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use anyhow::Result;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::schema::{ActionArgs, Schema};

/// What an agent sees when choosing an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMetadata {
    pub name: String,
    pub description: String,
    /// `None` means the action takes an untyped argument mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl ActionMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema: None,
        }
    }

    /// JSON Schema of the accepted arguments (useful for AI tool schemas).
    pub fn input_schema(&self) -> Value {
        match &self.schema {
            Some(schema) => schema.to_json_schema(),
            None => json!({ "type": "object" }),
        }
    }

    pub fn tool_definition(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.input_schema(),
        })
    }
}

/// An action bound to the provider state it runs against.
#[async_trait]
pub trait Action: Send + Sync {
    fn metadata(&self) -> &ActionMetadata;

    /// Run the handler on arguments that already passed validation.
    async fn call(&self, args: ActionArgs) -> Result<String>;
}

/// Handler signature: an ordinary method on the provider returning a boxed future.
pub type ActionHandler<P> = for<'a> fn(&'a P, ActionArgs) -> BoxFuture<'a, Result<String>>;

/// Metadata plus handler, declared once per action by its provider.
pub struct ActionDescriptor<P> {
    meta: Arc<ActionMetadata>,
    handler: ActionHandler<P>,
}

impl<P> ActionDescriptor<P> {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: ActionHandler<P>,
    ) -> Self {
        Self {
            meta: Arc::new(ActionMetadata::new(name, description)),
            handler,
        }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        Arc::make_mut(&mut self.meta).schema = Some(schema);
        self
    }

    pub fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }
}

impl<P> Clone for ActionDescriptor<P> {
    fn clone(&self) -> Self {
        Self {
            meta: Arc::clone(&self.meta),
            handler: self.handler,
        }
    }
}

impl<P> fmt::Debug for ActionDescriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("name", &self.meta.name)
            .field("has_schema", &self.meta.schema.is_some())
            .finish()
    }
}

/// Ordered registration table a provider builds in its constructor.
pub struct ActionSet<P> {
    descriptors: Vec<ActionDescriptor<P>>,
}

impl<P> ActionSet<P> {
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    pub fn with(mut self, descriptor: ActionDescriptor<P>) -> Self {
        self.register(descriptor);
        self
    }

    pub fn register(&mut self, descriptor: ActionDescriptor<P>) {
        self.descriptors.push(descriptor);
    }
}

impl<P: Send + Sync + 'static> ActionSet<P> {
    /// Bind every descriptor to `provider`, keeping declaration order.
    pub fn bind(&self, provider: &Arc<P>) -> Vec<Arc<dyn Action>> {
        self.descriptors
            .iter()
            .map(|descriptor| {
                Arc::new(BoundAction {
                    provider: Arc::clone(provider),
                    descriptor: descriptor.clone(),
                }) as Arc<dyn Action>
            })
            .collect()
    }
}

impl<P> Default for ActionSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

struct BoundAction<P> {
    provider: Arc<P>,
    descriptor: ActionDescriptor<P>,
}

#[async_trait]
impl<P: Send + Sync + 'static> Action for BoundAction<P> {
    fn metadata(&self) -> &ActionMetadata {
        &self.descriptor.meta
    }

    async fn call(&self, args: ActionArgs) -> Result<String> {
        (self.descriptor.handler)(self.provider.as_ref(), args).await
    }
}

/// Serialize a handler result as pretty JSON with keys sorted at every level,
/// so the same response always produces the same string.
pub fn to_result_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let value = sort_keys(serde_json::to_value(value)?);
    Ok(serde_json::to_string_pretty(&value)?)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            Value::Object(sorted.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, FieldType};

    struct Counter {
        label: String,
    }

    impl Counter {
        fn echo(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
            Box::pin(async move { Ok(format!("{}:{}", self.label, args.as_value())) })
        }
    }

    #[tokio::test]
    async fn bound_handler_sees_provider_state() {
        let provider = Arc::new(Counter {
            label: "c1".to_string(),
        });
        let set = ActionSet::new().with(ActionDescriptor::new("echo", "Echo input", Counter::echo));

        let actions = set.bind(&provider);
        assert_eq!(actions.len(), 1);
        let out = actions[0]
            .call(ActionArgs::new(json!({ "a": 1 })))
            .await
            .unwrap();
        assert_eq!(out, r#"c1:{"a":1}"#);

        // the handler stays an ordinary method
        let direct = provider.echo(ActionArgs::default()).await.unwrap();
        assert_eq!(direct, "c1:null");
    }

    #[test]
    fn descriptor_schema_shows_in_tool_definition() {
        let descriptor: ActionDescriptor<Counter> =
            ActionDescriptor::new("echo", "Echo input", Counter::echo).with_schema(
                Schema::new().field(FieldSpec::required("symbol", FieldType::String)),
            );

        let tool = descriptor.metadata().tool_definition();
        assert_eq!(tool["name"], "echo");
        assert_eq!(tool["input_schema"]["required"], json!(["symbol"]));

        let schemaless = ActionMetadata::new("noop", "Nothing");
        assert_eq!(schemaless.input_schema(), json!({ "type": "object" }));
    }

    #[test]
    fn result_string_is_key_sorted() {
        let a = to_result_string(&json!({ "b": 1, "a": { "z": true, "y": [ { "d": 0, "c": 1 } ] } }))
            .unwrap();
        let b = to_result_string(&json!({ "a": { "y": [ { "c": 1, "d": 0 } ], "z": true }, "b": 1 }))
            .unwrap();
        assert_eq!(a, b);
        assert!(a.find("\"a\"").unwrap() < a.find("\"b\"").unwrap());
    }
}
