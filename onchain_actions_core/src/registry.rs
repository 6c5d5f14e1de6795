use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use serde_json::Value;

use crate::actions::{Action, ActionMetadata};
use crate::error::{ActionError, ActionResult};
use crate::network::Network;
use crate::provider::{collect_actions, ActionProvider, ProvidedAction};
use crate::schema;

/// Flat, name-indexed catalog of every action available on one network.
///
/// Built once from the configured providers; read-only afterwards, so it
/// can be shared across tasks behind an `Arc`.
pub struct ActionRegistry {
    network: Network,
    entries: Vec<ProvidedAction>,
    index: HashMap<String, usize>,
}

impl ActionRegistry {
    /// Build the catalog for `network`.
    ///
    /// Providers that do not support the network are skipped silently.
    /// Fails on the first empty or duplicate action name.
    pub fn new<I>(network: Network, providers: I) -> ActionResult<Self>
    where
        I: IntoIterator<Item = Arc<dyn ActionProvider>>,
    {
        let mut entries: Vec<ProvidedAction> = Vec::new();
        let mut index = HashMap::new();

        for provider in providers {
            for entry in collect_actions(&provider, &network) {
                let name = entry.action.metadata().name.clone();
                if name.trim().is_empty() {
                    return Err(ActionError::configuration(
                        entry.provider,
                        anyhow!("action names must not be empty"),
                    ));
                }
                if let Some(&existing) = index.get(&name) {
                    let first: &ProvidedAction = &entries[existing];
                    return Err(ActionError::NameCollision {
                        name,
                        first_provider: first.provider.clone(),
                        second_provider: entry.provider,
                    });
                }
                index.insert(name, entries.len());
                entries.push(entry);
            }
        }

        tracing::info!(%network, actions = entries.len(), "action registry built");
        Ok(Self {
            network,
            entries,
            index,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.entry(name).map(|e| Arc::clone(&e.action))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Name of the provider that declared `name`.
    pub fn provider_of(&self, name: &str) -> Option<&str> {
        self.entry(name).map(|e| e.provider.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Providers that contributed at least one action, in catalog order.
    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !names.contains(&entry.provider.as_str()) {
                names.push(&entry.provider);
            }
        }
        names
    }

    /// Return metadata for all registered actions, in catalog order.
    pub fn metadata(&self) -> Vec<ActionMetadata> {
        self.entries
            .iter()
            .map(|e| e.action.metadata().clone())
            .collect()
    }

    /// `{name, description, input_schema}` per action, for LLM tool calling.
    pub fn tool_definitions(&self) -> Vec<Value> {
        self.entries
            .iter()
            .map(|e| e.action.metadata().tool_definition())
            .collect()
    }

    /// Execute an action by name with raw JSON arguments.
    ///
    /// Arguments are validated against the action's schema first. Errors a
    /// handler returns are wrapped as [`ActionError::HandlerExecution`] with
    /// the cause intact. A handler's own [`ActionError::Validation`] (a
    /// cross-field check the schema cannot express) is passed through as is.
    pub async fn execute(&self, name: &str, input: Value) -> ActionResult<String> {
        let entry = self.entry(name).ok_or_else(|| ActionError::UnknownAction {
            name: name.to_string(),
        })?;

        let args = schema::validate(name, entry.action.metadata().schema.as_ref(), input)?;

        tracing::debug!(action = name, provider = %entry.provider, "invoking action");
        entry.action.call(args).await.map_err(|source| {
            tracing::warn!(action = name, provider = %entry.provider, error = %source, "action failed");
            let source = match source.downcast::<ActionError>() {
                Ok(err @ ActionError::Validation { .. }) => return err,
                Ok(err) => anyhow::Error::new(err),
                Err(source) => source,
            };
            ActionError::HandlerExecution {
                action: name.to_string(),
                source,
            }
        })
    }

    fn entry(&self, name: &str) -> Option<&ProvidedAction> {
        self.index.get(name).map(|&i| &self.entries[i])
    }
}
