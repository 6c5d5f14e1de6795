use std::sync::Arc;

use crate::actions::Action;
use crate::network::Network;

/// A capability module: owns its external client state and exposes actions.
///
/// Providers are built once at agent setup. After that only external state
/// (orders, balances) changes; name, account and network stay fixed. A
/// provider whose client is not safe for concurrent use must serialize
/// access itself, the registry calls handlers from any task.
pub trait ActionProvider: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Pure filter used when building a registry. Must not touch provider state.
    fn supports_network(&self, network: &Network) -> bool;

    /// This provider's own actions, bound to `self`, in declaration order.
    fn actions(self: Arc<Self>) -> Vec<Arc<dyn Action>>;

    /// Nested providers whose actions are offered alongside this one's.
    fn sub_providers(&self) -> Vec<Arc<dyn ActionProvider>> {
        Vec::new()
    }
}

/// An action together with the name of the provider that declared it.
#[derive(Clone)]
pub struct ProvidedAction {
    pub provider: String,
    pub action: Arc<dyn Action>,
}

/// Flatten a provider and its sub-providers for `network`.
///
/// Providers that do not support the network contribute nothing; that is
/// not an error. Each sub-provider is checked on its own.
pub fn collect_actions(provider: &Arc<dyn ActionProvider>, network: &Network) -> Vec<ProvidedAction> {
    let mut out = Vec::new();
    collect_into(provider, network, &mut out);
    out
}

fn collect_into(provider: &Arc<dyn ActionProvider>, network: &Network, out: &mut Vec<ProvidedAction>) {
    if !provider.supports_network(network) {
        tracing::debug!(provider = provider.name(), %network, "provider excluded for network");
        return;
    }

    let name = provider.name().to_string();
    out.extend(
        Arc::clone(provider)
            .actions()
            .into_iter()
            .map(|action| ProvidedAction {
                provider: name.clone(),
                action,
            }),
    );

    for sub in provider.sub_providers() {
        collect_into(&sub, network, out);
    }
}
