pub mod provider;
pub mod wallet;

pub use provider::{WalletActionProvider, PROVIDER_NAME};
pub use wallet::WalletProvider;
