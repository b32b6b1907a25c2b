//! Transaction Handler Factory
//!
//! Picks the client for a chain from its resolved family and runs that
//! family's initialisation sequence. A returned handler is ready to use.

use super::client::{
    ClientSpec, ContractTxClient, EvmTxClient, FixedFeeTxClient, PrivacyTxClient, TxClient,
    TxClientProvider,
};
use crate::error::{HawalaError, HawalaResult};
use crate::registry::{ChainFamily, ChainMetadata};
use crate::types::Network;
use crate::wallet::WalletHandle;
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub struct TxHandlerFactory {
    provider: Arc<dyn TxClientProvider>,
    network: Network,
}

/// Parse an endpoint, rejecting anything that is not http(s)
fn validate_endpoint(chain: &ChainMetadata, kind: &str, endpoint: Option<&str>) -> HawalaResult<String> {
    let endpoint = endpoint.ok_or_else(|| {
        HawalaError::handler_init(format!("{} has no {} endpoint", chain.chain_name, kind))
    })?;
    let url = Url::parse(endpoint)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(HawalaError::handler_init(format!(
            "{} {} endpoint must be http(s): {}",
            chain.chain_name, kind, endpoint
        )));
    }
    Ok(endpoint.trim_end_matches('/').to_string())
}

fn init_failed(chain: &ChainMetadata, e: HawalaError) -> HawalaError {
    if e.is_signer_declined() {
        return e;
    }
    HawalaError::handler_init(format!("{} client failed to initialise", chain.chain_name))
        .with_details(e.message)
}

impl TxHandlerFactory {
    pub fn new(provider: Arc<dyn TxClientProvider>, network: Network) -> Self {
        Self { provider, network }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    fn rest(&self, chain: &ChainMetadata) -> HawalaResult<String> {
        validate_endpoint(chain, "REST", chain.rest_for(self.network))
    }

    fn rpc(&self, chain: &ChainMetadata) -> HawalaResult<String> {
        validate_endpoint(chain, "RPC", chain.rpc_for(self.network))
    }

    fn ensure_api(&self, chain: &ChainMetadata) -> HawalaResult<()> {
        if chain.api_available {
            Ok(())
        } else {
            Err(HawalaError::handler_init(format!(
                "{} API is currently unavailable",
                chain.chain_name
            )))
        }
    }

    /// Which client a chain needs, without constructing it
    pub fn client_spec(&self, chain: &ChainMetadata) -> HawalaResult<ClientSpec> {
        self.ensure_api(chain)?;

        match &chain.family {
            ChainFamily::Custom(handler_id) => Ok(ClientSpec::Custom {
                handler_id: handler_id.clone(),
                testnet: self.network.is_testnet(),
                rest: self.rest(chain)?,
            }),
            ChainFamily::EvmCompatible => {
                let chain_id = chain.chain_id_for(self.network).ok_or_else(|| {
                    HawalaError::handler_init(format!("{} has no chain id for {:?}", chain.chain_name, self.network))
                })?;
                let evm_chain_id = chain.evm_chain_id_for(self.network).ok_or_else(|| {
                    HawalaError::handler_init(format!("{} has no EVM chain id", chain.chain_name))
                })?;
                Ok(ClientSpec::Ethermint {
                    rest: self.rest(chain)?,
                    chain_id: chain_id.to_string(),
                    evm_chain_id,
                })
            }
            ChainFamily::PrivacyToken => Ok(ClientSpec::PrivacyTestnet {
                rest: self.rest(chain)?,
                rpc: self.rpc(chain)?,
            }),
            ChainFamily::Standard => Ok(ClientSpec::Standard {
                rpc: format!("{}/", self.rpc(chain)?),
            }),
            ChainFamily::FixedFee(variant) => Err(HawalaError::handler_init(format!(
                "{} sends through the {} fixed-fee client",
                chain.chain_name,
                variant.chain_key()
            ))),
        }
    }

    /// Build and initialise the transaction client for `chain`
    pub async fn create(&self, chain: &ChainMetadata, wallet: WalletHandle) -> HawalaResult<Arc<dyn TxClient>> {
        let spec = self.client_spec(chain)?;
        // Standard clients bind REST after init; resolve it before building anything.
        let rest = match spec {
            ClientSpec::Standard { .. } => Some(self.rest(chain)?),
            _ => None,
        };

        debug!(chain = %chain.key, client = spec.label(), "building tx client");
        let needs_init = matches!(spec, ClientSpec::PrivacyTestnet { .. } | ClientSpec::Standard { .. });
        let mut client = self.provider.tx_client(spec, wallet)?;

        if needs_init {
            client.init_client().await.map_err(|e| init_failed(chain, e))?;
        }
        if let Some(rest) = rest {
            client.set_rest_endpoint(&rest);
            if chain.registry_extension {
                client.register_message_types();
            }
        }

        Ok(Arc::from(client))
    }

    /// Contract-token (CW20) client for `chain`
    pub async fn create_contract_client(
        &self,
        chain: &ChainMetadata,
        wallet: WalletHandle,
    ) -> HawalaResult<Arc<dyn ContractTxClient>> {
        self.ensure_api(chain)?;
        let rpc = format!("{}/", self.rpc(chain)?);
        let rest = self.rest(chain)?;

        let mut client = self.provider.contract_client(&rpc, &rest, wallet)?;
        client.init_client().await.map_err(|e| init_failed(chain, e))?;
        Ok(Arc::from(client))
    }

    /// Privacy-token (SNIP20) client for `chain`
    pub fn create_privacy_client(
        &self,
        chain: &ChainMetadata,
        wallet: WalletHandle,
    ) -> HawalaResult<Arc<dyn PrivacyTxClient>> {
        self.ensure_api(chain)?;
        let rest = self.rest(chain)?;
        let chain_id = chain.chain_id_for(self.network).ok_or_else(|| {
            HawalaError::handler_init(format!("{} has no chain id for {:?}", chain.chain_name, self.network))
        })?;
        self.provider.privacy_client(&rest, chain_id, wallet)
    }

    /// Native client of a fixed-fee chain
    pub fn create_fixed_fee_client(
        &self,
        chain: &ChainMetadata,
        wallet: WalletHandle,
    ) -> HawalaResult<Arc<dyn FixedFeeTxClient>> {
        match chain.family {
            ChainFamily::FixedFee(variant) => {
                debug!(chain = %chain.key, variant = variant.chain_key(), "building fixed-fee client");
                self.provider.fixed_fee_client(variant, wallet)
            }
            _ => Err(HawalaError::handler_init(format!(
                "{} is not a fixed-fee chain",
                chain.chain_name
            ))),
        }
    }

    pub fn create_evm_client(&self, wallet: WalletHandle) -> HawalaResult<Arc<dyn EvmTxClient>> {
        self.provider.evm_client(wallet)
    }
}
