//! Send Orchestrator
//!
//! Runs one send attempt end to end: validation gate, token path selection,
//! handler construction, channel resolution for inter-chain routes, and
//! broadcast. Every exit produces a `SendResult`; nothing is thrown past
//! `send_tokens`.

use super::plan::{resolve_route, select_path, TokenPath};
use super::request::{PrebuiltHandler, SendRequest};
use super::result::{failure_from_error, fixed_fee_failure, PendingTransactionRecord, SendResult};
use super::state::{SendFlags, SendGuard, SendState};
use crate::address::{classify, is_evm_address, slice_address, AddressError};
use crate::amount::FIXED_FEE_DEFAULT_DECIMALS;
use crate::config::SendConfig;
use crate::error::{HawalaError, HawalaResult};
use crate::ibc::{no_active_channel_message, ChannelResolver, MsgTransfer};
use crate::registry::{ChainMetadata, ChainRegistry};
use crate::tx::{
    CompletionHandle, FixedFeeAmount, TxClient, TxClientProvider, TxHandlerFactory, TxOutcome,
};
use crate::types::{Coin, FeeSpec, TokenDescriptor, TxData, TxMetadata, TxType};
use crate::utils::logging::{redact_address, redact_hash};
use crate::wallet::{ActiveWallet, WalletHandle, WalletProvider};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const NO_TOKEN_SELECTED: &str = "No token selected";
pub const NO_RECIPIENT: &str = "No recipient address provided";
pub const INVALID_RECIPIENT: &str = "Invalid recipient address";
pub const NO_ACTIVE_WALLET: &str = "No active wallet";
pub const TOKEN_NOT_SUPPORTED: &str = "We do not support transferring this token yet";

/// Denom prefix the chain message layer expects for ERC-20 tokens
const ERC20_DENOM_PREFIX: &str = "erc20/";

/// Everything a path needs once the gate has passed
struct SendContext<'a> {
    chain: &'a ChainMetadata,
    from: String,
    token: TokenDescriptor,
    wallet: WalletHandle,
}

/// Display fields shared by every pending record
struct RecordFields {
    tx_hash: Option<String>,
    tx_type: TxType,
    completion: CompletionHandle,
}

pub struct SendOrchestrator {
    registry: Arc<ChainRegistry>,
    config: SendConfig,
    active_wallet: Option<ActiveWallet>,
    wallets: Arc<dyn WalletProvider>,
    factory: TxHandlerFactory,
    channels: ChannelResolver,
    flags: Arc<SendFlags>,
}

fn non_empty_hash(hash: String) -> HawalaResult<String> {
    if hash.trim().is_empty() {
        Err(HawalaError::network_error("Broadcast returned no transaction hash"))
    } else {
        Ok(hash)
    }
}

fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

/// Denom as placed in a chain message
fn chain_message_denom(token: &TokenDescriptor) -> String {
    let denom = token.message_denom();
    if is_evm_address(denom) {
        format!("{}{}", ERC20_DENOM_PREFIX, denom)
    } else {
        denom.to_string()
    }
}

fn tx_data(hash: &str, tx_type: TxType, metadata: TxMetadata, fee: &FeeSpec) -> TxData {
    TxData {
        tx_hash: hash.to_string(),
        tx_type,
        metadata,
        fee_denomination: fee.denomination().map(str::to_string),
        fee_quantity: fee.quantity().map(str::to_string),
    }
}

impl SendOrchestrator {
    pub fn new(
        registry: Arc<ChainRegistry>,
        config: SendConfig,
        wallets: Arc<dyn WalletProvider>,
        clients: Arc<dyn TxClientProvider>,
        channels: ChannelResolver,
    ) -> Self {
        let factory = TxHandlerFactory::new(clients, config.network);
        Self {
            registry,
            config,
            active_wallet: None,
            wallets,
            factory,
            channels,
            flags: Arc::new(SendFlags::default()),
        }
    }

    pub fn with_active_wallet(mut self, wallet: ActiveWallet) -> Self {
        self.active_wallet = Some(wallet);
        self
    }

    pub fn set_active_wallet(&mut self, wallet: Option<ActiveWallet>) {
        self.active_wallet = wallet;
    }

    pub fn set_active_chain(&mut self, chain_key: impl Into<String>) {
        self.config.active_chain = chain_key.into();
    }

    pub fn active_chain(&self) -> &str {
        &self.config.active_chain
    }

    pub fn is_sending(&self) -> bool {
        self.flags.is_sending()
    }

    pub fn awaiting_hardware_confirmation(&self) -> bool {
        self.flags.awaiting_hardware_confirmation()
    }

    pub fn state(&self) -> SendState {
        self.flags.state()
    }

    /// Flags shared with observers that poll them while a send is in flight
    pub fn flags(&self) -> Arc<SendFlags> {
        Arc::clone(&self.flags)
    }

    /// Checks run before any path, in order. The first failure wins.
    fn gate(&self, request: &SendRequest) -> Result<&ActiveWallet, &'static str> {
        if request.token.is_none() {
            return Err(NO_TOKEN_SELECTED);
        }
        let to = request.to_address.trim();
        if to.is_empty() {
            return Err(NO_RECIPIENT);
        }
        match classify(&self.registry, to) {
            Ok(_) | Err(AddressError::UnsupportedChain(_)) => {}
            Err(_) => return Err(INVALID_RECIPIENT),
        }
        self.active_wallet.as_ref().ok_or(NO_ACTIVE_WALLET)
    }

    /// Registry descriptor for the selected token, with the user's symbol
    /// and name taking precedence over the registry's display fields.
    fn resolve_token(&self, chain: &ChainMetadata, selected: &TokenDescriptor) -> Option<TokenDescriptor> {
        let mut token = self
            .registry
            .supports_token(&chain.key, &selected.coin_minimal_denom)?;

        if self.registry.denom(&selected.coin_minimal_denom).is_some() {
            if !selected.coin_denom.is_empty() {
                token.coin_denom = selected.coin_denom.clone();
            }
            if selected.name.is_some() {
                token.name = selected.name.clone();
            }
        }
        if selected.ibc_denom.is_some() {
            token.ibc_denom = selected.ibc_denom.clone();
        }
        token.is_evm |= selected.is_evm;
        Some(token)
    }

    /// Send `request` from the active wallet on the active chain
    pub async fn send_tokens(&self, request: SendRequest) -> SendResult {
        let guard = self.flags.begin();
        let result = self.run(&request, &guard).await;

        match &result {
            SendResult::Success { pending, .. } => info!(
                tx_hash = %pending.tx_hash.as_deref().map(redact_hash).unwrap_or_default(),
                tx_type = pending.tx_type.as_str(),
                "send broadcast"
            ),
            SendResult::Failure { errors } => warn!(?errors, "send failed"),
        }
        guard.finish(result.is_success());
        result
    }

    async fn run(&self, request: &SendRequest, guard: &SendGuard<'_>) -> SendResult {
        let wallet_info = match self.gate(request) {
            Ok(wallet) => wallet,
            Err(message) => return SendResult::failure(message),
        };
        let Some(selected) = request.token.as_ref() else {
            return SendResult::failure(NO_TOKEN_SELECTED);
        };

        let Some(chain) = self.registry.chain(&self.config.active_chain) else {
            return failure_from_error(&HawalaError::unsupported_chain(format!(
                "Unknown active chain: {}",
                self.config.active_chain
            )));
        };
        let Some(from) = wallet_info.address_for(&chain.key) else {
            return failure_from_error(&HawalaError::validation(format!(
                "The active wallet has no address on {}",
                chain.chain_name
            )));
        };

        let Some(token) = self.resolve_token(chain, selected) else {
            return SendResult::failure(TOKEN_NOT_SUPPORTED);
        };

        if wallet_info.wallet_type.is_hardware() {
            guard.awaiting_hardware();
        }

        let path = select_path(&self.registry, chain, &selected.coin_minimal_denom);
        info!(
            chain = %chain.key,
            ?path,
            denom = %token.coin_minimal_denom,
            to = %redact_address(request.to_address.trim()),
            "send path selected"
        );
        guard.transition(match path {
            TokenPath::ContractToken => SendState::ContractTokenPath,
            TokenPath::PrivacyToken => SendState::PrivacyTokenPath,
            TokenPath::FixedFee(_) => SendState::FixedFeePath,
            TokenPath::Standard => SendState::StandardPath,
        });

        let wallet = match self.wallets.get_wallet().await {
            Ok(wallet) => wallet,
            Err(e) => return failure_from_error(&e),
        };

        let ctx = SendContext {
            chain,
            from: from.to_string(),
            token,
            wallet,
        };

        let outcome = match path {
            TokenPath::ContractToken => self.send_contract_token(&ctx, request, guard).await,
            TokenPath::PrivacyToken => self.send_privacy_token(&ctx, request, guard).await,
            TokenPath::FixedFee(_) => self.send_fixed_fee(&ctx, request, guard).await,
            TokenPath::Standard => self.send_standard(&ctx, request, guard).await,
        };

        match outcome {
            Ok(result) => result,
            Err(e) => {
                debug!(error = %e, "converting send error");
                match path {
                    TokenPath::FixedFee(_) => fixed_fee_failure(&e),
                    _ => failure_from_error(&e),
                }
            }
        }
    }

    fn record(&self, ctx: &SendContext<'_>, request: &SendRequest, fields: RecordFields) -> PendingTransactionRecord {
        PendingTransactionRecord {
            tx_hash: fields.tx_hash,
            img: ctx.chain.chain_symbol_image_url.clone(),
            sent_amount: request.amount.to_string(),
            sent_token_info: ctx.token.clone(),
            sent_usd_value: String::new(),
            title: format!("Sent {}", ctx.token.coin_denom),
            subtitle: format!("to {}", slice_address(request.to_address.trim())),
            tx_type: fields.tx_type,
            completion: fields.completion,
            fee_denomination: request.fee.denomination().map(str::to_string),
            fee_quantity: request.fee.quantity().map(str::to_string),
        }
    }

    /// CW20 transfer through the contract client. Amount is floored.
    async fn send_contract_token(
        &self,
        ctx: &SendContext<'_>,
        request: &SendRequest,
        guard: &SendGuard<'_>,
    ) -> HawalaResult<SendResult> {
        let client = self
            .factory
            .create_contract_client(ctx.chain, ctx.wallet.clone())
            .await?;

        let contract = ctx.token.coin_minimal_denom.as_str();
        let recipient = request.to_address.trim();
        let base_units = request.amount.to_base_units_floor(ctx.token.decimals())?;
        let msg = json!({
            "transfer": {
                "recipient": recipient,
                "amount": base_units.to_string(),
            }
        });

        guard.transition(SendState::Broadcasting);
        let hash = non_empty_hash(
            client
                .execute(&ctx.from, contract, msg, &request.fee, &request.memo)
                .await?,
        )?;

        let options = self.config.poll_options();
        let poller = Arc::clone(&client);
        let poll_hash = hash.clone();
        let completion = CompletionHandle::spawn(async move { poller.poll_for_tx(poll_hash, options).await });

        let metadata = TxMetadata::contract(contract, recipient, Coin::new(base_units, contract));
        let data = tx_data(&hash, TxType::Cw20TokenTransfer, metadata, &request.fee);
        let pending = self.record(
            ctx,
            request,
            RecordFields {
                tx_hash: Some(hash),
                tx_type: TxType::Cw20TokenTransfer,
                completion,
            },
        );
        Ok(SendResult::success(pending, Some(data)))
    }

    /// SNIP20 transfer. Amount is rounded to the token's decimals and stays
    /// in display units.
    async fn send_privacy_token(
        &self,
        ctx: &SendContext<'_>,
        request: &SendRequest,
        guard: &SendGuard<'_>,
    ) -> HawalaResult<SendResult> {
        let client = match &request.handler {
            Some(PrebuiltHandler::Privacy(client)) => Arc::clone(client),
            _ => self.factory.create_privacy_client(ctx.chain, ctx.wallet.clone())?,
        };

        let contract = ctx.token.coin_minimal_denom.as_str();
        let recipient = request.to_address.trim();
        let amount = request.amount.round_to_decimals(ctx.token.decimals());
        let msg = json!({
            "transfer": {
                "recipient": recipient,
                "amount": amount.to_string(),
            }
        });

        guard.transition(SendState::Broadcasting);
        let outcome: TxOutcome = client.transfer(&ctx.from, contract, msg).await?;

        let hash = non_empty_hash(outcome.tx_hash.clone())?;
        let metadata = TxMetadata::contract(contract, recipient, Coin::new(&amount, contract));
        let data = tx_data(&hash, TxType::SecretTokenTransfer, metadata, &request.fee);
        let pending = self.record(
            ctx,
            request,
            RecordFields {
                tx_hash: Some(hash),
                tx_type: TxType::SecretTokenTransfer,
                completion: CompletionHandle::settled(Ok(outcome)),
            },
        );
        Ok(SendResult::success(pending, Some(data)))
    }

    /// Native send on a fixed-fee chain. Never resolves a channel.
    async fn send_fixed_fee(
        &self,
        ctx: &SendContext<'_>,
        request: &SendRequest,
        guard: &SendGuard<'_>,
    ) -> HawalaResult<SendResult> {
        let client = self
            .factory
            .create_fixed_fee_client(ctx.chain, ctx.wallet.clone())?;

        let denom = ctx.token.coin_minimal_denom.clone();
        let amount = FixedFeeAmount {
            amount: request.amount.clone(),
            decimals: ctx.token.coin_decimals.unwrap_or(FIXED_FEE_DEFAULT_DECIMALS),
            denom: denom.clone(),
        };
        let recipient = request.to_address.trim();

        guard.transition(SendState::Broadcasting);
        let receipt = client
            .send_tokens(&ctx.from, recipient, amount, &request.memo)
            .await?;
        let hash = non_empty_hash(receipt.tx_hash)?;

        let metadata = TxMetadata::send(recipient, Coin::new(&receipt.amount, denom));
        let data = tx_data(&hash, TxType::Send, metadata, &request.fee);
        let pending = self.record(
            ctx,
            request,
            RecordFields {
                tx_hash: Some(hash.clone()),
                tx_type: TxType::Send,
                completion: CompletionHandle::resolved(TxOutcome::success(hash)),
            },
        );
        Ok(SendResult::success(pending, Some(data)))
    }

    /// Bank send or IBC transfer, decided by comparing address prefixes
    async fn send_standard(
        &self,
        ctx: &SendContext<'_>,
        request: &SendRequest,
        guard: &SendGuard<'_>,
    ) -> HawalaResult<SendResult> {
        let route = match resolve_route(&self.registry, ctx.chain, &ctx.from, &request.to_address) {
            Ok(route) => route,
            Err(e) => return Ok(SendResult::failure(e.to_string())),
        };

        let channel = if route.inter_chain {
            let channel = match &request.ibc_channel_id {
                Some(channel) => Some(channel.clone()),
                None => self.channels.resolve(route.src, route.dst).await,
            };
            let Some(channel) = channel else {
                return Ok(SendResult::failure(no_active_channel_message(
                    &route.src.chain_name,
                    &route.dst.chain_name,
                )));
            };

            let validation = self.channels.validate(&channel, route.src, route.dst).await;
            if !validation.success {
                let message = validation.message.unwrap_or_else(|| {
                    no_active_channel_message(&route.src.chain_name, &route.dst.chain_name)
                });
                return Ok(SendResult::failure(message));
            }
            Some(channel)
        } else {
            None
        };

        let client: Arc<dyn TxClient> = match &request.handler {
            Some(PrebuiltHandler::Tx(client)) => Arc::clone(client),
            _ => self.factory.create(ctx.chain, ctx.wallet.clone()).await?,
        };

        let base_units = request.amount.to_base_units_floor(ctx.token.decimals())?;
        let coin = Coin::new(base_units, chain_message_denom(&ctx.token));
        let sent = Coin::new(base_units, ctx.token.coin_minimal_denom.as_str());

        guard.transition(SendState::Broadcasting);
        let (hash, tx_type, metadata) = match channel {
            Some(channel) => {
                let timeout = unix_now() + self.config.ibc_timeout_secs;
                let msg = MsgTransfer::new(&channel, coin, &ctx.from, &route.recipient, timeout, &request.memo);
                debug!(%channel, dst = %route.dst.key, timeout, "sending IBC transfer");
                let hash = non_empty_hash(client.send_ibc_tokens(&msg, &request.fee).await?)?;
                let metadata = TxMetadata::ibc(&channel, &route.recipient, sent, Some(route.dst.key.clone()));
                (hash, TxType::IbcTransfer, metadata)
            }
            None => {
                let hash = non_empty_hash(
                    client
                        .send_tokens(&ctx.from, &route.recipient, vec![coin], &request.fee, &request.memo)
                        .await?,
                )?;
                (hash, TxType::Send, TxMetadata::send(&route.recipient, sent))
            }
        };

        let poller = Arc::clone(&client);
        let poll_hash = hash.clone();
        let completion = CompletionHandle::spawn(async move { poller.poll_for_tx(poll_hash).await });

        let data = tx_data(&hash, tx_type, metadata, &request.fee);
        let pending = self.record(
            ctx,
            request,
            RecordFields {
                tx_hash: Some(hash),
                tx_type,
                completion,
            },
        );
        Ok(SendResult::success(pending, Some(data)))
    }

    /// EVM-native value transfer outside the bech32 flow. The returned
    /// record is already settled.
    pub async fn send_token_eth(
        &self,
        from: &str,
        to: &str,
        value: &str,
        gas: u64,
        wallet: WalletHandle,
        gas_price: Option<u64>,
    ) -> SendResult {
        let guard = self.flags.begin();
        guard.transition(SendState::Broadcasting);

        let result = match self.send_eth(from, to, value, gas, wallet, gas_price).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "EVM send failed");
                failure_from_error(&e)
            }
        };
        guard.finish(result.is_success());
        result
    }

    async fn send_eth(
        &self,
        from: &str,
        to: &str,
        value: &str,
        gas: u64,
        wallet: WalletHandle,
        gas_price: Option<u64>,
    ) -> HawalaResult<SendResult> {
        let chain = self.registry.chain(&self.config.active_chain).ok_or_else(|| {
            HawalaError::unsupported_chain(format!("Unknown active chain: {}", self.config.active_chain))
        })?;
        let token = chain
            .native_denom()
            .cloned()
            .unwrap_or_else(|| TokenDescriptor::new(chain.fee_denom.as_str(), chain.fee_denom.as_str(), 18));

        let client = self.factory.create_evm_client(wallet)?;
        let receipt = client.send_transaction(from, to, value, gas, gas_price).await?;
        let hash = non_empty_hash(receipt.hash)?;
        info!(tx_hash = %redact_hash(&hash), chain = %chain.key, "EVM send broadcast");

        let metadata = TxMetadata::send(to, Coin::new(value, token.coin_minimal_denom.as_str()));
        let data = TxData {
            tx_hash: hash.clone(),
            tx_type: TxType::Send,
            metadata,
            fee_denomination: None,
            fee_quantity: None,
        };
        let pending = PendingTransactionRecord {
            tx_hash: Some(hash.clone()),
            img: chain.chain_symbol_image_url.clone(),
            sent_amount: value.to_string(),
            title: format!("Sent {}", token.coin_denom),
            sent_token_info: token,
            sent_usd_value: String::new(),
            subtitle: format!("to {}", slice_address(to)),
            tx_type: TxType::Send,
            completion: CompletionHandle::resolved(TxOutcome::success(hash)),
            fee_denomination: None,
            fee_quantity: None,
        };
        Ok(SendResult::success(pending, Some(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erc20_denoms_are_prefixed() {
        let erc20 = TokenDescriptor::new("0xd8da6bf26964af9d7eed9e03e53415d37aa96045", "WETH", 18);
        assert_eq!(
            chain_message_denom(&erc20),
            "erc20/0xd8da6bf26964af9d7eed9e03e53415d37aa96045"
        );

        let voucher = TokenDescriptor::new("uatom", "ATOM", 6).with_ibc_denom("ibc/27394FB0");
        assert_eq!(chain_message_denom(&voucher), "ibc/27394FB0");
    }

    #[test]
    fn test_empty_hash_rejected() {
        assert!(non_empty_hash("  ".to_string()).is_err());
        assert_eq!(non_empty_hash("ABC".to_string()).unwrap(), "ABC");
    }
}
