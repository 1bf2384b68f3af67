//! Programmable transaction builder
//!
//! Commands are appended one at a time. Each append resolves its
//! arguments completely (including the object fetch) before touching the
//! builder, so a failed append leaves the transaction unchanged.
//!
//! Gas fields left unset are filled at `build` time, once each:
//! price from the reference price, budget from a dry run, payment from
//! the owner's gas coins.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::cache::MoveFunctionCache;
use super::gas::{compute_gas_budget, default_gas_price, select_gas_payment, GasCost};
use super::pure::PureType;
use super::resolver::{classify, user_parameters, CallArgInput, ParamKind, ResolvedArg, UnresolvedParameter};
use super::type_tag::TypeTag;
use super::types::{
    transaction_digest, Argument, CallArg, Command, GasData, ObjectArg, ProgrammableMoveCall,
    ProgrammableTransaction, TransactionData, TransactionDataV1, TransactionExpiration,
    TransactionKind,
};
use crate::config::GasConfig;
use crate::crypto::{SerializedSignature, SuiKeyPair};
use crate::error::{SuiError, SuiResult};
use crate::rpc::{DevInspectResults, DryRunTransactionBlockResponse, SuiRpc};
use crate::types::{ObjectId, ObjectRef, SuiAddress, TransactionDigest};
use crate::{log_debug, log_info};

/// Back-reference to a command's output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionResult {
    command: u16,
    count: u16,
}

impl TransactionResult {
    pub fn command_index(&self) -> u16 {
        self.command
    }

    /// Number of values the command returns
    pub fn len(&self) -> u16 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The whole result, e.g. a single returned object
    pub fn result(&self) -> Argument {
        Argument::Result(self.command)
    }

    /// The `i`-th returned value
    pub fn nested(&self, i: u16) -> Option<Argument> {
        (i < self.count).then_some(Argument::NestedResult(self.command, i))
    }

    pub fn nested_results(&self) -> Vec<Argument> {
        (0..self.count)
            .map(|i| Argument::NestedResult(self.command, i))
            .collect()
    }
}

impl From<TransactionResult> for CallArgInput {
    fn from(result: TransactionResult) -> Self {
        CallArgInput::Result(result.result())
    }
}

/// Wire form for `sui_executeTransactionBlock`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    /// Base64 `TransactionData` bytes
    pub tx_bytes: String,
    /// Base64 serialized signatures
    pub signatures: Vec<String>,
}

impl SignedTransaction {
    /// Attach already-produced signatures (e.g. a combined multisig)
    pub fn with_signatures(tx_bytes: &[u8], signatures: &[SerializedSignature]) -> Self {
        Self {
            tx_bytes: STANDARD.encode(tx_bytes),
            signatures: signatures.iter().map(SerializedSignature::to_base64).collect(),
        }
    }

    pub fn digest(&self) -> SuiResult<TransactionDigest> {
        let bytes = STANDARD.decode(&self.tx_bytes)?;
        Ok(transaction_digest(&bytes))
    }
}

/// Finalized, unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTransaction {
    data: TransactionData,
    bytes: Vec<u8>,
}

impl BuiltTransaction {
    pub fn data(&self) -> &TransactionData {
        &self.data
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn digest(&self) -> TransactionDigest {
        transaction_digest(&self.bytes)
    }

    pub fn sign(&self, signer: &SuiKeyPair) -> SuiResult<SignedTransaction> {
        let signature = signer.sign_transaction(&self.bytes)?;
        Ok(SignedTransaction::with_signatures(&self.bytes, &[signature]))
    }
}

fn parse_target(target: &str) -> SuiResult<(ObjectId, String, String)> {
    let parts: Vec<&str> = target.split("::").collect();
    let valid_ident = |s: &str| {
        s.chars().next().map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    match parts.as_slice() {
        [package, module, function] if valid_ident(module) && valid_ident(function) => {
            let package = SuiAddress::from_hex(package)
                .map_err(|_| SuiError::InvalidTarget(target.to_string()))?;
            Ok((package, module.to_string(), function.to_string()))
        }
        _ => Err(SuiError::InvalidTarget(target.to_string())),
    }
}

pub struct TransactionBuilder<'a, R: SuiRpc + ?Sized> {
    rpc: &'a R,
    cache: &'a MoveFunctionCache,
    config: GasConfig,
    sender: Option<SuiAddress>,
    gas_price: Option<u64>,
    gas_budget: Option<u64>,
    gas_owner: Option<SuiAddress>,
    gas_payment: Option<Vec<ObjectRef>>,
    expiration: TransactionExpiration,
    inputs: Vec<CallArg>,
    object_inputs: HashMap<ObjectId, u16>,
    commands: Vec<Command>,
}

impl<'a, R: SuiRpc + ?Sized> TransactionBuilder<'a, R> {
    pub fn new(rpc: &'a R, cache: &'a MoveFunctionCache) -> Self {
        Self {
            rpc,
            cache,
            config: GasConfig::default(),
            sender: None,
            gas_price: None,
            gas_budget: None,
            gas_owner: None,
            gas_payment: None,
            expiration: TransactionExpiration::None,
            inputs: Vec::new(),
            object_inputs: HashMap::new(),
            commands: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: GasConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_sender(&mut self, sender: SuiAddress) -> &mut Self {
        self.sender = Some(sender);
        self
    }

    pub fn set_gas_price(&mut self, price: u64) -> &mut Self {
        self.gas_price = Some(price);
        self
    }

    pub fn set_gas_budget(&mut self, budget: u64) -> &mut Self {
        self.gas_budget = Some(budget);
        self
    }

    pub fn set_gas_owner(&mut self, owner: SuiAddress) -> &mut Self {
        self.gas_owner = Some(owner);
        self
    }

    pub fn set_gas_payment(&mut self, payment: Vec<ObjectRef>) -> &mut Self {
        self.gas_payment = Some(payment);
        self
    }

    pub fn set_expiration(&mut self, expiration: TransactionExpiration) -> &mut Self {
        self.expiration = expiration;
        self
    }

    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The coin paying for gas, usable as a command argument
    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    // MARK: - Commands

    /// Split `amounts` off `coin`; yields one nested result per amount
    pub fn split_coins(&mut self, coin: CallArgInput, amounts: Vec<CallArgInput>) -> SuiResult<TransactionResult> {
        if amounts.is_empty() {
            return Err(SuiError::ArityMismatch {
                what: "split amounts",
                expected: 1,
                actual: 0,
            });
        }
        let count = amounts.len();
        let mut args = vec![(coin, ParamKind::Object { mutable: true })];
        args.extend(amounts.into_iter().map(|a| (a, ParamKind::Pure(PureType::U64))));

        self.append(args, count, |mut resolved| {
            let coin = resolved.remove(0);
            Command::SplitCoins(coin, resolved)
        })
    }

    pub fn transfer_objects(&mut self, objects: Vec<CallArgInput>, recipient: CallArgInput) -> SuiResult<TransactionResult> {
        if objects.is_empty() {
            return Err(SuiError::ArityMismatch {
                what: "objects to transfer",
                expected: 1,
                actual: 0,
            });
        }
        let mut args: Vec<_> = objects
            .into_iter()
            .map(|o| (o, ParamKind::Object { mutable: true }))
            .collect();
        args.push((recipient, ParamKind::Pure(PureType::Address)));

        self.append(args, 0, |mut resolved| {
            let recipient = resolved.pop().unwrap_or(Argument::GasCoin);
            Command::TransferObjects(resolved, recipient)
        })
    }

    pub fn merge_coins(&mut self, destination: CallArgInput, sources: Vec<CallArgInput>) -> SuiResult<TransactionResult> {
        if sources.is_empty() {
            return Err(SuiError::ArityMismatch {
                what: "coins to merge",
                expected: 1,
                actual: 0,
            });
        }
        let mut args = vec![(destination, ParamKind::Object { mutable: true })];
        args.extend(sources.into_iter().map(|s| (s, ParamKind::Object { mutable: true })));

        self.append(args, 0, |mut resolved| {
            let destination = resolved.remove(0);
            Command::MergeCoins(destination, resolved)
        })
    }

    /// Call `package::module::function`. Arguments are matched against
    /// the on-chain signature; a trailing `TxContext` is supplied by the
    /// runtime and must not be passed.
    pub fn move_call(
        &mut self,
        target: &str,
        type_arguments: &[&str],
        arguments: Vec<CallArgInput>,
    ) -> SuiResult<TransactionResult> {
        let (package, module, function) = parse_target(target)?;

        let type_tags = type_arguments
            .iter()
            .enumerate()
            .map(|(index, value)| {
                value.parse::<TypeTag>().map_err(|e| SuiError::InvalidTypeArgument {
                    index,
                    value: value.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<SuiResult<Vec<_>>>()?;

        let signature = self.cache.get_or_fetch(self.rpc, &package, &module, &function)?;
        let parameters = user_parameters(&signature.parameters);

        if type_tags.len() != signature.type_parameters.len() {
            return Err(SuiError::ArityMismatch {
                what: "type arguments",
                expected: signature.type_parameters.len(),
                actual: type_tags.len(),
            });
        }
        if arguments.len() != parameters.len() {
            return Err(SuiError::ArityMismatch {
                what: "arguments",
                expected: parameters.len(),
                actual: arguments.len(),
            });
        }

        let args: Vec<_> = arguments
            .into_iter()
            .zip(parameters)
            .map(|(arg, param)| (arg, classify(param, &type_tags)))
            .collect();
        let returns = signature.return_types.len();

        self.append(args, returns, move |resolved| {
            Command::MoveCall(Box::new(ProgrammableMoveCall {
                package,
                module,
                function,
                type_arguments: type_tags,
                arguments: resolved,
            }))
        })
    }

    /// Resolve `args`, then attach inputs and push the command
    fn append(
        &mut self,
        args: Vec<(CallArgInput, ParamKind)>,
        returns: usize,
        build: impl FnOnce(Vec<Argument>) -> Command,
    ) -> SuiResult<TransactionResult> {
        let command = u16::try_from(self.commands.len()).map_err(|_| SuiError::ArityMismatch {
            what: "commands",
            expected: usize::from(u16::MAX),
            actual: self.commands.len() + 1,
        })?;
        let count = u16::try_from(returns).map_err(|_| SuiError::ArityMismatch {
            what: "results",
            expected: usize::from(u16::MAX),
            actual: returns,
        })?;

        let mut unresolved = UnresolvedParameter::new();
        for (index, (input, kind)) in args.iter().enumerate() {
            unresolved.add(index, input, kind)?;
        }
        let resolved = unresolved.resolve(self.rpc)?;

        let new_inputs = resolved.iter().filter(|r| !matches!(r, ResolvedArg::Argument(_))).count();
        if self.inputs.len() + new_inputs > usize::from(u16::MAX) + 1 {
            return Err(SuiError::ArityMismatch {
                what: "transaction inputs",
                expected: usize::from(u16::MAX) + 1,
                actual: self.inputs.len() + new_inputs,
            });
        }

        let arguments: Vec<Argument> = resolved.into_iter().map(|r| self.attach(r)).collect();
        self.commands.push(build(arguments));

        log_debug!("builder", "Appended command", index = command, inputs = self.inputs.len());
        Ok(TransactionResult { command, count })
    }

    /// Add a resolved value to the inputs. Objects are shared across
    /// commands; reusing a shared object mutably upgrades the input.
    fn attach(&mut self, resolved: ResolvedArg) -> Argument {
        match resolved {
            ResolvedArg::Argument(argument) => argument,
            ResolvedArg::Pure(bytes) => {
                self.inputs.push(CallArg::Pure(bytes));
                Argument::Input((self.inputs.len() - 1) as u16)
            }
            ResolvedArg::Object(object) => {
                let id = object.id();
                if let Some(&index) = self.object_inputs.get(&id) {
                    if let (
                        Some(CallArg::Object(ObjectArg::SharedObject { mutable, .. })),
                        ObjectArg::SharedObject { mutable: true, .. },
                    ) = (self.inputs.get_mut(usize::from(index)), &object)
                    {
                        *mutable = true;
                    }
                    return Argument::Input(index);
                }
                self.inputs.push(CallArg::Object(object));
                let index = (self.inputs.len() - 1) as u16;
                self.object_inputs.insert(id, index);
                Argument::Input(index)
            }
        }
    }

    // MARK: - Finalization

    fn kind(&self) -> TransactionKind {
        TransactionKind::ProgrammableTransaction(ProgrammableTransaction {
            inputs: self.inputs.clone(),
            commands: self.commands.clone(),
        })
    }

    fn transaction_data(&self, sender: SuiAddress, gas_data: GasData) -> TransactionData {
        TransactionData::V1(TransactionDataV1 {
            kind: self.kind(),
            sender,
            gas_data,
            expiration: self.expiration,
        })
    }

    fn require_sender(&self) -> SuiResult<SuiAddress> {
        self.sender.ok_or(SuiError::MissingSender)
    }

    fn effective_gas_price(&self) -> SuiResult<u64> {
        match self.gas_price {
            Some(price) if price > 0 => Ok(price),
            _ => default_gas_price(self.rpc, &self.config),
        }
    }

    /// Dry run with the placeholder budget and the current (or empty) payment
    pub fn dry_run(&self) -> SuiResult<DryRunTransactionBlockResponse> {
        let sender = self.require_sender()?;
        let gas_data = GasData {
            payment: self.gas_payment.clone().unwrap_or_default(),
            owner: self.gas_owner.unwrap_or(sender),
            price: self.effective_gas_price()?,
            budget: self.config.max_gas_budget,
        };
        let bytes = self.transaction_data(sender, gas_data).to_bcs_bytes()?;
        self.rpc.dry_run_transaction_block(&STANDARD.encode(bytes))
    }

    /// Execute the commands read-only, without gas
    pub fn dev_inspect(&self) -> SuiResult<DevInspectResults> {
        let sender = self.require_sender()?;
        let kind_bytes = self.kind().to_bcs_bytes()?;
        self.rpc
            .dev_inspect_transaction_block(&sender, &STANDARD.encode(kind_bytes), self.gas_price)
    }

    /// Fill price, budget and payment where unset
    fn resolve_gas(&mut self, sender: SuiAddress) -> SuiResult<GasData> {
        let price = self.effective_gas_price()?;
        self.gas_price = Some(price);

        if self.gas_budget.is_none() {
            let response = self.dry_run()?;
            let status = &response.effects.status;
            if !status.is_success() {
                return Err(SuiError::DryRunFailed(
                    status.error.clone().unwrap_or_else(|| "unknown error".to_string()),
                ));
            }
            let cost = GasCost::from_summary(&response.effects.gas_used)?;
            let budget = compute_gas_budget(&cost, price, self.config.gas_safe_overhead)?;
            log_debug!("builder", "Estimated gas budget", budget = budget, price = price);
            self.gas_budget = Some(budget);
        }

        let owner = self.gas_owner.unwrap_or(sender);
        if self.gas_payment.is_none() {
            self.gas_payment = Some(select_gas_payment(self.rpc, &owner, &self.config)?);
        }

        Ok(GasData {
            payment: self.gas_payment.clone().unwrap_or_default(),
            owner,
            price,
            budget: self.gas_budget.unwrap_or(self.config.max_gas_budget),
        })
    }

    /// Fill gas and serialize. Requires a sender.
    pub fn build(mut self) -> SuiResult<BuiltTransaction> {
        let sender = self.require_sender()?;
        let gas_data = self.resolve_gas(sender)?;
        let data = self.transaction_data(sender, gas_data);
        let bytes = data.to_bcs_bytes()?;

        let built = BuiltTransaction { data, bytes };
        log_info!(
            "builder",
            "Built transaction",
            sender = sender,
            digest = built.digest(),
            commands = self.commands.len()
        );
        Ok(built)
    }

    pub fn sign_and_build(self, signer: &SuiKeyPair) -> SuiResult<SignedTransaction> {
        self.build()?.sign(signer)
    }
}
