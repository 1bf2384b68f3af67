//! sui-keytool - key management and signing for Sui
//!
//! Usage:
//!   sui-keytool --help

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sui_tx_core::crypto::generate_mnemonic;
use sui_tx_core::{
    verify_personal_message_signature, MultiSigPublicKey, PublicKey, SdkConfig,
    SerializedSignature, SignatureScheme, SuiKeyPair,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sui-keytool")]
#[command(version)]
#[command(about = "Sui key management and signing", long_about = None)]
struct Cli {
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a mnemonic and its first keypair
    Generate {
        #[arg(short, long, default_value = "ed25519")]
        scheme: String,
    },

    /// Derive a keypair from a mnemonic
    Derive {
        /// BIP-39 phrase
        #[arg(short, long)]
        mnemonic: String,

        #[arg(short, long, default_value = "ed25519")]
        scheme: String,

        /// Derivation path (scheme default when omitted)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Inspect a `suiprivkey` key, or a hex secret with `--scheme`
    Import {
        key: String,

        #[arg(short, long)]
        scheme: Option<String>,
    },

    /// Sign a personal message
    SignMessage {
        /// `suiprivkey` private key
        #[arg(short, long)]
        key: String,

        #[arg(short, long)]
        message: String,

        /// Treat the message as hex
        #[arg(long)]
        hex: bool,
    },

    /// Verify a personal message signature and print the signer
    VerifyMessage {
        #[arg(short, long)]
        message: String,

        #[arg(short = 'g', long)]
        signature: String,

        #[arg(long)]
        hex: bool,
    },

    /// Build a multisig public key and its address
    MultisigAddress {
        /// Flag-prefixed base64 public keys
        #[arg(long = "pk", required = true)]
        public_keys: Vec<String>,

        /// One weight per public key
        #[arg(long = "weight", required = true)]
        weights: Vec<u8>,

        #[arg(short, long)]
        threshold: u16,
    },

    /// Combine member signatures into one multisig signature
    CombineSignatures {
        /// Base64 multisig public key
        #[arg(long)]
        multisig_pk: String,

        #[arg(long = "sig", required = true)]
        signatures: Vec<String>,
    },

    /// Verify a multisig signature over a personal message
    VerifyMultisig {
        #[arg(long)]
        multisig_pk: String,

        #[arg(short, long)]
        message: String,

        #[arg(short = 'g', long)]
        signature: String,

        #[arg(long)]
        hex: bool,
    },
}

#[derive(Serialize)]
struct KeyOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    mnemonic: Option<String>,
    scheme: &'static str,
    address: String,
    public_key: String,
    private_key: String,
}

impl KeyOutput {
    fn new(keypair: &SuiKeyPair, mnemonic: Option<String>) -> Result<Self> {
        Ok(Self {
            mnemonic,
            scheme: keypair.scheme().name(),
            address: keypair.address().to_hex(),
            public_key: keypair.public_key().to_sui_base64(),
            private_key: keypair.to_bech32()?.to_string(),
        })
    }
}

#[derive(Serialize)]
struct SignatureOutput {
    signature: String,
    signer: String,
}

#[derive(Serialize)]
struct MultisigOutput {
    address: String,
    multisig_pk: String,
    threshold: u16,
    total_weight: u32,
}

#[derive(Serialize)]
struct VerifyOutput {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    signer: Option<String>,
}

fn parse_scheme(name: &str) -> Result<SignatureScheme> {
    SignatureScheme::from_name(name)
        .filter(SignatureScheme::is_single_signer)
        .ok_or_else(|| anyhow!("unsupported scheme `{}`", name))
}

fn message_bytes(message: &str, is_hex: bool) -> Result<Vec<u8>> {
    if is_hex {
        hex::decode(message.trim_start_matches("0x")).context("message is not valid hex")
    } else {
        Ok(message.as_bytes().to_vec())
    }
}

fn emit<T: Serialize>(json: bool, value: &T) -> Result<()> {
    let rendered = serde_json::to_value(value)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }
    if let serde_json::Value::Object(fields) = rendered {
        for (key, value) in fields {
            match value {
                serde_json::Value::String(s) => println!("{:<12} {}", key, s),
                other => println!("{:<12} {}", key, other),
            }
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate { scheme } => {
            let scheme = parse_scheme(&scheme)?;
            let mnemonic = generate_mnemonic()?;
            let keypair = SuiKeyPair::from_mnemonic(scheme, &mnemonic, None)?;
            emit(cli.json, &KeyOutput::new(&keypair, Some(mnemonic.to_string()))?)
        }

        Commands::Derive {
            mnemonic,
            scheme,
            path,
        } => {
            let scheme = parse_scheme(&scheme)?;
            let keypair = SuiKeyPair::from_mnemonic(scheme, &mnemonic, path.as_deref())?;
            emit(cli.json, &KeyOutput::new(&keypair, None)?)
        }

        Commands::Import { key, scheme } => {
            let keypair = match scheme {
                Some(scheme) => {
                    let secret = hex::decode(key.trim_start_matches("0x"))
                        .context("secret key is not valid hex")?;
                    SuiKeyPair::from_secret_key(parse_scheme(&scheme)?, &secret, true)?
                }
                None => SuiKeyPair::from_bech32(&key)?,
            };
            emit(cli.json, &KeyOutput::new(&keypair, None)?)
        }

        Commands::SignMessage { key, message, hex } => {
            let keypair = SuiKeyPair::from_bech32(&key)?;
            let signature = keypair.sign_personal_message(&message_bytes(&message, hex)?)?;
            emit(
                cli.json,
                &SignatureOutput {
                    signature: signature.to_base64(),
                    signer: keypair.address().to_hex(),
                },
            )
        }

        Commands::VerifyMessage {
            message,
            signature,
            hex,
        } => {
            let signer = verify_personal_message_signature(&message_bytes(&message, hex)?, &signature)?;
            emit(
                cli.json,
                &VerifyOutput {
                    valid: true,
                    signer: Some(signer.to_hex()),
                },
            )
        }

        Commands::MultisigAddress {
            public_keys,
            weights,
            threshold,
        } => {
            let public_keys = public_keys
                .iter()
                .map(|pk| PublicKey::from_sui_base64(pk))
                .collect::<Result<Vec<_>, _>>()?;
            let multisig_pk = MultiSigPublicKey::new(public_keys, weights, threshold)?;
            emit(
                cli.json,
                &MultisigOutput {
                    address: multisig_pk.address().to_hex(),
                    multisig_pk: multisig_pk.to_base64(),
                    threshold: multisig_pk.threshold(),
                    total_weight: multisig_pk.total_weight(),
                },
            )
        }

        Commands::CombineSignatures {
            multisig_pk,
            signatures,
        } => {
            let multisig_pk = MultiSigPublicKey::from_base64(&multisig_pk)?;
            let signatures = signatures
                .iter()
                .map(|s| SerializedSignature::parse(s))
                .collect::<Result<Vec<_>, _>>()?;
            let combined = multisig_pk.combine_partial_signatures(&signatures)?;
            emit(
                cli.json,
                &SignatureOutput {
                    signature: combined.to_base64(),
                    signer: multisig_pk.address().to_hex(),
                },
            )
        }

        Commands::VerifyMultisig {
            multisig_pk,
            message,
            signature,
            hex,
        } => {
            let multisig_pk = MultiSigPublicKey::from_base64(&multisig_pk)?;
            let valid = multisig_pk.verify_personal_message(&message_bytes(&message, hex)?, &signature)?;
            emit(
                cli.json,
                &VerifyOutput {
                    valid,
                    signer: valid.then(|| multisig_pk.address().to_hex()),
                },
            )?;
            if !valid {
                bail!("signature does not verify against the multisig public key");
            }
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SdkConfig::load(cli.config.as_deref())?;
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    // Logs go to stderr so stdout stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    run(cli)
}
