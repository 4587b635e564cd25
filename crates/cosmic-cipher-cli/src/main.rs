//! Cosmic Cipher command-line interface.
//!
//! # Usage
//!
//! ```bash
//! # Generate a key
//! cosmic-cipher keygen
//!
//! # Encrypt a message into a JSON envelope
//! cosmic-cipher encrypt --key <HEX> --message "meet at dawn" --out msg.json
//!
//! # Decrypt it
//! cosmic-cipher decrypt --key <HEX> --input msg.json
//!
//! # End-to-end walkthrough
//! cosmic-cipher demo
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cosmic_cipher::auth::DEFAULT_ITERATIONS;
use cosmic_cipher::{
    ChaoticParameters, CipherConfig, CosmicCipher, Envelope, Iv, Seed, SessionKey,
};

#[derive(Parser)]
#[command(
    name = "cosmic-cipher",
    author,
    version,
    about = "Chaotic keystream cipher with authenticated envelopes (experimental)"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
    /// Hénon map parameter a (1.07 to 1.4)
    #[arg(long, global = true, default_value_t = 1.4)]
    a: f64,
    /// Hénon map parameter b (0.2 to 0.3)
    #[arg(long, global = true, default_value_t = 0.3)]
    b: f64,
    /// Keystream bits per sample (1 to 32)
    #[arg(long, global = true, default_value_t = 8)]
    bits_per_value: u32,
    /// Run the statistical quality gate on every sequence
    #[arg(long, global = true)]
    quality_check: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Json,
    Cbor,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a random seed and print it as hex.
    Seed {
        #[arg(long, value_name = "N", default_value_t = 32)]
        bytes: usize,
        /// Fail instead of falling back to the userspace CSPRNG.
        #[arg(long)]
        no_fallback: bool,
    },
    /// Generate a 256-bit session key.
    Keygen,
    /// Print the keystream for a seed.
    Keystream {
        #[arg(long, value_name = "HEX")]
        seed: String,
        #[arg(long, value_name = "N", default_value_t = 16)]
        length: usize,
    },
    /// Encrypt a message into an authenticated envelope.
    Encrypt {
        #[arg(long, value_name = "HEX")]
        key: String,
        /// Fixed IV (32 hex digits); drawn at random when omitted.
        #[arg(long, value_name = "HEX")]
        iv: Option<String>,
        #[arg(long, value_name = "TEXT", conflicts_with = "input")]
        message: Option<String>,
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "json")]
        format: FormatArg,
    },
    /// Verify and decrypt an envelope.
    Decrypt {
        #[arg(long, value_name = "HEX")]
        key: String,
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        #[arg(long, value_enum, default_value = "json")]
        format: FormatArg,
    },
    /// Stretch a secret with iterated HMAC-SHA3-512.
    Stretch {
        #[arg(long, value_name = "TEXT")]
        secret: String,
        #[arg(long, value_name = "N", default_value_t = DEFAULT_ITERATIONS)]
        iterations: usize,
    },
    /// Report entropy and repeated patterns.
    Analyze {
        #[arg(long, value_name = "TEXT", conflicts_with = "input")]
        text: Option<String>,
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Run key generation, encryption, decryption and tamper detection.
    Demo {
        #[arg(long, default_value = "Secret message from the cosmos")]
        message: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = CipherConfig {
        params: ChaoticParameters::new(cli.a, cli.b).context("invalid map parameters")?,
        bits_per_value: cli.bits_per_value,
        quality_check: cli.quality_check,
        stretch_iterations: match &cli.command {
            Commands::Stretch { iterations, .. } => *iterations,
            _ => DEFAULT_ITERATIONS,
        },
    };
    let cipher = CosmicCipher::new(config).context("invalid configuration")?;

    match cli.command {
        Commands::Seed { bytes, no_fallback } => {
            let (seed, used_primary) = cipher.generate_seed(bytes, !no_fallback)?;
            println!("{}", seed.to_hex());
            if !used_primary {
                eprintln!("note: OS random source unavailable, used fallback CSPRNG");
            }
        }
        Commands::Keygen => {
            let key = cipher.generate_key()?;
            println!("{}", key.to_hex());
        }
        Commands::Keystream { seed, length } => {
            let seed = Seed::from_hex(&seed).context("seed must be hex")?;
            let sequence = cipher.generate_sequence(&seed, length)?;
            let keystream = cipher.encode_keystream(&sequence)?;
            println!("{keystream}");
        }
        Commands::Encrypt {
            key,
            iv,
            message,
            input,
            out,
            format,
        } => {
            let key = parse_key(&key)?;
            let message = read_message(message, input.as_deref())?;
            let envelope = match iv {
                Some(iv) => {
                    let iv = Iv::from_hex(&iv).context("iv must be 32 lowercase hex digits")?;
                    cipher.encrypt_with_iv(&message, &key, iv)?
                }
                None => cipher.encrypt(&message, &key)?,
            };
            write_envelope(&envelope, out.as_deref(), format)?;
        }
        Commands::Decrypt { key, input, format } => {
            let key = parse_key(&key)?;
            let envelope = read_envelope(&input, format)?;
            let plaintext = cipher
                .decrypt(&envelope, &key)
                .context("envelope rejected")?;
            println!("{plaintext}");
        }
        Commands::Stretch { secret, iterations } => {
            let mut report = |percent: f64| tracing::info!(percent, "stretching");
            let stretched = cipher.stretch_key(secret.as_bytes(), Some(&mut report))?;
            tracing::debug!(iterations, "stretch complete");
            println!("{}", stretched.to_hex());
        }
        Commands::Analyze { text, input } => {
            let data = match (text, input) {
                (Some(text), _) => text.into_bytes(),
                (None, Some(path)) => fs::read(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, None) => bail!("provide --text or --input"),
            };
            let report = cipher.analyze(&data);
            println!("{}", serde_json::to_string_pretty(&report)?);
            println!("{}", report.recommendation);
        }
        Commands::Demo { message } => run_demo(&cipher, &message)?,
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn parse_key(hex_key: &str) -> Result<SessionKey> {
    SessionKey::from_hex(hex_key).context("key must be at most 64 hex digits")
}

fn read_message(message: Option<String>, input: Option<&Path>) -> Result<String> {
    if let Some(message) = message {
        return Ok(message);
    }
    if let Some(path) = input {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read message from stdin")?;
    Ok(buf)
}

fn write_envelope(envelope: &Envelope, out: Option<&Path>, format: FormatArg) -> Result<()> {
    let bytes = match format {
        FormatArg::Json => envelope.to_json()?.into_bytes(),
        FormatArg::Cbor => envelope.to_bytes()?,
    };
    match out {
        Some(path) => fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display())),
        None => match format {
            FormatArg::Json => {
                println!("{}", envelope.to_json()?);
                Ok(())
            }
            FormatArg::Cbor => {
                println!("{}", hex::encode(bytes));
                Ok(())
            }
        },
    }
}

fn read_envelope(path: &Path, format: FormatArg) -> Result<Envelope> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let envelope = match format {
        FormatArg::Json => {
            let text = String::from_utf8(bytes).context("envelope is not UTF-8")?;
            Envelope::from_json(text.trim())?
        }
        FormatArg::Cbor => Envelope::from_bytes(&bytes)?,
    };
    Ok(envelope)
}

fn run_demo(cipher: &CosmicCipher, message: &str) -> Result<()> {
    println!("== key generation ==");
    let key = cipher.generate_key()?;
    println!("key: {}", key.to_hex());

    println!("\n== encryption ==");
    let envelope = cipher.encrypt(message, &key)?;
    println!("plaintext:  {message}");
    println!("iv:         {}", envelope.iv);
    println!("mac:        {}", envelope.mac);
    println!("ciphertext: {} bits", envelope.ciphertext_len());

    println!("\n== decryption ==");
    let recovered = cipher.decrypt(&envelope, &key)?;
    println!("recovered:  {recovered}");
    if recovered != message {
        bail!("round trip mismatch");
    }

    println!("\n== tamper detection ==");
    let mut tampered = envelope.clone();
    tampered.ciphertext.flip(0);
    match cipher.decrypt(&tampered, &key) {
        Err(e) if e.is_authentication_failure() => println!("flipped bit 0: rejected ({e})"),
        Err(e) => bail!("unexpected error on tampered envelope: {e}"),
        Ok(_) => bail!("tampered envelope was accepted"),
    }

    println!("\n== analysis ==");
    let bytes = envelope.ciphertext.to_bytes()?;
    let report = cipher.analyze(&bytes);
    println!("entropy:  {:.3} bits/byte", report.entropy);
    println!("score:    {:.1}", report.strength_score);
    println!("{}", report.recommendation);

    Ok(())
}
