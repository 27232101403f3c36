//! EVM Wallet CLI Example
//!
//! This example drives the wallet core from the command line: derive
//! addresses from a mnemonic, sign transactions and messages, and decrypt
//! keystore files.
//!
//! # Quick Start
//!
//! ```bash
//! cargo run --example wallet-cli -- address "test test test test test test test test test test test junk"
//! cargo run --example wallet-cli -- address "<mnemonic>" "m/44'/60'/0'/0/3"
//! cargo run --example wallet-cli -- sign-tx 0x<private-key> tx.json
//! cargo run --example wallet-cli -- sign-message 0x<private-key> "hello"
//! cargo run --example wallet-cli -- decrypt keystore.json
//! ```
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `address <mnemonic> [path]` | Derive an address (default `m/44'/60'/0'/0/0`) |
//! | `accounts <mnemonic> [count]` | Derive the first `count` account addresses |
//! | `sign-tx <key> <file>` | Sign a JSON transaction and print the raw bytes |
//! | `sign-message <key> <text>` | `personal_sign` a UTF-8 message |
//! | `decrypt <file>` | Decrypt a V3 keystore (prompts for the password) |
//!
//! The library emits `tracing` events; this example installs no subscriber.
//!
//! # Security Notes
//!
//! - Passing keys and mnemonics as arguments leaves them in shell history;
//!   this is a demonstration, not a wallet
//! - The mnemonic passphrase is read from `WALLET_PASSPHRASE` when set

#![expect(unused_crate_dependencies, reason = "needed for CLI example")]

use std::io::{self, Write};
use std::{env, fs};

use evm_wallet_core::hd::{self, DerivationPath};
use evm_wallet_core::mnemonic::Mnemonic;
use evm_wallet_core::{Address, PrivateKey, Transaction, keystore, message};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    let result = match args[1].as_str() {
        "address" => cmd_address(&args[2..]),
        "accounts" => cmd_accounts(&args[2..]),
        "sign-tx" => cmd_sign_tx(&args[2..]),
        "sign-message" => cmd_sign_message(&args[2..]),
        "decrypt" => cmd_decrypt(&args[2..]),
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_help();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_help() {
    println!(
        r#"EVM Wallet CLI

USAGE:
    wallet-cli <COMMAND>

COMMANDS:
    address <mnemonic> [path]       Derive an address (default m/44'/60'/0'/0/0)
    accounts <mnemonic> [count]     Derive the first addresses of account 0
    sign-tx <key> <file>            Sign a JSON transaction
    sign-message <key> <text>       Sign a message with personal_sign
    decrypt <file>                  Decrypt a V3 keystore
    help                            Show this help message

ENVIRONMENT:
    WALLET_PASSPHRASE               Optional BIP-39 passphrase
"#
    );
}

fn cmd_address(args: &[String]) -> Result<(), String> {
    let [phrase, rest @ ..] = args else {
        return Err("usage: address <mnemonic> [path]".to_string());
    };
    let path: DerivationPath = match rest.first() {
        Some(path) => path.parse().map_err(|e| format!("{e}"))?,
        None => DerivationPath::ethereum(0, 0).map_err(|e| format!("{e}"))?,
    };

    let seed = Mnemonic::parse(phrase)
        .map_err(|e| format!("{e}"))?
        .to_seed(&passphrase());
    let key = hd::master_key(&*seed)
        .and_then(|master| master.derive_path(&path))
        .map_err(|e| format!("{e}"))?;

    println!("Path:    {path}");
    println!("Address: {}", key.address());
    Ok(())
}

fn cmd_accounts(args: &[String]) -> Result<(), String> {
    let [phrase, rest @ ..] = args else {
        return Err("usage: accounts <mnemonic> [count]".to_string());
    };
    let count: u32 = match rest.first() {
        Some(count) => count.parse().map_err(|e| format!("invalid count: {e}"))?,
        None => 5,
    };

    let seed = Mnemonic::parse(phrase)
        .map_err(|e| format!("{e}"))?
        .to_seed(&passphrase());
    let addresses = hd::derive_addresses(&*seed, 0, 0..count).map_err(|e| format!("{e}"))?;

    for (i, address) in addresses.iter().enumerate() {
        println!("  [{i}] {address}");
    }
    Ok(())
}

fn cmd_sign_tx(args: &[String]) -> Result<(), String> {
    let [key, file, ..] = args else {
        return Err("usage: sign-tx <private-key> <tx.json>".to_string());
    };
    let key = PrivateKey::from_hex(key).map_err(|e| format!("{e}"))?;
    let json = fs::read_to_string(file).map_err(|e| format!("reading {file}: {e}"))?;
    let tx = Transaction::from_json(&json).map_err(|e| format!("{e}"))?;

    let signed = tx.sign(&key).map_err(|e| format!("{e}"))?;
    println!("From:    {}", Address::from_private_key(&key));
    println!("Chain:   {}", tx.chain_id());
    println!("Hash:    {}", signed.hash());
    println!("Raw:     {}", signed.to_raw_hex());
    Ok(())
}

fn cmd_sign_message(args: &[String]) -> Result<(), String> {
    let [key, text, ..] = args else {
        return Err("usage: sign-message <private-key> <text>".to_string());
    };
    let key = PrivateKey::from_hex(key).map_err(|e| format!("{e}"))?;
    let signature = message::personal_sign(text, &key).map_err(|e| format!("{e}"))?;

    println!("Signer:    {}", Address::from_private_key(&key));
    println!("Signature: {}", signature.to_rsv_hex());
    Ok(())
}

fn cmd_decrypt(args: &[String]) -> Result<(), String> {
    let [file, ..] = args else {
        return Err("usage: decrypt <keystore.json>".to_string());
    };
    let json = fs::read_to_string(file).map_err(|e| format!("reading {file}: {e}"))?;
    let password = prompt("Password: ")?;

    let key = keystore::decrypt(&json, &password).map_err(|e| format!("{e}"))?;
    println!("Address:     {}", Address::from_private_key(&key));
    println!("Private key: {}", key.to_hex().as_str());
    Ok(())
}

fn passphrase() -> String {
    env::var("WALLET_PASSPHRASE").unwrap_or_default()
}

fn prompt(label: &str) -> Result<String, String> {
    print!("{label}");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| e.to_string())?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
