//! fieldcrypt CLI — operational tooling for credential registries and
//! field-level encryption.
//!
//! Usage:
//!   fieldcrypt encrypt     --config <file> [--credential <name>] --in <file> --out <file>
//!   fieldcrypt decrypt     --config <file> [--credential <name>] --in <file> --out <file>
//!   fieldcrypt xml-encrypt --config <file> [--credential <name>] --path <xpath> [--path <xpath> ...] --in <file> --out <file>
//!   fieldcrypt xml-decrypt --config <file> [--credential <name>] --path <xpath> [--path <xpath> ...] --in <file> --out <file>
//!   fieldcrypt json-encrypt --config <file> [--credential <name>] --path <jsonpath> [--path <jsonpath> ...] --in <file> --out <file>
//!   fieldcrypt json-decrypt --config <file> [--credential <name>] --path <jsonpath> [--path <jsonpath> ...] --in <file> --out <file>
//!   fieldcrypt registry-check --config <file>

use std::fs;
use std::process::ExitCode;

use fieldcrypt_core::config;
use fieldcrypt_core::Crypto;

type CliError = Box<dyn std::error::Error>;

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "encrypt" => cmd_encrypt(&args[2..]),
        "decrypt" => cmd_decrypt(&args[2..]),
        "xml-encrypt" => cmd_xml(&args[2..], true),
        "xml-decrypt" => cmd_xml(&args[2..], false),
        "json-encrypt" => cmd_json(&args[2..], true),
        "json-decrypt" => cmd_json(&args[2..], false),
        "registry-check" => cmd_registry_check(&args[2..]),
        "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" => {
            println!("fieldcrypt {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        cmd => {
            eprintln!("error: unknown command '{cmd}'");
            print_usage();
            Err("unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).init();
}

fn print_usage() {
    eprintln!(
        r#"fieldcrypt — credential-keyed field-level encryption

USAGE:
    fieldcrypt <COMMAND> [OPTIONS]

COMMANDS:
    encrypt         Encrypt a whole file into an envelope
    decrypt         Decrypt an enveloped file
    xml-encrypt     Encrypt XML fields matched by one or more XPath expressions
    xml-decrypt     Decrypt XML fields matched by one or more XPath expressions
    json-encrypt    Encrypt JSON fields matched by one or more JSONPath expressions
    json-decrypt    Decrypt JSON fields matched by one or more JSONPath expressions
    registry-check  Validate a credential registry config file

COMMON OPTIONS:
    --config <file>        Credential registry, as JSON (see fieldcrypt_core::config)
    --credential <name>    Named credential to use (defaults to the registry default)
    --path <expr>          XPath/JSONPath expression; repeatable, applied in order
    --in <file>            Input file
    --out <file>           Output file

EXAMPLES:
    fieldcrypt registry-check --config registry.json

    fieldcrypt encrypt --config registry.json --credential primary \
        --in secret.txt --out secret.txt.enc

    fieldcrypt xml-decrypt --config registry.json \
        --path "/order/customer/ssn" --path "/order/payment/card" \
        --in order.enc.xml --out order.xml

OPTIONS:
    -h, --help       Print help
    -V, --version    Print version
"#
    );
}

fn parse_flags(args: &[String]) -> Result<Vec<(String, String)>, CliError> {
    let mut flags = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i].starts_with("--") && i + 1 < args.len() {
            flags.push((args[i].clone(), args[i + 1].clone()));
            i += 2;
        } else {
            return Err(format!("unexpected argument: {}", args[i]).into());
        }
    }
    Ok(flags)
}

fn get_flag<'a>(flags: &'a [(String, String)], name: &str) -> Option<&'a str> {
    flags.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

fn get_flags<'a>(flags: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    flags.iter().filter(|(k, _)| k == name).map(|(_, v)| v.as_str()).collect()
}

fn require_flag<'a>(flags: &'a [(String, String)], name: &str) -> Result<&'a str, CliError> {
    get_flag(flags, name).ok_or_else(|| format!("missing required flag: {name}").into())
}

fn load_crypto(flags: &[(String, String)]) -> Result<Crypto, CliError> {
    let config_path = require_flag(flags, "--config")?;
    let json = fs::read_to_string(config_path)?;
    let registry = config::load_registry(&json)?;
    Ok(Crypto::new(registry))
}

fn cmd_registry_check(args: &[String]) -> Result<(), CliError> {
    let flags = parse_flags(args)?;
    let crypto = load_crypto(&flags)?;
    println!("registry ok: can_encrypt={}", crypto.can_encrypt(None));
    Ok(())
}

fn cmd_encrypt(args: &[String]) -> Result<(), CliError> {
    let flags = parse_flags(args)?;
    let crypto = load_crypto(&flags)?;
    let credential = get_flag(&flags, "--credential");
    let in_file = require_flag(&flags, "--in")?;
    let out_file = require_flag(&flags, "--out")?;

    let plaintext = fs::read(in_file)?;
    let ciphertext = crypto.encrypt(&plaintext, credential)?;
    fs::write(out_file, &ciphertext)?;

    eprintln!("encrypted {in_file} -> {out_file} ({} bytes -> {} bytes)", plaintext.len(), ciphertext.len());
    Ok(())
}

fn cmd_decrypt(args: &[String]) -> Result<(), CliError> {
    let flags = parse_flags(args)?;
    let crypto = load_crypto(&flags)?;
    let credential = get_flag(&flags, "--credential");
    let in_file = require_flag(&flags, "--in")?;
    let out_file = require_flag(&flags, "--out")?;

    let ciphertext = fs::read(in_file)?;
    let plaintext = crypto.decrypt(&ciphertext, credential)?;
    fs::write(out_file, &plaintext)?;

    eprintln!("decrypted {in_file} -> {out_file} ({} bytes -> {} bytes)", ciphertext.len(), plaintext.len());
    Ok(())
}

fn cmd_xml(args: &[String], encrypt: bool) -> Result<(), CliError> {
    let flags = parse_flags(args)?;
    let crypto = load_crypto(&flags)?;
    let credential = get_flag(&flags, "--credential");
    let in_file = require_flag(&flags, "--in")?;
    let out_file = require_flag(&flags, "--out")?;
    let paths = get_flags(&flags, "--path");
    if paths.is_empty() {
        return Err("at least one --path is required".into());
    }
    let paths: Vec<Option<&str>> = paths.into_iter().map(Some).collect();

    let document = fs::read_to_string(in_file)?;
    let result = if encrypt {
        fieldcrypt_fields::encrypt_xml(&document, &paths, credential, &crypto)?
    } else {
        fieldcrypt_fields::decrypt_xml(&document, &paths, credential, &crypto)?
    };
    fs::write(out_file, &result)?;

    eprintln!("wrote {out_file}");
    Ok(())
}

fn cmd_json(args: &[String], encrypt: bool) -> Result<(), CliError> {
    let flags = parse_flags(args)?;
    let crypto = load_crypto(&flags)?;
    let credential = get_flag(&flags, "--credential");
    let in_file = require_flag(&flags, "--in")?;
    let out_file = require_flag(&flags, "--out")?;
    let paths = get_flags(&flags, "--path");
    if paths.is_empty() {
        return Err("at least one --path is required".into());
    }
    let paths: Vec<Option<&str>> = paths.into_iter().map(Some).collect();

    let document = fs::read_to_string(in_file)?;
    let result = if encrypt {
        fieldcrypt_fields::encrypt_json(&document, &paths, credential, &crypto)?
    } else {
        fieldcrypt_fields::decrypt_json(&document, &paths, credential, &crypto)?
    };
    fs::write(out_file, &result)?;

    eprintln!("wrote {out_file}");
    Ok(())
}
