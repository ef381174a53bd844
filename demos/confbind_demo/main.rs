//! # confbind demo application
//!
//! Binds a handful of settings from the environment and the command line,
//! then prints where each one ended up.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example confbind_demo
//! cargo run --example confbind_demo -- --help
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature               | How to exercise it                                                     |
//! |-----------------------|------------------------------------------------------------------------|
//! | Default port rejected | `cargo run --example confbind_demo`                                    |
//! | Env override          | `PORT=12000 cargo run --example confbind_demo` (other defaults shown)  |
//! | Flag beats env        | `PORT=12000 cargo run --example confbind_demo -- -p 13000`             |
//! | Validation failure    | `PORT=80 cargo run --example confbind_demo`                            |
//! | Bad env value         | `PORT=eighty cargo run --example confbind_demo`                        |
//! | Bare switch           | `cargo run --example confbind_demo -- -t`                              |
//! | Time zone flag        | `cargo run --example confbind_demo -- --tz Europe/Madrid`              |
//! | Key/value setting     | `LANGUAGE=fr=false cargo run --example confbind_demo`                  |
//! | Pair validation       | `cargo run --example confbind_demo -- --lang fr=true`                  |
//! | Debug logging         | `RUST_LOG=confbind=trace cargo run --example confbind_demo -- -p 12000` |

use std::process::ExitCode;

use chrono_tz::Tz;
use language_tags::LanguageTag;
use tracing_subscriber::EnvFilter;

use confbind::{BindError, Binder, KeyValue, ValidationResult};

fn at_least_10000(port: &u16) -> ValidationResult {
    if *port < 10000 {
        return Err("value must be greater or equal than 10000".into());
    }
    Ok(())
}

fn not_spanish(tag: &LanguageTag) -> ValidationResult {
    if tag.as_str() == "es" {
        return Err("spanish not allowed".into());
    }
    Ok(())
}

fn only_true(enabled: &bool) -> ValidationResult {
    if !*enabled {
        return Err("value can only be true".into());
    }
    Ok(())
}

fn french_only_false(tag: &LanguageTag, enabled: &bool) -> ValidationResult {
    if tag.as_str() == "fr" && *enabled {
        return Err("french can only be false".into());
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let english = match LanguageTag::parse("en") {
        Ok(tag) => tag,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut port = 0u16;
    let mut host = String::new();
    let mut timezone = Tz::UTC;
    let mut test = false;
    let mut lang = KeyValue::new(english.clone(), false);

    let mut binder = Binder::new().named("confbind-demo");
    binder
        .set_validate(&mut port, 8080, "PORT", "p", at_least_10000)
        .set_env(&mut host, "localhost".to_string(), "HOST")
        .set_flag(&mut timezone, Tz::UTC, "tz")
        .set(&mut test, false, "TEST", "t")
        .set_pair_validate(
            &mut lang,
            KeyValue::new(english, true),
            "LANGUAGE",
            "lang",
            not_spanish,
            only_true,
            french_only_false,
        );

    let resolved = match binder.read() {
        Ok(resolved) => resolved,
        Err(BindError::Cli(e)) => e.exit(),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{resolved}");
    println!();
    println!("port     {port}");
    println!("host     {host}");
    println!("timezone {}", timezone.name());
    println!("test     {test}");
    println!("language {}={}", lang.key, lang.value);
    if !resolved.args.is_empty() {
        println!("args     {}", resolved.args.join(" "));
    }
    ExitCode::SUCCESS
}
