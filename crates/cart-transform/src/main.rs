//! Customizer cart transform - function runtime entry point.
//!
//! Contract: the run input arrives as JSON on stdin, the run result leaves
//! as JSON on stdout. Anything diagnostic goes to stderr so it never
//! corrupts the output channel.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{Read, Write};

use anyhow::Context;
use customizer_cart_transform::{cart_transform_run, CartTransformRunInput};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "customizer_cart_transform=info".into()),
        )
        .init();

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("reading run input from stdin")?;

    let input: CartTransformRunInput =
        serde_json::from_str(&raw).context("parsing cart transform run input")?;

    let result = cart_transform_run(&input);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer(&mut handle, &result).context("writing run result")?;
    handle.flush().context("flushing run result")?;
    Ok(())
}
