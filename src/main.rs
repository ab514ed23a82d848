#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;
use std::time::Duration;

use anyhow::Error;
use yansi::Paint;

use crate::application::cli;
use crate::application::web;
use crate::configuration::Config;
use crate::configuration::ConfigKey;

fn handle_error(err: Error) {
    eprintln!(
            "{}",
            Paint::red(format!(
                "Oh no! chatgui has failed with the following app version and error.\n\nVersion: {}\nCommit: {}\nError: {}",
                env!("CARGO_PKG_VERSION"),
                env!("VERGEN_GIT_DESCRIBE"),
                err
            ))
        );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let debug_log_dir = env::var("CHATGUI_LOG_DIR").unwrap_or_else(|_| {
        return dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join("chatgui")
            .to_string_lossy()
            .to_string();
    });

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("chatgui")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    match cli::parse().await {
        Ok(true) => {}
        Ok(false) => process::exit(0),
        Err(err) => {
            handle_error(err);
            return;
        }
    }

    let ctx = match web::AppContext::from_config().await {
        Ok(ctx) => ctx,
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    let idle_timeout = match Config::get(ConfigKey::SessionIdleTimeout).parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(err) => {
            handle_error(err.into());
            return;
        }
    };

    if let Err(err) = web::start(ctx, &Config::get(ConfigKey::Address), idle_timeout).await {
        handle_error(err);
    }

    process::exit(0);
}
