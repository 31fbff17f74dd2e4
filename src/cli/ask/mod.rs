//! Ask command - one prompt, answers on stdout

use clap::Args;

use crate::domain::{GatewayResult, TransportKind};

/// Arguments for the ask command
#[derive(Args, Clone, Debug)]
pub struct AskArgs {
    /// Prompt to send
    pub prompt: String,

    /// Transport to use (overrides config)
    #[arg(long, value_enum)]
    pub transport: Option<TransportArg>,

    /// Send the prompt without a cache-busting prefix
    #[arg(long)]
    pub no_cache_busting: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum TransportArg {
    Sdk,
    Reactive,
    Blocking,
}

impl From<TransportArg> for TransportKind {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Sdk => TransportKind::Sdk,
            TransportArg::Reactive => TransportKind::Reactive,
            TransportArg::Blocking => TransportKind::Blocking,
        }
    }
}

/// Print the joined answers; fail with the gateway's error otherwise
pub async fn run(args: AskArgs, config_file: Option<&str>) -> anyhow::Result<()> {
    let config = super::bootstrap(config_file)?;

    let mut gateway_config = config.gateway;
    if let Some(transport) = args.transport {
        gateway_config.transport = transport.into();
    }
    if args.no_cache_busting {
        gateway_config.cache_busting = false;
    }

    let gateway = crate::create_gateway(gateway_config)?;

    match gateway.answer(Some(&args.prompt)).await {
        GatewayResult::TextAnswer { joined_text } => {
            println!("{}", joined_text);
            Ok(())
        }
        GatewayResult::GatewayError { kind, message } => {
            anyhow::bail!("{} ({})", message, kind)
        }
    }
}
