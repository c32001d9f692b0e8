use tracing::{Instrument, trace_span};
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use postro_hstore::Result;

mod register;
mod decode;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::Registry::default()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let codec = register::main().instrument(trace_span!("register")).await?;

    let inputs = std::env::args().skip(1).collect::<Vec<_>>();
    let inputs = if inputs.is_empty() {
        vec![String::from(r#""a"=>"100", "b"=>NULL, "c \"quoted\""=>"back\\slash""#)]
    } else {
        inputs
    };

    for input in inputs {
        let span = trace_span!("decode", input = input.as_str());
        let _s = span.enter();
        if let Err(err) = decode::main(codec, input) {
            tracing::error!("{err}");
        }
    }

    Ok(())
}
