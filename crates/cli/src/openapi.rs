use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use sdkgen_core::{generate_openapi_sdk, select_formatter};
use tracing::debug;

use crate::common::CommonArgs;
use crate::report;

#[derive(Args, Debug, Clone)]
pub struct OpenapiArgs {
    /// Swagger 2 document (.yaml, .yml or .json)
    #[arg(short, long, value_name = "FILE")]
    pub schema: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn run(args: &OpenapiArgs) -> i32 {
    let started = Instant::now();
    let result = args.common.load_config().and_then(|config| {
        debug!(schema = %args.schema.display(), "Generating OpenAPI client.");
        let formatter = select_formatter(&config);
        generate_openapi_sdk(&args.schema, &args.common.output, &config, formatter.as_ref())
    });
    report(result, started)
}
