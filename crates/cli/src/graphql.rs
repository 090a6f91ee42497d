use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use sdkgen_core::{generate_graphql_sdk, select_formatter};
use tracing::debug;

use crate::common::CommonArgs;
use crate::report;

#[derive(Args, Debug, Clone)]
pub struct GraphqlArgs {
    /// SDL files, concatenated in the given order
    #[arg(short, long, value_name = "FILE", num_args = 1.., required = true)]
    pub schema: Vec<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn run(args: &GraphqlArgs) -> i32 {
    let started = Instant::now();
    let result = args.common.load_config().and_then(|config| {
        debug!(schemas = args.schema.len(), "Generating GraphQL client.");
        let formatter = select_formatter(&config);
        generate_graphql_sdk(&args.schema, &args.common.output, &config, formatter.as_ref())
    });
    report(result, started)
}
