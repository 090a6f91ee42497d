//! sdkgen - typed client SDK generator for GraphQL and OpenAPI schemas.

fn main() {
    let args: Vec<String> = std::env::args().collect();
    std::process::exit(sdkgen_cli::run(args));
}
