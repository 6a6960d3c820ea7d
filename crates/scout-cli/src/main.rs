//! scout - security-intelligence lookups from the command line.

#[tokio::main]
async fn main() {
    let code = scout_cli::run().await;
    std::process::exit(code.as_i32());
}
