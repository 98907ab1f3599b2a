#[tokio::main]
async fn main() {
    let code = conveyor_cli::run().await;
    if code != 0 {
        std::process::exit(code);
    }
}
