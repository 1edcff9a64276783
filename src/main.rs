#[tokio::main]
async fn main() {
    if let Err(e) = acme_medical_lib::run().await {
        eprintln!("acme-medical: {e}");
        std::process::exit(1);
    }
}
