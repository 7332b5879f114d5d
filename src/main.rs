fn main() {
    if let Err(e) = aicare_lung_lib::run() {
        tracing::error!(error = %e, "Service stopped");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
