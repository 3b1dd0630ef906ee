fn main() {
    if let Err(err) = refflow_cli::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
