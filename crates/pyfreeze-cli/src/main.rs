fn main() {
    if let Err(error) = pyfreeze_cli::run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
