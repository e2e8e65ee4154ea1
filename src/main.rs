fn main() {
    if let Err(e) = btms_overlay::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
