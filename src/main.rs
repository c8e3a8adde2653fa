fn main() {
    if let Err(err) = cinestore::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
