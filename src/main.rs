fn main() {
    if let Err(err) = choropleth_check::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
