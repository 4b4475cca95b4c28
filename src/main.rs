use std::process;

fn main() {
    if let Err(err) = agdex::run() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
