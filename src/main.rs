use std::process;

fn main() {
    tracing_subscriber::fmt().init();

    if let Err(e) = flare_deploy::run() {
        eprintln!("Error: {e:?}");
        process::exit(1);
    }
}
