use rust_mal_core::{cmdline, interpreter};

fn rep(line: &str) -> interpreter::Result<String> {
    Ok(String::from(line))
}

fn main() -> std::io::Result<()> {
    pretty_env_logger::init();
    cmdline::run(rep)
}
