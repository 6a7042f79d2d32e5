use rust_mal_core::{cmdline, interpreter};

fn rep(line: &str) -> interpreter::Result<String> {
    let ast = interpreter::read(line)?;
    log::debug!("print {:?}", ast);
    Ok(interpreter::print(&ast))
}

fn main() -> std::io::Result<()> {
    pretty_env_logger::init();
    cmdline::run(rep)
}
