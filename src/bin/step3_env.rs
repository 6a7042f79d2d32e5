use itertools::Itertools;
use rust_mal_core::environment::Environment;
use rust_mal_core::types::{Arity, PrimitiveFn};
use rust_mal_core::{cmdline, evaluator, interpreter, printer, MalObject};

// Lives in the shell rather than the core: the core never touches the terminal.
static PRINT: PrimitiveFn = PrimitiveFn {
    name: "print",
    fn_ptr: print_,
    arity: Arity::at_least(0),
};

fn print_(args: &[MalObject]) -> evaluator::Result {
    println!("{}", args.iter().map(printer::pr_str).join(""));
    Ok(MalObject::Nil)
}

fn main() -> std::io::Result<()> {
    pretty_env_logger::init();
    let env = Environment::global();
    env.set(PRINT.name, MalObject::Function(&PRINT));
    log::debug!("starting with {}", env);
    cmdline::run(|line| interpreter::rep(line, &env))
}
