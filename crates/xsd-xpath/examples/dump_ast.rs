use std::env;
use std::process::ExitCode;

use xsd_xpath::compile_default;
use xsd_xpath::parser::scan;

fn main() -> ExitCode {
    let exprs: Vec<String> = env::args().skip(1).collect();
    if exprs.is_empty() {
        eprintln!("usage: dump_ast <expression>...");
        return ExitCode::FAILURE;
    }
    let mut status = ExitCode::SUCCESS;
    for expr in &exprs {
        println!("expression: {expr}");
        match scan(expr) {
            Ok(tokens) => {
                for tok in tokens.tokens() {
                    println!("  {:>4}  {tok}", tok.offset);
                }
            }
            Err(err) => {
                println!("  {err}");
                status = ExitCode::FAILURE;
                continue;
            }
        }
        match compile_default(expr) {
            Ok(compiled) => {
                println!("ast: {:#?}", compiled.root());
                println!("normalized: {compiled}");
            }
            Err(err) => {
                println!("error: {err}");
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}
