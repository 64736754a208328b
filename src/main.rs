use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};

use jyf::{library, run, Context, Value};

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    let status = match args.len() {
        1 => match run_repl() {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                1
            }
        },
        2 => run_script(&args[1]),
        _ => {
            eprintln!("usage: jyf [file]");
            1
        }
    };
    std::process::exit(status);
}

fn standard_library() -> Option<Context> {
    match library::standard() {
        Ok(lib) => Some(lib),
        Err(err) => {
            eprintln!("{}", err.report());
            None
        }
    }
}

fn run_script(filename: &str) -> i32 {
    let source = match std::fs::read_to_string(filename) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {}", filename, err);
            return 1;
        }
    };
    let Some(lib) = standard_library() else {
        return 1;
    };
    match run(&lib, &source, filename) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("{}", err.report());
            1
        }
    }
}

fn run_repl() -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    let Some(lib) = standard_library() else {
        return Ok(());
    };
    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                match run(&lib, &line, "<repl>") {
                    Ok(Value::Undefined) => {}
                    Ok(value) => println!("{}", value.pretty()),
                    Err(err) => eprintln!("{}", err.report()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
