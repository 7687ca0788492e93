//! Convert quantities from the command line
//!
//! Usage: isqa-convert <token>...  (e.g. `isqa-convert 3.1mi 1/2gal`)

use isqa::converter::convert_token;

fn main() {
    let tokens: Vec<String> = std::env::args().skip(1).collect();
    if tokens.is_empty() {
        eprintln!("Usage: isqa-convert <token>...");
        std::process::exit(2);
    }

    let mut failed = false;
    for token in &tokens {
        let conversion = convert_token(token);
        match conversion.error() {
            Some(err) => {
                failed = true;
                println!("{}: {}", token, err);
            }
            None => println!("{}", conversion.result_string()),
        }
    }

    if failed {
        std::process::exit(1);
    }
}
